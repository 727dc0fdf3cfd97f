//! Client-side SOAP 1.1 plumbing for gateways that only speak XML RPC.
//!
//! A call is a named remote operation with a flat field mapping, posted as a
//! `text/xml` envelope through the ordinary transport. Responses are read
//! back by element name, prefix-insensitive; faults surface as gateway
//! failures.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::{CustomResult, PaymentError};
use crate::request::{Method, Request, RequestBuilder, RequestContent};

/// Builds the POST carrying a SOAP call to `operation` at `url`.
pub fn request(url: &str, namespace: &str, operation: &str, fields: &[(&str, String)]) -> Request {
    RequestBuilder::new()
        .method(Method::Post)
        .url(url)
        .headers(vec![
            (
                "Content-Type".to_string(),
                "text/xml; charset=utf-8".to_string().into(),
            ),
            ("SOAPAction".to_string(), format!("\"{operation}\"").into()),
        ])
        .set_body(RequestContent::RawBytes(envelope(
            namespace, operation, fields,
        )))
        .build()
}

/// Renders a SOAP 1.1 envelope invoking `operation` with `fields`.
pub fn envelope(namespace: &str, operation: &str, fields: &[(&str, String)]) -> Vec<u8> {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\"",
    );
    xml.push_str(&format!(" xmlns:ns=\"{}\">", escape(namespace)));
    xml.push_str("<soapenv:Header/><soapenv:Body>");
    xml.push_str(&format!("<ns:{operation}>"));
    for (name, value) in fields {
        xml.push_str(&format!("<{name}>{}</{name}>", escape(value)));
    }
    xml.push_str(&format!("</ns:{operation}>"));
    xml.push_str("</soapenv:Body></soapenv:Envelope>");
    xml.into_bytes()
}

/// Text content of the first `element` in `xml`, matched on local name so
/// gateway-chosen prefixes do not matter. `None` when absent.
pub fn element_text(xml: &str, element: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut capturing = false;
    let mut text = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) if start.local_name().as_ref() == element.as_bytes() => {
                capturing = true;
            }
            Ok(Event::Empty(empty)) if empty.local_name().as_ref() == element.as_bytes() => {
                return Some(String::new());
            }
            Ok(Event::Text(content)) if capturing => {
                text.push_str(content.unescape().ok()?.as_ref());
            }
            Ok(Event::End(end)) if capturing && end.local_name().as_ref() == element.as_bytes() => {
                return Some(text.trim().to_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

/// Decodes a SOAP response body: a fault becomes a gateway failure carrying
/// the fault string, otherwise the named result element's text is returned.
/// A response with neither is malformed, which is also the gateway's fault.
pub fn result_text(xml: &str, element: &str) -> CustomResult<String, PaymentError> {
    if let Some(fault) = element_text(xml, "faultstring") {
        return Err(PaymentError::gateway_failure_with("soap:Fault", fault).into());
    }
    element_text(xml, element).ok_or_else(|| {
        error_stack::Report::new(PaymentError::gateway_failure())
            .attach_printable(format!("SOAP response did not contain `{element}`"))
    })
}
