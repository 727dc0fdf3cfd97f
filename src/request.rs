//! Outgoing-request and response primitives shared by every gateway flow.

use error_stack::ResultExt;
use masking::{ErasedMaskSerialize, Maskable};
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, PaymentError};

pub type Headers = std::collections::HashSet<(String, Maskable<String>)>;

/// The only two methods a gateway redirect or API call ever uses.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

pub enum RequestContent {
    Json(Box<dyn ErasedMaskSerialize + Send>),
    FormUrlEncoded(Box<dyn ErasedMaskSerialize + Send>),
    /// Pre-rendered bytes, used for SOAP envelopes.
    RawBytes(Vec<u8>),
}

impl std::fmt::Debug for RequestContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json(_) => "JsonRequestBody",
            Self::FormUrlEncoded(_) => "FormUrlEncodedRequestBody",
            Self::RawBytes(_) => "RawBytesRequestBody",
        })
    }
}

impl RequestContent {
    /// Masked rendering of the body for logs. Secret-typed fields come out
    /// redacted instead of exposed.
    pub fn masked_value(&self) -> serde_json::Value {
        match self {
            Self::Json(inner) | Self::FormUrlEncoded(inner) => inner
                .masked_serialize()
                .unwrap_or_else(|_| serde_json::json!({"error": "failed to mask request body"})),
            Self::RawBytes(_) => serde_json::json!({"request_type": "RAW_BYTES"}),
        }
    }
}

#[derive(Debug)]
pub struct Request {
    pub url: String,
    pub method: Method,
    pub headers: Headers,
    pub body: Option<RequestContent>,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: String::from(url),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    pub fn add_header(&mut self, header: &str, value: Maskable<String>) {
        self.headers.insert((String::from(header), value));
    }
}

#[derive(Debug)]
pub struct RequestBuilder {
    url: String,
    method: Method,
    headers: Headers,
    body: Option<RequestContent>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: String::new(),
            headers: std::collections::HashSet::new(),
            body: None,
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.into();
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn headers(mut self, headers: Vec<(String, Maskable<String>)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn set_body(mut self, body: RequestContent) -> Self {
        self.body.replace(body);
        self
    }

    pub fn set_optional_body(mut self, body: Option<RequestContent>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What came back from the gateway, before any decoding.
#[derive(Clone, Debug)]
pub struct Response {
    pub status_code: u16,
    pub body: bytes::Bytes,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Decodes the body as JSON into `T`, mapping decode failures to a
    /// gateway failure — a response the adapter cannot read is a provider
    /// fault, not a caller fault.
    pub fn parse_struct<T>(&self, type_name: &'static str) -> CustomResult<T, PaymentError>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_slice(&self.body)
            .change_context(PaymentError::gateway_failure())
            .attach_printable_lazy(|| format!("unable to decode provider response as {type_name}"))
    }

    /// The body as UTF-8 text, for XML transports.
    pub fn text(&self) -> CustomResult<&str, PaymentError> {
        std::str::from_utf8(&self.body)
            .change_context(PaymentError::gateway_failure())
            .attach_printable("provider response was not valid UTF-8")
    }
}
