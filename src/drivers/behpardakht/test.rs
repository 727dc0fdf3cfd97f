use serde_json::json;

use crate::driver::Driver;
use crate::errors::ErrorKind;
use crate::request::Method;
use crate::test_utils::MockClient;
use crate::types::{CallbackParams, TransactionId};

use super::Behpardakht;

fn config() -> serde_json::Value {
    json!({"terminalId": 1234, "username": "username", "password": "password"})
}

fn success_callback() -> CallbackParams {
    json!({
        "CardHolderPan": "1234-****-****-1234",
        "RefId": "111111",
        "ResCode": "0",
        "SaleReferenceId": 1234,
        "saleOrderId": 4321,
    })
    .as_object()
    .unwrap()
    .clone()
}

fn soap_response(value: &str) -> String {
    format!(
        "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\">\
         <soapenv:Body><ns1:bpPayRequestResponse xmlns:ns1=\"http://interfaces.core.sw.bps.com/\">\
         <return>{value}</return>\
         </ns1:bpPayRequestResponse></soapenv:Body></soapenv:Envelope>"
    )
}

#[tokio::test]
async fn purchase_returns_a_post_form_carrying_the_reference() {
    let client = MockClient::new(vec![MockClient::raw(
        200,
        &soap_response("0, some-hash-from-api"),
    )]);
    let driver = Driver::connect(Behpardakht::new(), config(), client.clone()).unwrap();

    let info = driver
        .request(json!({"amount": 20000, "callbackUrl": "https://mysite.com/callback"}))
        .await
        .unwrap();

    assert_eq!(info.method, Method::Post);
    assert_eq!(info.url, "https://bpm.shaparak.ir/pgwchannel/startpay.mellat");
    assert_eq!(
        info.params.get("RefId").map(String::as_str),
        Some("some-hash-from-api")
    );

    // The envelope went to the PGW service as XML.
    let (method, url) = client.calls()[0].clone();
    assert_eq!(method, Method::Post);
    assert_eq!(url, "https://bpm.shaparak.ir/pgwchannel/services/pgw");
}

#[tokio::test]
async fn bare_failure_codes_classify_accordingly() {
    for (code, expected) in [
        ("34", ErrorKind::GatewayFailure),
        ("24", ErrorKind::BadConfig),
        ("19", ErrorKind::User),
        ("999", ErrorKind::GatewayFailure),
    ] {
        let client = MockClient::new(vec![MockClient::raw(200, &soap_response(code))]);
        let driver = Driver::connect(Behpardakht::new(), config(), client).unwrap();

        let error = driver
            .request(json!({"amount": 20000, "callbackUrl": "https://mysite.com/callback"}))
            .await
            .unwrap_err();
        assert_eq!(error.current_context().kind(), expected, "ResCode {code}");
    }
}

#[tokio::test]
async fn verify_settles_and_maps_the_callback_reference() {
    let client = MockClient::new(vec![
        MockClient::raw(200, &soap_response("0")),
        MockClient::raw(200, &soap_response("0")),
    ]);
    let driver = Driver::connect(Behpardakht::new(), config(), client.clone()).unwrap();

    let receipt = driver
        .verify(json!({"amount": 2000}), success_callback())
        .await
        .unwrap();

    assert_eq!(
        receipt.transaction_id,
        TransactionId::Text("111111".to_owned())
    );
    assert_eq!(receipt.card_pan.as_deref(), Some("1234-****-****-1234"));
    // One verify round-trip, one settle round-trip.
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn already_settled_counts_as_settled() {
    let client = MockClient::new(vec![
        MockClient::raw(200, &soap_response("0")),
        MockClient::raw(200, &soap_response("45")),
    ]);
    let driver = Driver::connect(Behpardakht::new(), config(), client).unwrap();

    assert!(driver
        .verify(json!({"amount": 2000}), success_callback())
        .await
        .is_ok());
}

#[tokio::test]
async fn failed_callback_short_circuits_without_a_network_call() {
    let client = MockClient::new(vec![]);
    let driver = Driver::connect(Behpardakht::new(), config(), client.clone()).unwrap();

    let mut params = success_callback();
    params.insert("ResCode".to_owned(), json!("17"));
    let error = driver
        .verify(json!({"amount": 2000}), params)
        .await
        .unwrap_err();

    assert_eq!(error.current_context().kind(), ErrorKind::User);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn failed_settlement_classifies_by_code() {
    let client = MockClient::new(vec![
        MockClient::raw(200, &soap_response("0")),
        MockClient::raw(200, &soap_response("34")),
    ]);
    let driver = Driver::connect(Behpardakht::new(), config(), client).unwrap();

    let error = driver
        .verify(json!({"amount": 2000}), success_callback())
        .await
        .unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::GatewayFailure);
}

#[test]
fn missing_credentials_fail_construction() {
    let client = MockClient::new(vec![]);
    let error =
        Driver::connect(Behpardakht::new(), json!({"terminalId": 1234}), client).unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::Validation);
}
