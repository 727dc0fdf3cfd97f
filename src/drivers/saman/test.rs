use serde_json::json;

use crate::driver::Driver;
use crate::errors::ErrorKind;
use crate::request::Method;
use crate::test_utils::MockClient;
use crate::types::{CallbackParams, TransactionId};

use super::Saman;

fn success_callback() -> CallbackParams {
    json!({
        "Amount": "20000",
        "MID": "1234",
        "RRN": "12345",
        "RefNum": "123456",
        "ResNum": "1234567",
        "SecurePan": "1234-****-****-1234",
        "State": "Success",
        "Status": "1",
        "TerminalId": "1234",
        "TraceNo": "111111",
    })
    .as_object()
    .unwrap()
    .clone()
}

fn soap_verify_response(result: &str) -> String {
    format!(
        "<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\">\
         <soap:Body><verifyTransactionResponse><result>{result}</result>\
         </verifyTransactionResponse></soap:Body></soap:Envelope>"
    )
}

#[tokio::test]
async fn purchase_returns_an_auto_submitting_post_form() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({"status": 1, "token": "123"}),
    )]);
    let driver = Driver::connect(Saman::new(), json!({"merchantId": "1234"}), client).unwrap();

    let info = driver
        .request(json!({
            "amount": 20000,
            "callbackUrl": "https://mysite.com/callback",
            "mobile": "09120000000",
        }))
        .await
        .unwrap();

    assert_eq!(info.method, Method::Post);
    assert!(!info.url.is_empty());
    assert_eq!(info.params.get("Token").map(String::as_str), Some("123"));

    let html = info.form_html();
    assert!(html.contains("name=\"Token\" value=\"123\""));
    assert!(html.contains(".submit()"));
}

#[tokio::test]
async fn failed_token_request_classifies_by_error_code() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({"status": -1, "errorCode": 2, "errorDesc": "err"}),
    )]);
    let driver = Driver::connect(Saman::new(), json!({"merchantId": "1234"}), client).unwrap();

    let error = driver
        .request(json!({"amount": 20000, "callbackUrl": "https://mysite.com/callback"}))
        .await
        .unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::GatewayFailure);
}

#[tokio::test]
async fn round_trip_maps_trace_no_into_the_receipt() {
    let client = MockClient::new(vec![
        MockClient::json(200, json!({"status": 1, "token": "123"})),
        MockClient::raw(200, &soap_verify_response("20000")),
    ]);
    let driver =
        Driver::connect(Saman::new(), json!({"merchantId": "1234"}), client.clone()).unwrap();

    let info = driver
        .request(json!({"amount": 20000, "callbackUrl": "https://x/cb"}))
        .await
        .unwrap();
    assert!(!info.url.is_empty());

    let receipt = driver
        .verify(json!({"amount": 20000}), success_callback())
        .await
        .unwrap();

    assert_eq!(receipt.transaction_id, TransactionId::Numeric(111111));
    assert_eq!(receipt.raw["RefNum"], json!("123456"));
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn verified_amount_must_match_the_expected_amount() {
    let client = MockClient::new(vec![MockClient::raw(200, &soap_verify_response("10000"))]);
    let driver = Driver::connect(Saman::new(), json!({"merchantId": "1234"}), client).unwrap();

    let error = driver
        .verify(json!({"amount": 20000}), success_callback())
        .await
        .unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::GatewayFailure);
}

#[tokio::test]
async fn negative_verify_results_classify_by_code() {
    let client = MockClient::new(vec![MockClient::raw(200, &soap_verify_response("-104"))]);
    let driver = Driver::connect(Saman::new(), json!({"merchantId": "1234"}), client).unwrap();

    let error = driver
        .verify(json!({"amount": 20000}), success_callback())
        .await
        .unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::BadConfig);
}

#[tokio::test]
async fn cancelled_callback_short_circuits_without_a_network_call() {
    let client = MockClient::new(vec![]);
    let driver =
        Driver::connect(Saman::new(), json!({"merchantId": "1234"}), client.clone()).unwrap();

    let mut params = success_callback();
    params.insert("State".to_owned(), json!("CanceledByUser"));
    let error = driver
        .verify(json!({"amount": 20000}), params)
        .await
        .unwrap_err();

    assert_eq!(error.current_context().kind(), ErrorKind::User);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn soap_fault_surfaces_as_gateway_failure() {
    let fault = "<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\">\
                 <soap:Body><soap:Fault><faultcode>soap:Server</faultcode>\
                 <faultstring>verification unavailable</faultstring></soap:Fault>\
                 </soap:Body></soap:Envelope>";
    let client = MockClient::new(vec![MockClient::raw(200, fault)]);
    let driver = Driver::connect(Saman::new(), json!({"merchantId": "1234"}), client).unwrap();

    let error = driver
        .verify(json!({"amount": 20000}), success_callback())
        .await
        .unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::GatewayFailure);
}
