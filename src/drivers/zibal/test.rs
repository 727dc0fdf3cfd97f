use serde_json::json;

use crate::driver::Driver;
use crate::errors::ErrorKind;
use crate::request::Method;
use crate::test_utils::MockClient;
use crate::types::{CallbackParams, TransactionId};

use super::Zibal;

fn ok_callback(track_id: &str) -> CallbackParams {
    json!({"trackId": track_id, "success": "1", "status": "1"})
        .as_object()
        .unwrap()
        .clone()
}

#[tokio::test]
async fn purchase_redirects_onto_the_track_id() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({"result": 100, "message": "success", "trackId": 1234}),
    )]);
    let driver = Driver::connect(Zibal::new(), json!({"merchantId": "2134"}), client).unwrap();

    let info = driver
        .request(json!({"amount": 20000, "callbackUrl": "https://path.to/callback-url"}))
        .await
        .unwrap();

    assert_eq!(info.method, Method::Get);
    assert_eq!(info.url, "https://gateway.zibal.ir/start/1234");
    assert_eq!(info.reference_id, "1234");
}

#[tokio::test]
async fn merchant_results_classify_as_bad_config() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({"result": 102, "message": "merchant not found", "trackId": null}),
    )]);
    let driver = Driver::connect(Zibal::new(), json!({"merchantId": "2134"}), client).unwrap();

    let error = driver
        .request(json!({"amount": 2000, "callbackUrl": "https://shop.example/cb"}))
        .await
        .unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::BadConfig);
}

#[tokio::test]
async fn verify_maps_ref_number_and_card() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({
            "paidAt": "2018-03-25T23:43:01.053000",
            "amount": 1600,
            "result": 100,
            "status": 1,
            "refNumber": 1234,
            "description": "Hello World!",
            "cardNumber": "62741****44",
            "orderId": "2211",
            "message": "success",
        }),
    )]);
    let driver = Driver::connect(Zibal::new(), json!({"merchantId": "2134"}), client).unwrap();

    let receipt = driver
        .verify(json!({"amount": 2000}), ok_callback("12345"))
        .await
        .unwrap();

    assert_eq!(receipt.transaction_id, TransactionId::Numeric(1234));
    assert_eq!(receipt.card_pan.as_deref(), Some("62741****44"));
    assert_eq!(receipt.raw["orderId"], json!("2211"));
}

#[tokio::test]
async fn cancelled_callback_short_circuits_with_user_error() {
    let client = MockClient::new(vec![]);
    let driver =
        Driver::connect(Zibal::new(), json!({"merchantId": "2134"}), client.clone()).unwrap();

    let params = json!({"trackId": "12345", "success": "0", "status": "3"})
        .as_object()
        .unwrap()
        .clone();
    let error = driver.verify(json!({"amount": 2000}), params).await.unwrap_err();

    assert_eq!(error.current_context().kind(), ErrorKind::User);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn unpaid_order_rejects_with_user_error() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({"result": 202, "message": "not paid"}),
    )]);
    let driver = Driver::connect(Zibal::new(), json!({"merchantId": "2134"}), client).unwrap();

    let error = driver
        .verify(json!({"amount": 2000}), ok_callback("12345"))
        .await
        .unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::User);
}

#[tokio::test]
async fn invalid_options_fail_before_any_network_call() {
    let client = MockClient::new(vec![]);
    let driver =
        Driver::connect(Zibal::new(), json!({"merchantId": "2134"}), client.clone()).unwrap();

    let error = driver
        .request(json!({"amount": 0, "callbackUrl": "nope"}))
        .await
        .unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::Validation);
    assert_eq!(client.call_count(), 0);
}
