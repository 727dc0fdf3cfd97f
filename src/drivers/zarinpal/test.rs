use serde_json::json;

use crate::driver::Driver;
use crate::errors::ErrorKind;
use crate::request::Method;
use crate::test_utils::MockClient;
use crate::types::{CallbackParams, TransactionId};

use super::transformers::{ZarinpalConfig, ZarinpalPurchaseRequest, ZarinpalRequestOptions};
use super::Zarinpal;

fn ok_callback(authority: &str) -> CallbackParams {
    json!({"Authority": authority, "Status": "OK"})
        .as_object()
        .unwrap()
        .clone()
}

#[tokio::test]
async fn purchase_returns_a_get_redirect_onto_the_authority() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({
            "data": {"code": 100, "message": "Success", "authority": "A0000012345", "fee_type": "Merchant", "fee": 100},
            "errors": [],
        }),
    )]);
    let driver = Driver::connect(Zarinpal::new(), json!({"merchantId": "m-36ch"}), client).unwrap();

    let info = driver
        .request(json!({"amount": 20000, "callbackUrl": "https://shop.example/cb", "mobile": "09120000000"}))
        .await
        .unwrap();

    assert_eq!(info.method, Method::Get);
    assert_eq!(info.url, "https://www.zarinpal.com/pg/StartPay/A0000012345");
    assert_eq!(info.reference_id, "A0000012345");
}

#[tokio::test]
async fn sandbox_flag_switches_every_endpoint() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({
            "data": {"code": 100, "message": "Success", "authority": "A1", "fee_type": "Merchant", "fee": 0},
            "errors": [],
        }),
    )]);
    let driver = Driver::connect(
        Zarinpal::new(),
        json!({"merchantId": "m", "sandbox": true}),
        client.clone(),
    )
    .unwrap();

    let info = driver
        .request(json!({"amount": 1000, "callbackUrl": "https://shop.example/cb"}))
        .await
        .unwrap();

    assert_eq!(
        client.calls()[0].1,
        "https://sandbox.zarinpal.com/pg/v4/payment/request.json"
    );
    assert!(info.url.starts_with("https://sandbox.zarinpal.com/pg/StartPay/"));
}

#[test]
fn unrecognized_options_pass_through_to_the_gateway() {
    let config: ZarinpalConfig = serde_json::from_value(json!({
        "merchantId": "m",
        "links": {
            "request": "https://api.zarinpal.com/pg/v4/payment/request.json",
            "verify": "https://api.zarinpal.com/pg/v4/payment/verify.json",
            "payment": "https://www.zarinpal.com/pg/StartPay/",
        },
    }))
    .unwrap();
    let options: ZarinpalRequestOptions = serde_json::from_value(json!({
        "amount": 20000,
        "callbackUrl": "https://shop.example/cb",
        "currency": "IRT",
    }))
    .unwrap();

    let request = ZarinpalPurchaseRequest::try_from((&config, &options)).unwrap();
    let wire = serde_json::to_value(&request).unwrap();
    assert_eq!(wire["currency"], json!("IRT"));
    assert_eq!(wire["merchant_id"], json!("m"));
    assert_eq!(wire["amount"], json!(20000));
}

#[tokio::test]
async fn merchant_side_codes_reject_with_bad_config() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({
            "data": [],
            "errors": {"code": -11, "message": "merchant inactive", "validations": []},
        }),
    )]);
    let driver = Driver::connect(Zarinpal::new(), json!({"merchantId": "m"}), client).unwrap();

    let error = driver
        .request(json!({"amount": 20000, "callbackUrl": "https://shop.example/cb"}))
        .await
        .unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::BadConfig);
}

#[tokio::test]
async fn undocumented_codes_reject_with_gateway_failure() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({"data": [], "errors": {"code": -77, "message": "?", "validations": []}}),
    )]);
    let driver = Driver::connect(Zarinpal::new(), json!({"merchantId": "m"}), client).unwrap();

    let error = driver
        .request(json!({"amount": 20000, "callbackUrl": "https://shop.example/cb"}))
        .await
        .unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::GatewayFailure);
}

#[tokio::test]
async fn verify_maps_the_provider_reference_into_the_receipt() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({
            "data": {
                "code": 100,
                "message": "Verified",
                "ref_id": 201,
                "card_pan": "5022-29**-****-2328",
                "card_hash": "hash",
                "fee_type": "Merchant",
                "fee": 100,
            },
            "errors": [],
        }),
    )]);
    let driver = Driver::connect(Zarinpal::new(), json!({"merchantId": "m"}), client).unwrap();

    let receipt = driver
        .verify(json!({"amount": 20000}), ok_callback("A0000012345"))
        .await
        .unwrap();

    assert_eq!(receipt.transaction_id, TransactionId::Numeric(201));
    assert_eq!(receipt.card_pan.as_deref(), Some("5022-29**-****-2328"));
    assert_eq!(receipt.raw["ref_id"], json!(201));
}

#[tokio::test]
async fn failed_callback_short_circuits_without_a_network_call() {
    let client = MockClient::new(vec![]);
    let driver =
        Driver::connect(Zarinpal::new(), json!({"merchantId": "m"}), client.clone()).unwrap();

    let params = json!({"Authority": "A0000012345", "Status": "NOK"})
        .as_object()
        .unwrap()
        .clone();
    let error = driver.verify(json!({"amount": 20000}), params).await.unwrap_err();

    assert_eq!(error.current_context().kind(), ErrorKind::GatewayFailure);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn user_side_verify_codes_reject_with_user_error() {
    let client = MockClient::new(vec![MockClient::json(
        200,
        json!({"data": [], "errors": {"code": -51, "message": "session failed", "validations": []}}),
    )]);
    let driver = Driver::connect(Zarinpal::new(), json!({"merchantId": "m"}), client).unwrap();

    let error = driver
        .verify(json!({"amount": 20000}), ok_callback("A1"))
        .await
        .unwrap_err();
    assert_eq!(error.current_context().kind(), ErrorKind::User);
}

#[test]
fn missing_merchant_id_fails_construction_before_any_network_call() {
    let client = MockClient::new(vec![]);
    let error =
        Driver::connect(Zarinpal::new(), json!({"sandbox": true}), client.clone()).unwrap_err();

    assert_eq!(error.current_context().kind(), ErrorKind::Validation);
    assert_eq!(client.call_count(), 0);
}
