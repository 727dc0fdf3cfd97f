//! Behpardakht wire conversions. PGW answers every operation with either a
//! bare `ResCode` or a `"ResCode, payload"` pair in one string.

use error_stack::Report;
use masking::{PeekInterface, Secret};
use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;

use super::constants;
use crate::errors::{CustomResult, PaymentError};
use crate::redirect::PaymentInfo;
use crate::types::{
    callback_field, CallbackParams, GatewayLinks, Receipt, RequestOptions, TransactionId,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehpardakhtConfig {
    pub terminal_id: i64,
    pub username: String,
    pub password: Secret<String>,
    pub links: GatewayLinks,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehpardakhtRequestOptions {
    #[serde(flatten)]
    pub base: RequestOptions,
    /// PGW requires a merchant-unique numeric order id; defaults to the
    /// current timestamp when the caller does not track one.
    pub order_id: Option<i64>,
    pub payer_id: Option<String>,
}

/// Fields of `bpPayRequest`, in the gateway's declared order.
pub fn purchase_fields(
    config: &BehpardakhtConfig,
    options: &BehpardakhtRequestOptions,
) -> Vec<(&'static str, String)> {
    let now = OffsetDateTime::now_utc();
    let order_id = options
        .order_id
        .unwrap_or_else(|| now.unix_timestamp());
    vec![
        ("terminalId", config.terminal_id.to_string()),
        ("userName", config.username.clone()),
        ("userPassword", config.password.peek().clone()),
        ("orderId", order_id.to_string()),
        ("amount", options.base.amount.to_string()),
        (
            "localDate",
            format!("{:04}{:02}{:02}", now.year(), now.month() as u8, now.day()),
        ),
        (
            "localTime",
            format!("{:02}{:02}{:02}", now.hour(), now.minute(), now.second()),
        ),
        (
            "additionalData",
            options.base.description.clone().unwrap_or_default(),
        ),
        ("callBackUrl", options.base.callback_url.to_string()),
        (
            "payerId",
            options.payer_id.clone().unwrap_or_else(|| "0".to_owned()),
        ),
    ]
}

/// `bpPayRequest` answers `"0, RefId"` on success and a bare code on
/// failure. The payer is sent to the payment page with a POST carrying the
/// reference; PGW does not open it from a link.
pub fn purchase_payment_info(
    config: &BehpardakhtConfig,
    result: &str,
) -> CustomResult<PaymentInfo, PaymentError> {
    let mut parts = result.splitn(2, ',');
    let code = parts.next().unwrap_or_default().trim();
    if code != "0" {
        return Err(Report::new(constants::RES_CODES.classify(code)));
    }
    let ref_id = parts
        .next()
        .map(str::trim)
        .filter(|reference| !reference.is_empty())
        .ok_or_else(|| {
            Report::new(PaymentError::gateway_failure())
                .attach_printable("successful pay request did not carry a reference")
        })?;
    Ok(PaymentInfo::via_form(
        &config.links.payment,
        ref_id.to_owned(),
        std::collections::HashMap::from([("RefId".to_owned(), ref_id.to_owned())]),
    ))
}

/// Fields shared by `bpVerifyRequest` and `bpSettleRequest`, read back from
/// the callback the gateway itself produced.
pub fn confirmation_fields(
    config: &BehpardakhtConfig,
    params: &CallbackParams,
) -> CustomResult<Vec<(&'static str, String)>, PaymentError> {
    let sale_order_id = callback_field(params, "saleOrderId")?;
    let sale_reference_id = callback_field(params, "SaleReferenceId")?;
    Ok(vec![
        ("terminalId", config.terminal_id.to_string()),
        ("userName", config.username.clone()),
        ("userPassword", config.password.peek().clone()),
        ("orderId", sale_order_id.clone()),
        ("saleOrderId", sale_order_id),
        ("saleReferenceId", sale_reference_id),
    ])
}

pub fn verify_receipt(
    result: &str,
    params: &CallbackParams,
) -> CustomResult<Receipt, PaymentError> {
    let code = result.trim();
    if code != "0" {
        return Err(Report::new(constants::RES_CODES.classify(code)));
    }
    let ref_id = callback_field(params, "RefId")?;
    let card_pan = callback_field(params, "CardHolderPan").ok();
    Ok(Receipt {
        transaction_id: TransactionId::Text(ref_id),
        card_pan,
        raw: Value::Object(params.clone()),
    })
}

pub fn check_settle_result(result: &str) -> CustomResult<(), PaymentError> {
    let code = result.trim();
    if code == "0" || code == constants::ALREADY_SETTLED {
        return Ok(());
    }
    Err(Report::new(constants::RES_CODES.classify(code)))
}
