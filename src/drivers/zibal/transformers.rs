//! Zibal wire types and conversions.

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};

use super::constants;
use crate::errors::{CustomResult, PaymentError};
use crate::redirect::PaymentInfo;
use crate::types::{Amount, GatewayLinks, Receipt, RequestOptions, TransactionId};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZibalConfig {
    pub merchant_id: String,
    pub links: GatewayLinks,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZibalRequestOptions {
    #[serde(flatten)]
    pub base: RequestOptions,
    pub mobile: Option<String>,
    pub order_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZibalPurchaseRequest {
    merchant: String,
    amount: Amount,
    callback_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_id: Option<String>,
}

impl TryFrom<(&ZibalConfig, &ZibalRequestOptions)> for ZibalPurchaseRequest {
    type Error = Report<PaymentError>;

    fn try_from(
        (config, options): (&ZibalConfig, &ZibalRequestOptions),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            merchant: config.merchant_id.clone(),
            amount: options.base.amount,
            callback_url: options.base.callback_url.to_string(),
            description: options.base.description.clone(),
            mobile: options.mobile.clone(),
            order_id: options.order_id.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZibalPurchaseResponse {
    pub result: i64,
    pub message: Option<String>,
    pub track_id: Option<i64>,
}

pub fn purchase_payment_info(
    config: &ZibalConfig,
    response: ZibalPurchaseResponse,
) -> CustomResult<PaymentInfo, PaymentError> {
    if response.result != 100 {
        return Err(Report::new(
            constants::PURCHASE_RESULTS.classify(&response.result.to_string()),
        ));
    }
    let track_id = response.track_id.ok_or_else(|| {
        Report::new(PaymentError::gateway_failure())
            .attach_printable("successful response did not carry a track id")
    })?;
    Ok(PaymentInfo::via_token(
        &config.links.payment,
        track_id.to_string(),
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZibalVerifyRequest {
    merchant: String,
    track_id: String,
}

impl ZibalVerifyRequest {
    pub fn new(config: &ZibalConfig, track_id: String) -> Self {
        Self {
            merchant: config.merchant_id.clone(),
            track_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZibalVerifyResponse {
    pub result: i64,
    pub message: Option<String>,
    pub status: Option<i64>,
    pub amount: Option<u64>,
    pub ref_number: Option<i64>,
    pub card_number: Option<String>,
    pub paid_at: Option<String>,
    pub order_id: Option<String>,
    pub description: Option<String>,
}

pub fn verify_receipt(response: ZibalVerifyResponse) -> CustomResult<Receipt, PaymentError> {
    if response.result != 100 {
        return Err(Report::new(
            constants::VERIFY_RESULTS.classify(&response.result.to_string()),
        ));
    }
    let ref_number = response.ref_number.ok_or_else(|| {
        Report::new(PaymentError::gateway_failure())
            .attach_printable("verified response did not carry a reference number")
    })?;
    let card_pan = response.card_number.clone();
    let raw = serde_json::to_value(&response).change_context(PaymentError::gateway_failure())?;
    Ok(Receipt {
        transaction_id: TransactionId::Numeric(ref_number),
        card_pan,
        raw,
    })
}
