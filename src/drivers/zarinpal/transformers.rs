//! Zarinpal wire types and conversions.

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants;
use crate::errors::{CodeTable, CustomResult, PaymentError};
use crate::redirect::PaymentInfo;
use crate::types::{
    Amount, GatewayLinks, Receipt, RequestOptions, TransactionId, VerifyOptions,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZarinpalConfig {
    pub merchant_id: String,
    #[serde(default)]
    pub sandbox: bool,
    pub links: GatewayLinks,
}

impl ZarinpalConfig {
    /// The sandbox flag overrides every endpoint at once; a sandboxed
    /// merchant id is only honored there.
    pub fn links(&self) -> GatewayLinks {
        if self.sandbox {
            GatewayLinks {
                request: constants::sandbox_links::REQUEST.to_owned(),
                verify: constants::sandbox_links::VERIFY.to_owned(),
                payment: constants::sandbox_links::PAYMENT.to_owned(),
            }
        } else {
            self.links.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZarinpalRequestOptions {
    #[serde(flatten)]
    pub base: RequestOptions,
    pub mobile: Option<String>,
    pub email: Option<String>,
    /// Fields the shape passes through untyped; forwarded to the gateway
    /// verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct ZarinpalPurchaseRequest {
    merchant_id: String,
    amount: Amount,
    callback_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    metadata: ZarinpalMetadata,
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct ZarinpalMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

impl TryFrom<(&ZarinpalConfig, &ZarinpalRequestOptions)> for ZarinpalPurchaseRequest {
    type Error = Report<PaymentError>;

    fn try_from(
        (config, options): (&ZarinpalConfig, &ZarinpalRequestOptions),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            merchant_id: config.merchant_id.clone(),
            amount: options.base.amount,
            callback_url: options.base.callback_url.to_string(),
            description: options.base.description.clone(),
            metadata: ZarinpalMetadata {
                mobile: options.mobile.clone(),
                email: options.email.clone(),
            },
            extra: options.extra.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ZarinpalVerifyRequest {
    merchant_id: String,
    amount: Amount,
    authority: String,
}

impl ZarinpalVerifyRequest {
    pub fn new(config: &ZarinpalConfig, options: &VerifyOptions, authority: String) -> Self {
        Self {
            merchant_id: config.merchant_id.clone(),
            amount: options.amount,
            authority,
        }
    }
}

/// Zarinpal fills the unused half of its response envelope with an empty
/// array instead of null, so each half decodes as an object-or-array union
/// discriminated by shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Half<T> {
    Value(T),
    Empty(Vec<Value>),
}

impl<T> Half<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Empty(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ZarinpalEnvelope<T> {
    pub data: Half<T>,
    pub errors: Half<ZarinpalError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZarinpalError {
    pub code: i64,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZarinpalPurchaseData {
    pub code: i64,
    pub message: Option<String>,
    pub authority: String,
    pub fee_type: Option<String>,
    pub fee: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZarinpalVerifyData {
    pub code: i64,
    pub message: Option<String>,
    pub ref_id: i64,
    pub card_pan: Option<String>,
    pub card_hash: Option<String>,
    pub fee_type: Option<String>,
    pub fee: Option<i64>,
}

fn error_from(errors: Half<ZarinpalError>, table: &CodeTable) -> Report<PaymentError> {
    match errors.into_value() {
        Some(error) => Report::new(table.classify(&error.code.to_string())),
        None => Report::new(PaymentError::gateway_failure())
            .attach_printable("gateway answered with neither data nor errors"),
    }
}

pub fn purchase_payment_info(
    config: &ZarinpalConfig,
    envelope: ZarinpalEnvelope<ZarinpalPurchaseData>,
) -> CustomResult<PaymentInfo, PaymentError> {
    match envelope.data.into_value() {
        Some(data) => Ok(PaymentInfo::via_token(
            &config.links().payment,
            data.authority,
        )),
        None => Err(error_from(envelope.errors, &constants::PURCHASE_ERRORS)),
    }
}

pub fn verify_receipt(
    envelope: ZarinpalEnvelope<ZarinpalVerifyData>,
) -> CustomResult<Receipt, PaymentError> {
    match envelope.data.into_value() {
        Some(data) => {
            let raw = serde_json::to_value(&data)
                .change_context(PaymentError::gateway_failure())?;
            Ok(Receipt {
                transaction_id: TransactionId::Numeric(data.ref_id),
                card_pan: data.card_pan,
                raw,
            })
        }
        None => Err(error_from(envelope.errors, &constants::VERIFY_ERRORS)),
    }
}
