//! Pay.ir wire types and conversions.

use error_stack::{Report, ResultExt};
use masking::Secret;
use serde::{Deserialize, Serialize};

use super::constants;
use crate::errors::{CustomResult, PaymentError};
use crate::redirect::PaymentInfo;
use crate::types::{
    Amount, GatewayLinks, ProviderCode, Receipt, RequestOptions, TransactionId,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayirConfig {
    pub api_key: Secret<String>,
    #[serde(default)]
    pub sandbox: bool,
    pub links: GatewayLinks,
}

impl PayirConfig {
    /// On the sandbox the gateway ignores real credentials and expects the
    /// fixed test key instead.
    pub fn effective_api_key(&self) -> Secret<String> {
        if self.sandbox {
            Secret::new(constants::SANDBOX_API_KEY.to_owned())
        } else {
            self.api_key.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayirRequestOptions {
    #[serde(flatten)]
    pub base: RequestOptions,
    pub mobile: Option<String>,
    pub national_code: Option<String>,
    pub valid_card_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayirPurchaseRequest {
    api: Secret<String>,
    amount: Amount,
    redirect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    national_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    valid_card_number: Option<String>,
}

impl TryFrom<(&PayirConfig, &PayirRequestOptions)> for PayirPurchaseRequest {
    type Error = Report<PaymentError>;

    fn try_from(
        (config, options): (&PayirConfig, &PayirRequestOptions),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            api: config.effective_api_key(),
            amount: options.base.amount,
            redirect: options.base.callback_url.to_string(),
            description: options.base.description.clone(),
            mobile: options.mobile.clone(),
            national_code: options.national_code.clone(),
            valid_card_number: options.valid_card_number.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayirPurchaseResponse {
    pub status: ProviderCode,
    pub token: Option<String>,
    pub error_code: Option<ProviderCode>,
    pub error_message: Option<String>,
}

pub fn purchase_payment_info(
    config: &PayirConfig,
    response: PayirPurchaseResponse,
) -> CustomResult<PaymentInfo, PaymentError> {
    if response.status.to_string() != "1" {
        return Err(Report::new(
            constants::STATUS_CODES.classify(&response.status.to_string()),
        ));
    }
    let token = response.token.ok_or_else(|| {
        Report::new(PaymentError::gateway_failure())
            .attach_printable("successful response did not carry a token")
    })?;
    Ok(PaymentInfo::via_token(&config.links.payment, token))
}

#[derive(Debug, Serialize)]
pub struct PayirVerifyRequest {
    api: Secret<String>,
    token: String,
}

impl PayirVerifyRequest {
    pub fn new(config: &PayirConfig, token: String) -> Self {
        Self {
            api: config.effective_api_key(),
            token,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayirVerifyResponse {
    pub status: ProviderCode,
    pub amount: Option<u64>,
    pub trans_id: Option<i64>,
    pub card_number: Option<String>,
    pub message: Option<String>,
}

pub fn verify_receipt(response: PayirVerifyResponse) -> CustomResult<Receipt, PaymentError> {
    if response.status.to_string() != "1" {
        return Err(Report::new(
            constants::STATUS_CODES.classify(&response.status.to_string()),
        ));
    }
    let trans_id = response.trans_id.ok_or_else(|| {
        Report::new(PaymentError::gateway_failure())
            .attach_printable("verified response did not carry a transaction id")
    })?;
    let card_pan = response.card_number.clone();
    let raw = serde_json::to_value(&response).change_context(PaymentError::gateway_failure())?;
    Ok(Receipt {
        transaction_id: TransactionId::Numeric(trans_id),
        card_pan,
        raw,
    })
}
