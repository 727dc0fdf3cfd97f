//! Saman wire types and conversions.

use std::collections::HashMap;

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants;
use crate::errors::{CustomResult, PaymentError};
use crate::redirect::PaymentInfo;
use crate::types::{
    callback_field, Amount, CallbackParams, GatewayLinks, ProviderCode, Receipt,
    RequestOptions, TransactionId, VerifyOptions,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamanConfig {
    pub merchant_id: String,
    pub links: GatewayLinks,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamanRequestOptions {
    #[serde(flatten)]
    pub base: RequestOptions,
    pub mobile: Option<String>,
    pub order_id: Option<String>,
}

/// The token request. SEP multiplexes its online endpoint by `Action`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SamanPurchaseRequest {
    action: &'static str,
    terminal_id: String,
    amount: Amount,
    redirect_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    res_num: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cell_number: Option<String>,
}

impl TryFrom<(&SamanConfig, &SamanRequestOptions)> for SamanPurchaseRequest {
    type Error = Report<PaymentError>;

    fn try_from(
        (config, options): (&SamanConfig, &SamanRequestOptions),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            action: "token",
            terminal_id: config.merchant_id.clone(),
            amount: options.base.amount,
            redirect_url: options.base.callback_url.to_string(),
            res_num: options.order_id.clone(),
            cell_number: options.mobile.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamanPurchaseResponse {
    pub status: i64,
    pub token: Option<String>,
    pub error_code: Option<ProviderCode>,
    pub error_desc: Option<String>,
}

/// A successful token turns into an auto-submitting POST form aimed at the
/// payment page; SEP does not accept the token as a plain link.
pub fn purchase_payment_info(
    config: &SamanConfig,
    response: SamanPurchaseResponse,
) -> CustomResult<PaymentInfo, PaymentError> {
    if response.status != 1 {
        let code = response
            .error_code
            .map(|code| code.to_string())
            .unwrap_or_default();
        return Err(Report::new(constants::PURCHASE_ERRORS.classify(&code)));
    }
    let token = response.token.ok_or_else(|| {
        Report::new(PaymentError::gateway_failure())
            .attach_printable("successful response did not carry a token")
    })?;
    Ok(PaymentInfo::via_form(
        &config.links.payment,
        token.clone(),
        HashMap::from([
            ("Token".to_owned(), token),
            ("GetMethod".to_owned(), "true".to_owned()),
        ]),
    ))
}

/// Fields `verifyTransaction` expects, in the gateway's declared order.
pub fn verify_fields(config: &SamanConfig, ref_num: &str) -> Vec<(&'static str, String)> {
    vec![
        ("refNum", ref_num.to_owned()),
        ("merchantId", config.merchant_id.clone()),
    ]
}

/// `verifyTransaction` answers with a single number: the settled amount on
/// success, a negative error code otherwise. The verified amount must match
/// what the caller says they sold for.
pub fn verify_receipt(
    result: &str,
    options: &VerifyOptions,
    params: &CallbackParams,
) -> CustomResult<Receipt, PaymentError> {
    let value = result
        .trim()
        .parse::<f64>()
        .change_context(PaymentError::gateway_failure())
        .attach_printable("verify result was not numeric")?;
    if value < 0.0 {
        return Err(Report::new(
            constants::VERIFY_ERRORS.classify(&(value as i64).to_string()),
        ));
    }
    if value as u64 != options.amount.get() {
        return Err(Report::new(PaymentError::gateway_failure_with(
            "amount-mismatch",
            format!(
                "gateway settled {} but the caller expected {}",
                value as u64,
                options.amount
            ),
        )));
    }

    let trace_no = callback_field(params, "TraceNo")?;
    let card_pan = callback_field(params, "SecurePan").ok();
    Ok(Receipt {
        transaction_id: TransactionId::parse(&trace_no),
        card_pan,
        raw: Value::Object(params.clone()),
    })
}
