//! Shared domain types: amounts, options, callback data and receipts.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CustomResult, PaymentError};
use crate::schema::{FieldKind, Schema};

/// A purchase amount in the gateway's own currency unit. Always positive;
/// shape validation rejects zero and non-integers before this type is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Caller-supplied purchase parameters common to every gateway. Gateways wrap
/// this with `#[serde(flatten)]` and add their own extras.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    pub amount: Amount,
    /// Absolute URL the gateway sends the payer back to after payment.
    pub callback_url: url::Url,
    pub description: Option<String>,
}

/// Caller-supplied data needed to verify a completed payment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOptions {
    /// The original purchase amount, cross-checked against the
    /// gateway-reported amount where the gateway requires it.
    pub amount: Amount,
}

/// The fields shared by every gateway's request-options shape.
pub fn base_request_schema() -> Schema {
    Schema::object()
        .field("amount", FieldKind::PositiveInteger)
        .field("callbackUrl", FieldKind::Url)
        .optional("description", FieldKind::Text)
}

/// The fields shared by every gateway's verify-options shape.
pub fn base_verify_schema() -> Schema {
    Schema::object().field("amount", FieldKind::PositiveInteger)
}

/// The shape of a gateway's endpoint set: where to request, where to verify,
/// and where to send the payer.
pub fn links_schema() -> Schema {
    Schema::object()
        .field("request", FieldKind::Url)
        .field("verify", FieldKind::Url)
        .field("payment", FieldKind::Url)
}

/// A gateway's endpoint set. Every config carries one, with documented
/// defaults merged in at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayLinks {
    pub request: String,
    pub verify: String,
    pub payment: String,
}

/// Raw query parameters the gateway appended to the callback URL. The shape
/// is gateway-defined and opaque to the framework: it reaches the adapter
/// unvalidated.
pub type CallbackParams = serde_json::Map<String, Value>;

/// Pulls a callback field as text, tolerating the numeric values some
/// gateways send. A missing field means the gateway broke its own callback
/// contract, so it surfaces as a gateway failure.
pub fn callback_field(params: &CallbackParams, name: &str) -> CustomResult<String, PaymentError> {
    match params.get(name) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        _ => Err(PaymentError::gateway_failure_with(
            "callback",
            format!("callback parameters are missing `{name}`"),
        )
        .into()),
    }
}

/// A status or error code as a gateway sends it: some gateways answer with
/// numbers, some with strings, some with either depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderCode {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProviderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => number.fmt(f),
            Self::Text(text) => text.fmt(f),
        }
    }
}

/// A gateway-assigned transaction identifier. Gateways disagree on whether
/// these are numbers or strings; both survive decoding without lossy
/// stringification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    Numeric(i64),
    Text(String),
}

impl TransactionId {
    /// Parses digit-only text into the numeric form, the way gateways that
    /// send numbers as strings expect to be read back.
    pub fn parse(text: &str) -> Self {
        match text.parse::<i64>() {
            Ok(number) => Self::Numeric(number),
            Err(_) => Self::Text(text.to_owned()),
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(number) => number.fmt(f),
            Self::Text(text) => text.fmt(f),
        }
    }
}

impl From<i64> for TransactionId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Normalized verification result, created once per successful verification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub transaction_id: TransactionId,
    /// Masked card identifier where the gateway reports one.
    pub card_pan: Option<String>,
    /// The raw gateway response, preserved untouched for audit and debugging.
    pub raw: Value,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn transaction_id_parse_keeps_numbers_numeric() {
        assert_eq!(TransactionId::parse("111111"), TransactionId::Numeric(111111));
        assert_eq!(
            TransactionId::parse("A-12"),
            TransactionId::Text("A-12".to_owned())
        );
    }

    #[test]
    fn callback_field_reads_strings_and_numbers() {
        let mut params = CallbackParams::new();
        params.insert("RefNum".to_owned(), json!("123456"));
        params.insert("Amount".to_owned(), json!(20000));
        assert_eq!(callback_field(&params, "RefNum").unwrap(), "123456");
        assert_eq!(callback_field(&params, "Amount").unwrap(), "20000");
        assert!(callback_field(&params, "Missing").is_err());
    }

    #[test]
    fn base_request_schema_requires_amount_and_callback() {
        let error = base_request_schema().validate(&json!({})).unwrap_err();
        let paths: Vec<_> = error.issues.iter().map(|issue| issue.path.as_str()).collect();
        assert!(paths.contains(&"amount"));
        assert!(paths.contains(&"callbackUrl"));
    }
}
