//! Saman electronic payment (SEP) endpoints and code tables.

use crate::errors::{CodeTable, ErrorKind};

pub mod links {
    pub const REQUEST: &str = "https://sep.shaparak.ir/onlinepg/onlinepg";
    pub const VERIFY: &str = "https://sep.shaparak.ir/payments/referencepayment.asmx";
    pub const PAYMENT: &str = "https://sep.shaparak.ir/OnlinePG/SendToken";
}

/// Namespace of the reference-payment SOAP service.
pub const SOAP_NAMESPACE: &str = "urn:sep.referencepayment";
/// The element carrying `verifyTransaction`'s return value.
pub const VERIFY_RESULT_ELEMENT: &str = "result";

/// Error codes on the token endpoint.
pub const PURCHASE_ERRORS: CodeTable = CodeTable::new(&[
    ("-1", ErrorKind::GatewayFailure, "token request was not valid"),
    ("-3", ErrorKind::GatewayFailure, "amount is not valid"),
    ("-105", ErrorKind::BadConfig, "terminal is not active"),
    (
        "-106",
        ErrorKind::BadConfig,
        "merchant ip address is not allowed",
    ),
]);

/// `State` values the gateway reports on the callback.
pub const CALLBACK_STATES: CodeTable = CodeTable::new(&[
    (
        "CanceledByUser",
        ErrorKind::User,
        "payment was cancelled by the payer",
    ),
    (
        "InvalidParameters",
        ErrorKind::GatewayFailure,
        "gateway rejected the payment parameters",
    ),
    (
        "MerchantIpAddressIsInvalid",
        ErrorKind::BadConfig,
        "merchant ip address is not registered",
    ),
    (
        "TerminalNotFound",
        ErrorKind::BadConfig,
        "terminal id is not valid",
    ),
    (
        "TokenNotFound",
        ErrorKind::GatewayFailure,
        "payment token was not found",
    ),
]);

/// Negative return values of `verifyTransaction`.
pub const VERIFY_ERRORS: CodeTable = CodeTable::new(&[
    ("-1", ErrorKind::GatewayFailure, "input data was not valid"),
    (
        "-2",
        ErrorKind::GatewayFailure,
        "no transaction was found for this reference",
    ),
    (
        "-6",
        ErrorKind::GatewayFailure,
        "transaction was already reversed",
    ),
    ("-104", ErrorKind::BadConfig, "terminal is not active"),
    (
        "-105",
        ErrorKind::BadConfig,
        "terminal id was not sent or is not valid",
    ),
    (
        "-106",
        ErrorKind::BadConfig,
        "merchant ip address is not allowed",
    ),
]);
