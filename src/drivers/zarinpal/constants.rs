//! Zarinpal's documented endpoints and error-code tables.

use crate::errors::{CodeTable, ErrorKind};

pub mod links {
    pub const REQUEST: &str = "https://api.zarinpal.com/pg/v4/payment/request.json";
    pub const VERIFY: &str = "https://api.zarinpal.com/pg/v4/payment/verify.json";
    pub const PAYMENT: &str = "https://www.zarinpal.com/pg/StartPay/";
}

pub mod sandbox_links {
    pub const REQUEST: &str = "https://sandbox.zarinpal.com/pg/v4/payment/request.json";
    pub const VERIFY: &str = "https://sandbox.zarinpal.com/pg/v4/payment/verify.json";
    pub const PAYMENT: &str = "https://sandbox.zarinpal.com/pg/StartPay/";
}

/// Documented purchase error codes. The published table has gaps; codes not
/// listed here classify as gateway failures, which is observed behavior
/// rather than a documented contract.
pub const PURCHASE_ERRORS: CodeTable = CodeTable::new(&[
    ("-9", ErrorKind::GatewayFailure, "request validation failed"),
    ("-10", ErrorKind::BadConfig, "terminal ip or merchant id is not valid"),
    ("-11", ErrorKind::BadConfig, "merchant id is not active"),
    ("-12", ErrorKind::GatewayFailure, "too many attempts in a short period"),
    ("-15", ErrorKind::BadConfig, "terminal is suspended"),
    (
        "-16",
        ErrorKind::BadConfig,
        "merchant verification level does not allow this operation",
    ),
]);

/// Documented verification error codes.
pub const VERIFY_ERRORS: CodeTable = CodeTable::new(&[
    (
        "-50",
        ErrorKind::GatewayFailure,
        "paid amount differs from the requested amount",
    ),
    ("-51", ErrorKind::User, "payment was unsuccessful"),
    (
        "-53",
        ErrorKind::BadConfig,
        "payment does not belong to this merchant",
    ),
    ("-54", ErrorKind::GatewayFailure, "authority is not valid"),
    ("101", ErrorKind::GatewayFailure, "payment was already verified"),
]);
