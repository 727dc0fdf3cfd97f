//! Zibal's documented endpoints and result-code tables.

use crate::errors::{CodeTable, ErrorKind};

pub mod links {
    pub const REQUEST: &str = "https://gateway.zibal.ir/v1/request";
    pub const VERIFY: &str = "https://gateway.zibal.ir/v1/verify";
    pub const PAYMENT: &str = "https://gateway.zibal.ir/start/";
}

/// `result` codes on the request endpoint. Anything undocumented classifies
/// as a gateway failure.
pub const PURCHASE_RESULTS: CodeTable = CodeTable::new(&[
    ("102", ErrorKind::BadConfig, "merchant was not found"),
    ("103", ErrorKind::BadConfig, "merchant is not active"),
    ("104", ErrorKind::BadConfig, "merchant is not valid"),
    (
        "105",
        ErrorKind::GatewayFailure,
        "amount must be greater than 1,000 rials",
    ),
    ("106", ErrorKind::GatewayFailure, "callback url is not valid"),
    (
        "113",
        ErrorKind::GatewayFailure,
        "amount exceeds the transaction cap",
    ),
]);

/// `result` codes on the verify endpoint.
pub const VERIFY_RESULTS: CodeTable = CodeTable::new(&[
    ("102", ErrorKind::BadConfig, "merchant was not found"),
    ("103", ErrorKind::BadConfig, "merchant is not active"),
    ("104", ErrorKind::BadConfig, "merchant is not valid"),
    ("201", ErrorKind::GatewayFailure, "payment was already verified"),
    (
        "202",
        ErrorKind::User,
        "order was not paid or the payment failed",
    ),
    ("203", ErrorKind::GatewayFailure, "track id is not valid"),
]);

/// Payment `status` values reported on the callback.
pub const CALLBACK_STATUSES: CodeTable = CodeTable::new(&[
    ("-2", ErrorKind::GatewayFailure, "internal gateway error"),
    ("-1", ErrorKind::GatewayFailure, "payment is still pending"),
    ("2", ErrorKind::GatewayFailure, "paid but not yet verified"),
    ("3", ErrorKind::User, "payment was cancelled by the payer"),
    ("4", ErrorKind::User, "card number is not valid"),
    ("5", ErrorKind::User, "balance is not sufficient"),
    ("6", ErrorKind::User, "entered pin is not valid"),
]);
