//! Pay.ir's documented endpoints and status-code table.

use crate::errors::{CodeTable, ErrorKind};

pub mod links {
    pub const REQUEST: &str = "https://pay.ir/pg/send";
    pub const VERIFY: &str = "https://pay.ir/pg/verify";
    pub const PAYMENT: &str = "https://pay.ir/pg/";
}

/// The api key the gateway honors on its sandbox.
pub const SANDBOX_API_KEY: &str = "test";

/// One table serves every phase: pay.ir reuses its status codes across
/// send, callback and verify. Codes the documentation omits classify as
/// gateway failures.
pub const STATUS_CODES: CodeTable = CodeTable::new(&[
    (
        "0",
        ErrorKind::User,
        "payment was cancelled or failed on the payer side",
    ),
    ("-1", ErrorKind::BadConfig, "api key was not supplied"),
    (
        "-2",
        ErrorKind::GatewayFailure,
        "token was not supplied or has expired",
    ),
    ("-3", ErrorKind::BadConfig, "api key is not valid"),
    (
        "-4",
        ErrorKind::BadConfig,
        "gateway is suspended or not yet approved",
    ),
    ("-5", ErrorKind::GatewayFailure, "transaction was not found"),
    (
        "-8",
        ErrorKind::GatewayFailure,
        "transaction was already verified",
    ),
]);
