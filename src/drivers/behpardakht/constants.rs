//! Behpardakht Mellat (PGW) endpoints and response-code table.

use crate::errors::{CodeTable, ErrorKind};

pub mod links {
    pub const REQUEST: &str = "https://bpm.shaparak.ir/pgwchannel/services/pgw";
    pub const VERIFY: &str = "https://bpm.shaparak.ir/pgwchannel/services/pgw";
    pub const PAYMENT: &str = "https://bpm.shaparak.ir/pgwchannel/startpay.mellat";
}

/// Namespace of the PGW SOAP service.
pub const SOAP_NAMESPACE: &str = "http://interfaces.core.sw.bps.com/";
/// PGW wraps every operation's answer in a `return` element.
pub const RESULT_ELEMENT: &str = "return";

/// `ResCode` reported after settlement when the transaction was already
/// settled; treated as success, settling twice is a no-op on the gateway.
pub const ALREADY_SETTLED: &str = "45";

/// One `ResCode` table serves pay, verify and settle. The documented list
/// is long and still incomplete; missing codes classify as gateway
/// failures.
pub const RES_CODES: CodeTable = CodeTable::new(&[
    ("11", ErrorKind::User, "card number is not valid"),
    ("12", ErrorKind::User, "balance is not sufficient"),
    ("13", ErrorKind::User, "entered pin is not valid"),
    ("14", ErrorKind::User, "allowed pin attempts exceeded"),
    ("15", ErrorKind::User, "card is not valid"),
    ("17", ErrorKind::User, "payer abandoned the transaction"),
    ("18", ErrorKind::User, "card has expired"),
    ("19", ErrorKind::User, "withdrawal amount exceeds the allowed limit"),
    ("21", ErrorKind::BadConfig, "merchant is not valid"),
    ("24", ErrorKind::BadConfig, "merchant user information is not valid"),
    ("25", ErrorKind::GatewayFailure, "amount is not valid"),
    ("31", ErrorKind::GatewayFailure, "response is malformed"),
    ("34", ErrorKind::GatewayFailure, "system error"),
    ("41", ErrorKind::BadConfig, "order id is a duplicate"),
    ("48", ErrorKind::GatewayFailure, "transaction was already reversed"),
    ("421", ErrorKind::BadConfig, "merchant ip address is not valid"),
]);
