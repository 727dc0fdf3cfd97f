//! One request/verify contract over many incompatible payment gateways.
//!
//! Each supported gateway plugs an adapter into the driver framework: the
//! adapter declares config/options shapes, per-flow wire behavior and its
//! provider's error-code tables, and gets back a config-bound [`Driver`]
//! exposing the uniform lifecycle:
//!
//! 1. `request` — open a payment, receive a [`PaymentInfo`] redirect
//!    instruction for the payer's browser;
//! 2. `verify` — confirm the payment the payer returned from, receive a
//!    normalized [`Receipt`].
//!
//! Provider failures classify into the closed [`ErrorKind`] taxonomy, so
//! callers handle errors without knowing which gateway they talk to.
//!
//! ```no_run
//! # async fn demo() {
//! use std::sync::Arc;
//! use serde_json::json;
//! use multipay::{driver_for, Gateway, ReqwestClient};
//!
//! let client = Arc::new(ReqwestClient::new().expect("client"));
//! let driver = driver_for(Gateway::Zarinpal, json!({"merchantId": "xxxx"}), client)
//!     .expect("valid config");
//!
//! let info = driver
//!     .request(json!({"amount": 20000, "callbackUrl": "https://shop.example/cb"}))
//!     .await
//!     .expect("payment opened");
//! // redirect the payer using `info`, then on the callback:
//! # let callback_params = serde_json::Map::new();
//! let receipt = driver
//!     .verify(json!({"amount": 20000}), callback_params)
//!     .await
//!     .expect("payment verified");
//! # }
//! ```

pub mod driver;
pub mod drivers;
pub mod errors;
pub mod flow;
pub mod redirect;
pub mod request;
pub mod schema;
pub mod service;
pub mod soap;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use driver::{Driver, GatewayAdapter, PaymentDriver};
pub use drivers::{driver_for, Gateway};
pub use errors::{CustomResult, ErrorKind, PaymentError, ValidationError};
pub use redirect::PaymentInfo;
pub use service::{ApiClient, ReqwestClient};
pub use types::{Amount, CallbackParams, Receipt, TransactionId};
