//! The closed set of supported gateways and their static registry.

pub mod behpardakht;
pub mod payir;
pub mod saman;
pub mod zarinpal;
pub mod zibal;

pub use behpardakht::Behpardakht;
pub use payir::Payir;
pub use saman::Saman;
pub use zarinpal::Zarinpal;
pub use zibal::Zibal;

use std::sync::Arc;

use serde_json::Value;

use crate::driver::{Driver, PaymentDriver};
use crate::errors::{CustomResult, PaymentError};
use crate::service::ApiClient;

/// Every gateway this crate can drive. Adding one means adding a variant
/// here and an arm in [`driver_for`]; nothing is resolved at runtime by
/// name lookup beyond this enum.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Gateway {
    Zarinpal,
    Zibal,
    Payir,
    Saman,
    Behpardakht,
}

/// Builds a config-bound driver for `gateway`. Construction validates the
/// config; a failure here is terminal and no network I/O has happened.
pub fn driver_for(
    gateway: Gateway,
    raw_config: Value,
    client: Arc<dyn ApiClient>,
) -> CustomResult<Box<dyn PaymentDriver>, PaymentError> {
    Ok(match gateway {
        Gateway::Zarinpal => Box::new(Driver::connect(Zarinpal::new(), raw_config, client)?),
        Gateway::Zibal => Box::new(Driver::connect(Zibal::new(), raw_config, client)?),
        Gateway::Payir => Box::new(Driver::connect(Payir::new(), raw_config, client)?),
        Gateway::Saman => Box::new(Driver::connect(Saman::new(), raw_config, client)?),
        Gateway::Behpardakht => {
            Box::new(Driver::connect(Behpardakht::new(), raw_config, client)?)
        }
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn gateway_names_round_trip() {
        for gateway in Gateway::iter() {
            assert_eq!(Gateway::from_str(&gateway.to_string()).unwrap(), gateway);
        }
        assert_eq!(Gateway::Behpardakht.to_string(), "behpardakht");
        assert!(Gateway::from_str("unknown-gateway").is_err());
    }
}
