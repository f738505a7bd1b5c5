//! Delivery or pickup selection.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the customer wants to receive the order.
///
/// There is exactly one of these per visitor, held in the view-state store;
/// the navigation bar and the restaurant page both read and write it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    #[default]
    Delivery,
    Pickup,
}

impl DeliveryMethod {
    pub const ALL: [Self; 2] = [Self::Delivery, Self::Pickup];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "delivery",
            Self::Pickup => "pickup",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delivery => "Delivery",
            Self::Pickup => "Pickup",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown delivery method string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown delivery method: {0}")]
pub struct UnknownDeliveryMethod(pub String);

impl FromStr for DeliveryMethod {
    type Err = UnknownDeliveryMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(Self::Delivery),
            "pickup" => Ok(Self::Pickup),
            other => Err(UnknownDeliveryMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_delivery() {
        assert_eq!(DeliveryMethod::default(), DeliveryMethod::Delivery);
    }

    #[test]
    fn test_parse_round_trips_as_str() {
        for method in DeliveryMethod::ALL {
            assert_eq!(method.as_str().parse::<DeliveryMethod>(), Ok(method));
        }
        assert!("drone".parse::<DeliveryMethod>().is_err());
    }
}
