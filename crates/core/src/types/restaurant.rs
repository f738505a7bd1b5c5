//! Restaurant records.

use serde::{Deserialize, Serialize};

use super::{Price, RestaurantId};

/// A restaurant as served by `GET /api/restaurants/:id`.
///
/// Read-only from the storefront's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(default)]
    pub cuisine_type: Option<String>,
    /// Dollar-sign price band, e.g. `"$$"`.
    #[serde(default)]
    pub price_level: Option<String>,
    /// Estimated delivery time in minutes.
    #[serde(default)]
    pub delivery_time: Option<u32>,
    #[serde(default)]
    pub delivery_fee: Option<Price>,
    #[serde(default)]
    pub business_hours: Option<String>,
    #[serde(default)]
    pub store_image: Option<String>,
}

impl Restaurant {
    #[must_use]
    pub fn full_address(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address, self.city, self.state, self.zip
        )
    }

    /// Fee banner, e.g. `"$2.99 Delivery Fee on $15+"`.
    #[must_use]
    pub fn delivery_fee_label(&self) -> String {
        let fee = self.delivery_fee.filter(|fee| *fee != Price::ZERO);
        fee.map_or_else(
            || "$0 Delivery Fee on $15+".to_string(),
            |fee| format!("{fee} Delivery Fee on $15+"),
        )
    }

    /// Delivery time, e.g. `"25 min"`.
    #[must_use]
    pub fn delivery_time_label(&self) -> Option<String> {
        self.delivery_time.map(|minutes| format!("{minutes} min"))
    }
}
