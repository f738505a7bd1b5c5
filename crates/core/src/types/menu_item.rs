//! Menu items.

use chrono::{DateTime, NaiveDateTime};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::{MenuItemId, Price, RestaurantId};

/// A dish on a restaurant's menu.
///
/// The backend has served both `foodType`/`foodImage` and the snake_case
/// spellings over time, so both are accepted. Timestamps are informational;
/// one the backend formats unexpectedly decodes as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    #[serde(alias = "restaurant_id")]
    pub restaurant_id: RestaurantId,
    pub name: String,
    #[serde(default, alias = "food_type")]
    pub food_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default, alias = "food_image")]
    pub food_image: Option<String>,
    #[serde(default, alias = "created_at", deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, alias = "updated_at", deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<NaiveDateTime>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => parse_timestamp(&text),
        Some(Raw::Other(_)) | None => None,
    })
}

/// Naive ISO-8601 first, then the zoned RFC 3339 and RFC 2822 forms
/// normalised to UTC.
fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    text.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_utc()))
        .or_else(|| DateTime::parse_from_rfc2822(text).ok().map(|dt| dt.naive_utc()))
}

/// Body of `PUT /api/menu-items/:id/update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: String,
    pub food_type: String,
    pub description: String,
    pub price: Price,
    pub food_image: String,
}

/// The subset of `items` that belongs to `restaurant_id`, in original order.
///
/// The backend only offers the whole menu-item collection, so the restaurant
/// page narrows it client-side.
#[must_use]
pub fn menu_for_restaurant(items: &[MenuItem], restaurant_id: RestaurantId) -> Vec<&MenuItem> {
    items
        .iter()
        .filter(|item| item.restaurant_id == restaurant_id)
        .collect()
}
