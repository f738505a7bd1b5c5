//! Cache types for backend responses.

use nom_now_core::{MenuItem, MenuItemId, Restaurant, RestaurantId};

/// Cache key for restaurants and menu items.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Restaurants,
    Restaurant(RestaurantId),
    MenuItems,
    MenuItem(MenuItemId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Restaurants(Vec<Restaurant>),
    Restaurant(Box<Restaurant>),
    MenuItems(Vec<MenuItem>),
    MenuItem(Box<MenuItem>),
}
