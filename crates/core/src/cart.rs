//! The shopping cart.
//!
//! A cart only ever holds dishes from one restaurant. [`can_add`] is the rule
//! the restaurant page uses to disable its buttons, and [`Cart::add`] applies
//! the same rule again so no caller can slip a mixed cart into the store.

use serde::{Deserialize, Serialize};

use crate::types::{MenuItem, MenuItemId, Price, RestaurantId};

/// Label of an enabled add-to-cart button.
pub const ADD_TO_CART_LABEL: &str = "Add to Cart";

/// Label of an add-to-cart button disabled by [`can_add`].
pub const OTHER_RESTAURANT_LABEL: &str = "Items from another restaurant in cart";

/// Errors returned when a cart mutation would break its invariants.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartError {
    #[error(
        "Your cart contains items from a different restaurant. Please clear your cart or complete your existing order first."
    )]
    OtherRestaurant {
        cart: RestaurantId,
        requested: RestaurantId,
    },
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Price,
    pub restaurant_id: RestaurantId,
    pub food_image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// A single unit of `item`, ordered from `restaurant_id`.
    #[must_use]
    pub fn single(item: &MenuItem, restaurant_id: RestaurantId) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: item.price,
            restaurant_id,
            food_image: item.food_image.clone(),
            quantity: 1,
        }
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Whether an item from `target` may join a cart holding `items`.
///
/// True when the cart is empty or every line already belongs to `target`.
#[must_use]
pub fn can_add(items: &[CartItem], target: RestaurantId) -> bool {
    items.iter().all(|item| item.restaurant_id == target)
}

/// Cart contents, scoped to a single restaurant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The restaurant every line belongs to, if the cart has any lines.
    #[must_use]
    pub fn restaurant_id(&self) -> Option<RestaurantId> {
        self.items.first().map(|item| item.restaurant_id)
    }

    /// Whether an item from `restaurant_id` may be added.
    #[must_use]
    pub fn accepts(&self, restaurant_id: RestaurantId) -> bool {
        can_add(&self.items, restaurant_id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Add a line, merging quantities when the dish is already present.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OtherRestaurant`] if the cart holds dishes from a
    /// different restaurant, or [`CartError::ZeroQuantity`] for an empty line.
    /// The cart is unchanged on error.
    pub fn add(&mut self, item: CartItem) -> Result<(), CartError> {
        if item.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        if let Some(cart) = self.restaurant_id()
            && !self.accepts(item.restaurant_id)
        {
            return Err(CartError::OtherRestaurant {
                cart,
                requested: item.restaurant_id,
            });
        }

        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
        Ok(())
    }

    /// Remove a dish entirely. Returns whether anything was removed.
    pub fn remove(&mut self, id: MenuItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
