//! Top navigation bar.

use nom_now_core::ViewState;

use super::{DeliveryOption, delivery_options};

/// Shown in place of the toggle until the user has a full address.
pub const ADDRESS_PROMPT: &str = "Enter delivery address";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavView {
    /// Name in the account menu; `None` when logged out.
    pub user_name: Option<String>,
    /// Delivery/pickup buttons. Empty means the address prompt is shown.
    pub delivery_options: Vec<DeliveryOption>,
    pub show_cart: bool,
    pub cart_count: u32,
    pub show_auth_links: bool,
}

impl NavView {
    #[must_use]
    pub fn from_store(store: &ViewState) -> Self {
        let user = store.session_user.as_ref();
        let has_address = user.is_some_and(nom_now_core::User::has_delivery_address);

        Self {
            user_name: user.map(|u| u.display_name().to_string()),
            delivery_options: if has_address {
                delivery_options(store.delivery_method)
            } else {
                Vec::new()
            },
            show_cart: has_address,
            cart_count: store.cart.item_count(),
            show_auth_links: user.is_none(),
        }
    }

    #[must_use]
    pub fn shows_address_prompt(&self) -> bool {
        self.delivery_options.is_empty()
    }
}
