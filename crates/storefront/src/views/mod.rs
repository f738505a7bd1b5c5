//! View models.
//!
//! Each view is a plain struct built from a [`ViewState`] and handed to an
//! askama template. Templates only print fields and branch on flags; every
//! decision (which links to show, whether a button is disabled) is made here
//! where it can be unit tested.

pub mod cart;
pub mod navigation;
pub mod restaurant_detail;
pub mod reviews;

use nom_now_core::{DeliveryMethod, ViewState};

pub use cart::CartView;
pub use navigation::NavView;
pub use restaurant_detail::{AddToCartButton, MenuCardView, RestaurantDetailView, RestaurantPage};
pub use reviews::{ReviewFormView, ReviewItemView};

/// One button of a delivery/pickup toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Both toggle buttons, with the store's method marked selected.
///
/// The navigation bar and the restaurant page render the same list, so the
/// two toggles always agree.
#[must_use]
pub fn delivery_options(current: DeliveryMethod) -> Vec<DeliveryOption> {
    DeliveryMethod::ALL
        .into_iter()
        .map(|method| DeliveryOption {
            value: method.as_str(),
            label: method.label(),
            selected: method == current,
        })
        .collect()
}

/// The parts every full page renders around its content.
#[derive(Debug, Clone)]
pub struct PageChrome {
    pub nav: NavView,
    pub review_form: Option<ReviewFormView>,
    /// One-shot message, consumed by this render.
    pub notice: Option<String>,
    /// Where toggle and modal forms send the visitor back to.
    pub current_path: String,
}

impl PageChrome {
    /// Build the chrome for the page at `current_path` and consume the
    /// pending notice.
    pub fn take(store: &mut ViewState, current_path: &str) -> Self {
        let notice = store.take_notice();
        Self {
            nav: NavView::from_store(store),
            review_form: store.review_form().map(ReviewFormView::from),
            notice,
            current_path: current_path.to_string(),
        }
    }
}
