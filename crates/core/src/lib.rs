//! Nom Now Core - Domain types and view-state store.
//!
//! This crate provides the pieces of Nom Now that do not touch the network:
//! - [`types`] - Newtype IDs, prices, emails, and the backend's records
//! - [`cart`] - The single-restaurant cart and its consistency rule
//! - [`review_form`] - Review form validation and submission states
//! - [`store`] - The view-state store mutated through dispatched actions
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. The storefront crate loads a [`store::ViewState`] per visitor,
//! runs backend calls, and feeds their results back in as [`store::Action`]s.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod review_form;
pub mod store;
pub mod types;

pub use cart::{Cart, CartError, CartItem, can_add};
pub use review_form::{ReviewDraft, ReviewForm, ReviewFormError, ReviewFormStatus};
pub use store::{Action, Modal, RestaurantsState, ViewState};
pub use types::*;
