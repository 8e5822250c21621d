//! Wardrobe grid view
//!
//! - [`filter`] pure filtering over a snapshot
//! - [`grid`] render model for the item cards
//! - [`component`] the stateful view driven by bus events

pub mod filter;
pub mod grid;
pub mod component;

pub use component::{CLEAR_FAILURE_ALERT, ViewCommand, ViewState, WardrobeView};
pub use filter::{FilterState, apply_filters};
pub use grid::{Attribute, FavoriteIcon, ItemCard, WardrobeGrid};
