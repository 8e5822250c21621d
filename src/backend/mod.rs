//! Backend side of the item API
//!
//! [`WardrobeController`] answers `/items` requests from a [`Model`] chosen
//! through [`ModelFactory`].

pub mod model;
pub mod controller;

pub use controller::{ControllerResponse, WardrobeController};
pub use model::{Model, ModelFactory, ModelKind, SqliteModel};
