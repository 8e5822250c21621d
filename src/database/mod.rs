//! Database layer for Wardrobe Core
//!
//! Handles SQLite operations including:
//! - Lazy creation of the local object store tables
//! - Keyed JSON record storage for the local adapters
//! - Column-mapped item storage for the backend model

pub mod models;
pub mod schema;
pub mod connection;
pub mod queries;

pub use connection::{Database, StoreLocation};
pub use models::*;
