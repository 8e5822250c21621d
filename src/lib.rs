//! # Wardrobe Core
//!
//! Wardrobe item persistence, synchronization and filtering.
//!
//! ## Features
//!
//! - In-process event bus decoupling mutations from view refreshes
//! - Local SQLite object store for wardrobe items and outfits
//! - REST client for the remote item repository, statistics and suggestions
//! - Filterable grid view driven by bus events
//! - Backend item controller over a pluggable model
//!
//! ## Example
//!
//! ```no_run
//! use wardrobe_core::{EventBus, EventName, Season, StoreLocation, WardrobeItem, WardrobeItemStore};
//!
//! let bus = EventBus::new();
//! bus.subscribe(EventName::ItemStoreSuccess, |event| {
//!     println!("stored: {:?}", event.payload);
//! });
//!
//! let mut store = WardrobeItemStore::new(StoreLocation::InMemory, bus.clone());
//! let mut item = WardrobeItem::new("Blue Jacket", [Season::Fall, Season::Winter]);
//! item.item_id = Some(1);
//! store.create(&item).unwrap();
//! ```

pub mod backend;
pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod logging;
pub mod remote;
pub mod store;
pub mod view;

// Re-export main types
pub use backend::{ControllerResponse, Model, ModelFactory, ModelKind, WardrobeController};
pub use config::WardrobeConfig;
pub use database::models::{ItemId, Occasion, Outfit, Season, WardrobeItem};
pub use database::StoreLocation;
pub use error::{Result, WardrobeError};
pub use events::{Event, EventBus, EventName, EventPayload};
pub use logging::init_tracing;
pub use remote::{RemoteRepository, Statistic};
pub use store::{OutfitStore, WardrobeItemStore};
pub use view::{FilterState, WardrobeGrid, WardrobeView, apply_filters};

/// Default remote API base
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/v1/";

/// Local object store schema version
pub const STORE_VERSION: i32 = database::schema::SCHEMA_VERSION;
