//! Local object store adapters
//!
//! One adapter per entity kind, each bound to one table:
//! - [`WardrobeItemStore`] keyed by `item_id`, with update and favorite toggle
//! - [`OutfitStore`] keyed by an auto-incrementing `id`, create/read/clear only

pub mod object_store;
pub mod wardrobe;
pub mod outfit;

pub use object_store::{DeletableRecord, ObjectStore, StoreEvents, StoreRecord, UpdatableRecord};
pub use outfit::OutfitStore;
pub use wardrobe::WardrobeItemStore;
