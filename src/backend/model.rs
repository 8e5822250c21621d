//! Backend persistence model
//!
//! The controller talks to a [`Model`]; [`ModelFactory`] picks the concrete
//! storage. Only SQLite is provided.

use std::path::PathBuf;

use crate::database::schema::CREATE_WARDROBE_ITEMS_TABLE;
use crate::database::{Database, ItemId, StoreLocation, WardrobeItem, queries};
use crate::error::{Result, WardrobeError};

/// Item persistence used by the controller
pub trait Model: Send {
    /// Every item, in id order
    fn read(&self) -> Result<Vec<WardrobeItem>>;

    /// Items owned by `user_id`
    fn read_for_user(&self, user_id: &str) -> Result<Vec<WardrobeItem>>;

    fn get(&self, item_id: ItemId) -> Result<Option<WardrobeItem>>;

    /// Insert `item` and return the stored record with its assigned id
    fn create(&mut self, item: &WardrobeItem) -> Result<WardrobeItem>;

    /// Overwrite an existing item; `None` if no such id
    fn update(&mut self, item_id: ItemId, item: &WardrobeItem) -> Result<Option<WardrobeItem>>;

    /// Delete one item, or every item when `item_id` is `None`. Returns rows removed.
    fn delete(&mut self, item_id: Option<ItemId>) -> Result<usize>;
}

/// Which storage a model is built on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelKind {
    /// Fresh in-memory database
    SqliteFresh,
    /// Database file, created if missing
    Sqlite(PathBuf),
}

/// SQLite-backed model over the `wardrobe_items` table
pub struct SqliteModel {
    db: Database,
}

impl SqliteModel {
    pub fn open(location: &StoreLocation) -> Result<Self> {
        let db = Database::open(location)?;
        db.connection()?.execute_batch(CREATE_WARDROBE_ITEMS_TABLE)?;
        tracing::debug!(location = ?location, "backend model opened");
        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Model for SqliteModel {
    fn read(&self) -> Result<Vec<WardrobeItem>> {
        queries::get_all_items(self.db.connection()?)
    }

    fn read_for_user(&self, user_id: &str) -> Result<Vec<WardrobeItem>> {
        queries::get_items_for_user(self.db.connection()?, user_id)
    }

    fn get(&self, item_id: ItemId) -> Result<Option<WardrobeItem>> {
        queries::get_item(self.db.connection()?, item_id)
    }

    fn create(&mut self, item: &WardrobeItem) -> Result<WardrobeItem> {
        item.validate()?;
        let conn = self.db.connection()?;
        let item_id = queries::create_item(conn, item)?;
        queries::get_item(conn, item_id)?.ok_or_else(|| {
            WardrobeError::DatabaseError(format!("Item {item_id} missing after insert"))
        })
    }

    fn update(&mut self, item_id: ItemId, item: &WardrobeItem) -> Result<Option<WardrobeItem>> {
        item.validate()?;
        let conn = self.db.connection()?;
        if queries::update_item(conn, item_id, item)? == 0 {
            return Ok(None);
        }
        queries::get_item(conn, item_id)
    }

    fn delete(&mut self, item_id: Option<ItemId>) -> Result<usize> {
        let conn = self.db.connection()?;
        match item_id {
            Some(id) => queries::delete_item(conn, id),
            None => queries::delete_all_items(conn),
        }
    }
}

/// Builds models by kind
pub struct ModelFactory;

impl ModelFactory {
    pub fn get_model(kind: &ModelKind) -> Result<Box<dyn Model>> {
        let location = match kind {
            ModelKind::SqliteFresh => StoreLocation::InMemory,
            ModelKind::Sqlite(path) => StoreLocation::File(path.clone()),
        };
        Ok(Box::new(SqliteModel::open(&location)?))
    }
}
