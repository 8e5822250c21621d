//! Generic keyed object store
//!
//! One [`ObjectStore`] owns one connection to one table. Records are kept as
//! JSON documents under their key; every mutation reports its outcome on the
//! [`EventBus`] as well as through its return value.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::WardrobeConfig;
use crate::database::queries;
use crate::database::schema::StoreSchema;
use crate::database::{Database, StoreLocation};
use crate::error::{Result, WardrobeError};
use crate::events::{EventBus, EventName, EventPayload};

/// Event names a store reports its outcomes with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreEvents {
    pub store_success: EventName,
    pub store_failure: EventName,
    pub new_record: EventName,
    pub load_failure: EventName,
    pub clear_success: EventName,
    pub clear_failure: EventName,
}

/// A record type that can live in an [`ObjectStore`]
pub trait StoreRecord: Serialize + DeserializeOwned + Clone {
    /// Table layout
    const SCHEMA: StoreSchema;
    /// Outcome events
    const EVENTS: StoreEvents;

    /// The record's key, if it has one yet
    fn key(&self) -> Option<i64>;

    /// Stamp the key assigned by the store
    fn set_key(&mut self, key: i64);

    /// Wrap the record as an event payload
    fn payload(&self) -> EventPayload;

    /// Record invariants checked before every write
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A record type supporting whole-record updates
pub trait UpdatableRecord: StoreRecord {
    const UPDATE_SUCCESS: EventName;
    const UPDATE_FAILURE: EventName;
}

/// A record type that can be removed one key at a time.
///
/// Outfits are not; their store only clears as a whole:
///
/// ```compile_fail
/// use wardrobe_core::{EventBus, OutfitStore, StoreLocation};
///
/// let mut store = OutfitStore::new(StoreLocation::InMemory, EventBus::new());
/// store.delete_by_key(1).unwrap();
/// ```
pub trait DeletableRecord: StoreRecord {}

/// Keyed CRUD adapter over one local table
pub struct ObjectStore<R: StoreRecord> {
    location: StoreLocation,
    db: Option<Database>,
    bus: EventBus,
    _record: PhantomData<R>,
}

impl<R: StoreRecord> ObjectStore<R> {
    /// Adapter for the store at `location`. Nothing is opened until first use.
    pub fn new(location: StoreLocation, bus: EventBus) -> Self {
        Self {
            location,
            db: None,
            bus,
            _record: PhantomData,
        }
    }

    /// Adapter for the store configured in `config`
    pub fn from_config(config: &WardrobeConfig, bus: EventBus) -> Self {
        Self::new(config.local_store.clone(), bus)
    }

    /// Open the connection and create the table if needed. Idempotent.
    pub fn open(&mut self) -> Result<()> {
        if self.db.is_some() {
            return Ok(());
        }

        let db = Database::open(&self.location)?;
        db.ensure_store(&R::SCHEMA).map_err(|e| {
            WardrobeError::StorageUnavailable(format!("{}: {e}", R::SCHEMA.name))
        })?;

        tracing::debug!(store = R::SCHEMA.name, "object store opened");
        self.db = Some(db);
        Ok(())
    }

    /// True once [`open`](Self::open) has succeeded
    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    pub(crate) fn database(&mut self) -> Result<&Database> {
        self.open()?;
        self.db
            .as_ref()
            .ok_or_else(|| WardrobeError::StorageUnavailable("Database not open".to_string()))
    }

    pub(crate) fn bus(&self) -> &EventBus {
        &self.bus
    }

    fn emit_failure(&self, name: EventName, err: &WardrobeError) {
        tracing::error!(store = R::SCHEMA.name, event = %name, "{err}");
        self.bus.emit(name, Some(EventPayload::Error(err.to_string())));
    }

    /// Insert a new record and return it with its key.
    ///
    /// Fails with [`WardrobeError::DuplicateKey`] if the key exists. Stores
    /// without auto-increment require the record to carry its key.
    pub fn create(&mut self, record: &R) -> Result<R> {
        let result = self.insert(record);
        match &result {
            Ok(stored) => self.bus.emit(R::EVENTS.store_success, Some(stored.payload())),
            Err(e) => self.emit_failure(R::EVENTS.store_failure, e),
        }
        result
    }

    fn insert(&mut self, record: &R) -> Result<R> {
        let key = record.key();
        if key.is_none() && !R::SCHEMA.auto_increment {
            return Err(WardrobeError::ValidationError(format!(
                "{} record is missing key {}",
                R::SCHEMA.name,
                R::SCHEMA.key_path
            )));
        }
        record.validate()?;

        let json = serde_json::to_string(record)?;
        let conn = self.database()?.connection()?;
        let assigned = queries::insert_record(conn, &R::SCHEMA, key, &json)?;

        let mut stored = record.clone();
        stored.set_key(assigned);
        Ok(stored)
    }

    /// Every record in the store. Emits one new-record event per record.
    pub fn read_all(&mut self) -> Result<Vec<R>> {
        let result = self.load_all();
        match &result {
            Ok(records) => {
                for record in records {
                    self.bus.emit(R::EVENTS.new_record, Some(record.payload()));
                }
            }
            Err(e) => self.emit_failure(R::EVENTS.load_failure, e),
        }
        result
    }

    fn load_all(&mut self) -> Result<Vec<R>> {
        let conn = self.database()?.connection()?;
        queries::get_all_records(conn, &R::SCHEMA)?
            .into_iter()
            .map(|(key, json)| decode::<R>(key, &json))
            .collect()
    }

    /// One record by key
    pub fn get(&mut self, key: i64) -> Result<Option<R>> {
        let conn = self.database()?.connection()?;
        queries::get_record(conn, &R::SCHEMA, key)?
            .map(|json| decode::<R>(key, &json))
            .transpose()
    }

    /// Remove every record
    pub fn clear_all(&mut self) -> Result<()> {
        let result = self
            .database()
            .and_then(|db| queries::clear_records(db.connection()?, &R::SCHEMA));
        match result {
            Ok(removed) => {
                tracing::debug!(store = R::SCHEMA.name, removed, "store cleared");
                self.bus.emit(R::EVENTS.clear_success, None);
                Ok(())
            }
            Err(e) => {
                self.emit_failure(R::EVENTS.clear_failure, &e);
                Err(e)
            }
        }
    }
}

impl<R: DeletableRecord> ObjectStore<R> {
    /// Remove one record. Deleting an absent key succeeds.
    pub fn delete_by_key(&mut self, key: i64) -> Result<()> {
        let result = self
            .database()
            .and_then(|db| queries::delete_record(db.connection()?, &R::SCHEMA, key));
        match result {
            Ok(removed) => {
                tracing::debug!(store = R::SCHEMA.name, key, removed, "record deleted");
                self.bus.emit(R::EVENTS.clear_success, None);
                Ok(())
            }
            Err(e) => {
                self.emit_failure(R::EVENTS.clear_failure, &e);
                Err(e)
            }
        }
    }
}

impl<R: UpdatableRecord> ObjectStore<R> {
    /// Write `record` under its own key, replacing whatever is there
    pub fn put(&mut self, record: &R) -> Result<()> {
        let key = record.key().ok_or_else(|| {
            WardrobeError::ValidationError(format!(
                "{} record is missing key {}",
                R::SCHEMA.name,
                R::SCHEMA.key_path
            ))
        })?;
        record.validate()?;
        let json = serde_json::to_string(record)?;
        let conn = self.database()?.connection()?;
        queries::put_record(conn, &R::SCHEMA, key, &json)
    }

    /// Replace the record under `key` with `record`.
    ///
    /// This is a get followed by a put; callers supply the complete record.
    /// An absent key fails with [`WardrobeError::NotFound`] and emits nothing.
    pub fn update_by_key(&mut self, key: i64, record: &R) -> Result<()> {
        if self.get(key)?.is_none() {
            return Err(WardrobeError::NotFound(format!(
                "{} {} = {key}",
                R::SCHEMA.name,
                R::SCHEMA.key_path
            )));
        }

        let mut record = record.clone();
        record.set_key(key);
        self.put_and_report(&record)
    }

    pub(crate) fn put_and_report(&mut self, record: &R) -> Result<()> {
        match self.put(record) {
            Ok(()) => {
                self.bus.emit(R::UPDATE_SUCCESS, Some(record.payload()));
                Ok(())
            }
            Err(e) => {
                self.emit_failure(R::UPDATE_FAILURE, &e);
                Err(e)
            }
        }
    }
}

fn decode<R: StoreRecord>(key: i64, json: &str) -> Result<R> {
    let mut record: R = serde_json::from_str(json)?;
    record.set_key(key);
    Ok(record)
}
