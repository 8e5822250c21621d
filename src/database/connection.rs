//! Database connection management

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::schema::{self, StoreSchema};
use crate::error::{Result, WardrobeError};

/// Where a SQLite database lives
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreLocation {
    /// Private in-memory database, gone when the connection closes
    #[default]
    InMemory,
    /// Database file on disk
    File(PathBuf),
}

/// Database connection wrapper
pub struct Database {
    /// Where the database was opened from
    location: StoreLocation,
    /// SQLite connection
    conn: Option<Connection>,
}

impl Database {
    /// Open the database at `location`.
    ///
    /// Engine failures surface as [`WardrobeError::StorageUnavailable`].
    pub fn open(location: &StoreLocation) -> Result<Self> {
        let conn = match location {
            StoreLocation::InMemory => Connection::open_in_memory(),
            StoreLocation::File(path) => Connection::open(path),
        }
        .map_err(|e| WardrobeError::StorageUnavailable(e.to_string()))?;

        Ok(Self {
            location: location.clone(),
            conn: Some(conn),
        })
    }

    /// Open a database file at `path`
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(&StoreLocation::File(path.to_path_buf()))
    }

    /// Create `store`'s table if missing and stamp the schema version
    pub fn ensure_store(&self, store: &StoreSchema) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(&store.create_sql(), [])?;
        if self.schema_version()? < schema::SCHEMA_VERSION {
            conn.execute_batch(&format!("PRAGMA user_version = {}", schema::SCHEMA_VERSION))?;
        }
        Ok(())
    }

    /// Current `PRAGMA user_version`; 0 for an untouched database
    pub fn schema_version(&self) -> Result<i32> {
        let version = self
            .connection()?
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Get a reference to the connection
    pub fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or_else(|| {
            WardrobeError::StorageUnavailable("Database not open".to_string())
        })
    }

    /// Where this database was opened from
    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Close the database connection
    pub fn close(&mut self) {
        self.conn = None;
    }

    /// Check if database is open
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        self.close();
    }
}
