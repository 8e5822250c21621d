//! SQL query operations for database access
//!
//! This module provides low-level query functions. The local object store
//! keeps each record as a JSON document next to its key; the backend items
//! table uses real columns. For component-level operations use
//! [`crate::store`] and [`crate::backend`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

use super::models::{ItemId, Occasion, Season, WardrobeItem};
use super::schema::StoreSchema;
use crate::error::{Result, WardrobeError};

/// Timestamp format used in database
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a DateTime for database storage
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp from database
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()
        .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
}

/// Get current timestamp formatted for database
pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

// ============================================================================
// Object store queries
// ============================================================================

/// Insert a new record.
///
/// With `key = None` the engine assigns the next sequential key. Returns the
/// stored key; an existing key fails with [`WardrobeError::DuplicateKey`].
pub fn insert_record(
    conn: &Connection,
    store: &StoreSchema,
    key: Option<i64>,
    record: &str,
) -> Result<i64> {
    let inserted = match key {
        Some(key) => conn.execute(
            &format!(
                "INSERT INTO \"{}\" ({}, record) VALUES (?, ?)",
                store.name, store.key_path
            ),
            params![key, record],
        ),
        None => conn.execute(
            &format!("INSERT INTO \"{}\" (record) VALUES (?)", store.name),
            params![record],
        ),
    };

    match inserted {
        Ok(_) => Ok(key.unwrap_or_else(|| conn.last_insert_rowid())),
        Err(e) if is_constraint_violation(&e) => Err(WardrobeError::DuplicateKey(format!(
            "{} {} = {}",
            store.name,
            store.key_path,
            key.map(|k| k.to_string()).unwrap_or_default()
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Get one record by key
pub fn get_record(conn: &Connection, store: &StoreSchema, key: i64) -> Result<Option<String>> {
    let record = conn
        .query_row(
            &format!(
                "SELECT record FROM \"{}\" WHERE {} = ?",
                store.name, store.key_path
            ),
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(record)
}

/// Get every record with its key
pub fn get_all_records(conn: &Connection, store: &StoreSchema) -> Result<Vec<(i64, String)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {key}, record FROM \"{name}\" ORDER BY {key}",
        key = store.key_path,
        name = store.name
    ))?;

    let records = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    records.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Insert or overwrite the record stored under `key`
pub fn put_record(conn: &Connection, store: &StoreSchema, key: i64, record: &str) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO \"{}\" ({}, record) VALUES (?, ?)",
            store.name, store.key_path
        ),
        params![key, record],
    )?;
    Ok(())
}

/// Delete the record under `key`. Returns rows removed (0 for an absent key).
pub fn delete_record(conn: &Connection, store: &StoreSchema, key: i64) -> Result<usize> {
    let removed = conn.execute(
        &format!("DELETE FROM \"{}\" WHERE {} = ?", store.name, store.key_path),
        params![key],
    )?;
    Ok(removed)
}

/// Delete every record in the store
pub fn clear_records(conn: &Connection, store: &StoreSchema) -> Result<usize> {
    let removed = conn.execute(&format!("DELETE FROM \"{}\"", store.name), [])?;
    Ok(removed)
}

// ============================================================================
// Backend items queries
// ============================================================================

const ITEM_COLUMNS: &str = "item_id, user_id, name, brand, cost, size, category, occasion, \
                            seasons, is_favorite, image, created_at";

/// Join seasons for the `seasons` column
pub fn format_seasons(seasons: &BTreeSet<Season>) -> String {
    seasons
        .iter()
        .map(Season::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Split the `seasons` column
pub fn parse_seasons(raw: &str) -> Result<BTreeSet<Season>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<Season>)
        .collect()
}

fn conversion_error(idx: usize, err: WardrobeError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<WardrobeItem> {
    let occasion: String = row.get(7)?;
    let seasons: String = row.get(8)?;
    let created_at: Option<String> = row.get(11)?;

    Ok(WardrobeItem {
        item_id: Some(row.get(0)?),
        user_id: row.get(1)?,
        name: row.get(2)?,
        brand: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        cost: row.get::<_, Option<f64>>(4)?.unwrap_or_default(),
        size: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        category: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        occasion: occasion.parse::<Occasion>().map_err(|e| conversion_error(7, e))?,
        seasons: parse_seasons(&seasons).map_err(|e| conversion_error(8, e))?,
        is_favorite: row.get::<_, i32>(9)? != 0,
        image: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
        created_at: created_at.as_deref().and_then(parse_timestamp),
    })
}

/// Get all items
pub fn get_all_items(conn: &Connection) -> Result<Vec<WardrobeItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM wardrobe_items ORDER BY item_id"
    ))?;
    let items = stmt.query_map([], item_from_row)?;
    items.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Get all items owned by `user_id`
pub fn get_items_for_user(conn: &Connection, user_id: &str) -> Result<Vec<WardrobeItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM wardrobe_items WHERE user_id = ? ORDER BY item_id"
    ))?;
    let items = stmt.query_map(params![user_id], item_from_row)?;
    items.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Get one item by id
pub fn get_item(conn: &Connection, item_id: ItemId) -> Result<Option<WardrobeItem>> {
    let item = conn
        .query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM wardrobe_items WHERE item_id = ?"),
            params![item_id],
            item_from_row,
        )
        .optional()?;
    Ok(item)
}

/// Insert a new item and return its assigned id.
///
/// `created_at` defaults to now when the record carries none.
pub fn create_item(conn: &Connection, item: &WardrobeItem) -> Result<ItemId> {
    let created_at = item
        .created_at
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(now_timestamp);

    conn.execute(
        "INSERT INTO wardrobe_items (user_id, name, brand, cost, size, category, occasion,
                                     seasons, is_favorite, image, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            item.user_id,
            item.name,
            item.brand,
            item.cost,
            item.size,
            item.category,
            item.occasion.as_str(),
            format_seasons(&item.seasons),
            item.is_favorite as i32,
            item.image,
            created_at
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite every mutable column of an existing item. Returns rows changed.
pub fn update_item(conn: &Connection, item_id: ItemId, item: &WardrobeItem) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE wardrobe_items
         SET user_id = COALESCE(?, user_id), name = ?, brand = ?, cost = ?, size = ?,
             category = ?, occasion = ?, seasons = ?, is_favorite = ?, image = ?
         WHERE item_id = ?",
        params![
            item.user_id,
            item.name,
            item.brand,
            item.cost,
            item.size,
            item.category,
            item.occasion.as_str(),
            format_seasons(&item.seasons),
            item.is_favorite as i32,
            item.image,
            item_id
        ],
    )?;
    Ok(changed)
}

/// Delete one item
pub fn delete_item(conn: &Connection, item_id: ItemId) -> Result<usize> {
    let removed = conn.execute("DELETE FROM wardrobe_items WHERE item_id = ?", params![item_id])?;
    Ok(removed)
}

/// Delete every item
pub fn delete_all_items(conn: &Connection) -> Result<usize> {
    let removed = conn.execute("DELETE FROM wardrobe_items", [])?;
    Ok(removed)
}
