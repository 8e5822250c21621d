//! Database schema definitions

/// Schema version written to `PRAGMA user_version` once stores exist
pub const SCHEMA_VERSION: i32 = 1;

/// Declared shape of one local object store table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSchema {
    /// Table name
    pub name: &'static str,
    /// Column holding the record key
    pub key_path: &'static str,
    /// True if the engine assigns sequential keys
    pub auto_increment: bool,
}

impl StoreSchema {
    /// SQL creating this store's table if it does not exist
    pub fn create_sql(&self) -> String {
        let key = if self.auto_increment {
            format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", self.key_path)
        } else {
            format!("{} INTEGER NOT NULL PRIMARY KEY", self.key_path)
        };
        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\n    {},\n    record TEXT NOT NULL\n)",
            self.name, key
        )
    }
}

/// Wardrobe items, keyed by the server-assigned `item_id`
pub const WARDROBE_ITEM_STORE: StoreSchema = StoreSchema {
    name: "wardrobeItem",
    key_path: "item_id",
    auto_increment: false,
};

/// Outfits, keyed by an auto-incrementing `id`
pub const OUTFIT_STORE: StoreSchema = StoreSchema {
    name: "outfit",
    key_path: "id",
    auto_increment: true,
};

/// SQL to create the backend items table
pub const CREATE_WARDROBE_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS wardrobe_items (
    item_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         TEXT,
    name            TEXT NOT NULL,
    brand           TEXT,
    cost            REAL,
    size            TEXT,
    category        TEXT,
    occasion        TEXT NOT NULL DEFAULT 'any',
    seasons         TEXT NOT NULL,
    is_favorite     INTEGER DEFAULT 0,
    image           TEXT,
    created_at      TEXT
)
"#;
