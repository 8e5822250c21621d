//! Data models for wardrobe entities

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WardrobeError};

/// Server-assigned item identity
pub type ItemId = i64;

/// Season an item can be worn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// All seasons, in calendar order
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }

    /// Capitalized control label
    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }

    /// The full season set, the default filter selection
    pub fn all() -> BTreeSet<Season> {
        Self::ALL.into_iter().collect()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = WardrobeError;

    fn from_str(s: &str) -> Result<Self> {
        Season::ALL
            .into_iter()
            .find(|season| season.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WardrobeError::ValidationError(format!("Unknown season: {s}")))
    }
}

impl TryFrom<String> for Season {
    type Error = WardrobeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Season> for String {
    fn from(season: Season) -> Self {
        season.as_str().to_string()
    }
}

/// Occasion an item is suited for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Occasion {
    /// Suits every occasion; as a filter selection it disables occasion filtering
    #[default]
    Any,
    Formal,
    Casual,
    Business,
    Party,
    Lounge,
    Other,
}

impl Occasion {
    /// All occasions, in dropdown order
    pub const ALL: [Occasion; 7] = [
        Occasion::Any,
        Occasion::Formal,
        Occasion::Casual,
        Occasion::Business,
        Occasion::Party,
        Occasion::Lounge,
        Occasion::Other,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Any => "any",
            Occasion::Formal => "formal",
            Occasion::Casual => "casual",
            Occasion::Business => "business",
            Occasion::Party => "party",
            Occasion::Lounge => "lounge",
            Occasion::Other => "other",
        }
    }

    /// Capitalized control label
    pub fn label(&self) -> &'static str {
        match self {
            Occasion::Any => "Any",
            Occasion::Formal => "Formal",
            Occasion::Casual => "Casual",
            Occasion::Business => "Business",
            Occasion::Party => "Party",
            Occasion::Lounge => "Lounge",
            Occasion::Other => "Other",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Occasion {
    type Err = WardrobeError;

    fn from_str(s: &str) -> Result<Self> {
        Occasion::ALL
            .into_iter()
            .find(|occasion| occasion.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WardrobeError::ValidationError(format!("Unknown occasion: {s}")))
    }
}

impl TryFrom<String> for Occasion {
    type Error = WardrobeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Occasion> for String {
    fn from(occasion: Occasion) -> Self {
        occasion.as_str().to_string()
    }
}

/// One garment in a user's wardrobe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardrobeItem {
    /// Assigned by the persistence layer on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
    /// Owning user (scopes remote reads)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cost: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub occasion: Occasion,
    #[serde(default, deserialize_with = "null_as_default")]
    pub seasons: BTreeSet<Season>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_favorite: bool,
    /// Image URL or data reference
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl WardrobeItem {
    /// New unsaved item with the given name and seasons; every other attribute defaulted
    pub fn new(name: impl Into<String>, seasons: impl IntoIterator<Item = Season>) -> Self {
        Self {
            item_id: None,
            user_id: None,
            name: name.into(),
            brand: String::new(),
            cost: 0.0,
            size: String::new(),
            category: String::new(),
            occasion: Occasion::Any,
            seasons: seasons.into_iter().collect(),
            is_favorite: false,
            image: String::new(),
            created_at: None,
        }
    }

    /// Check record invariants before it is persisted
    pub fn validate(&self) -> Result<()> {
        if self.seasons.is_empty() {
            return Err(WardrobeError::ValidationError(
                "An item must belong to at least one season".to_string(),
            ));
        }
        Ok(())
    }

    /// Identity as shown to the search filter; unsaved items have none
    pub fn id_string(&self) -> String {
        self.item_id.map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Saved grouping of items. The payload is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    /// Auto-assigned sequential key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl Outfit {
    /// New unsaved outfit carrying `payload`
    pub fn new(payload: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { id: None, payload }
    }
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `created_at` codec: RFC 3339 out, RFC 3339 or SQLite `YYYY-MM-DD HH:MM:SS` in
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::database::queries::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
                    .ok()
                    .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
            })
    }
}
