//! Event vocabulary

use std::fmt;
use std::str::FromStr;

use crate::database::{Outfit, WardrobeItem};
use crate::error::{Result, WardrobeError};

/// Every event name the wardrobe components publish or listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// An item was stored (locally or remotely)
    ItemStoreSuccess,
    /// Storing an item failed
    ItemStoreFailure,
    /// An item was updated
    ItemUpdateSuccess,
    /// Updating an item failed
    ItemUpdateFailure,
    /// One item or the whole item store was cleared
    ItemClearSuccess,
    /// Clearing failed
    ItemClearFailure,
    /// Emitted once per record while loading items
    ItemNew,
    /// Loading items from the local store failed
    ItemLoadFailure,
    /// The signed-in user changed; payload is the new user id
    UserIdChanged,
    OutfitStoreSuccess,
    OutfitStoreFailure,
    /// Emitted once per record while loading outfits
    OutfitNew,
    OutfitLoadFailure,
    OutfitClearSuccess,
    OutfitClearFailure,
}

impl EventName {
    pub const ALL: [EventName; 15] = [
        EventName::ItemStoreSuccess,
        EventName::ItemStoreFailure,
        EventName::ItemUpdateSuccess,
        EventName::ItemUpdateFailure,
        EventName::ItemClearSuccess,
        EventName::ItemClearFailure,
        EventName::ItemNew,
        EventName::ItemLoadFailure,
        EventName::UserIdChanged,
        EventName::OutfitStoreSuccess,
        EventName::OutfitStoreFailure,
        EventName::OutfitNew,
        EventName::OutfitLoadFailure,
        EventName::OutfitClearSuccess,
        EventName::OutfitClearFailure,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::ItemStoreSuccess => "item-store-success",
            EventName::ItemStoreFailure => "item-store-failure",
            EventName::ItemUpdateSuccess => "item-update-success",
            EventName::ItemUpdateFailure => "item-update-failure",
            EventName::ItemClearSuccess => "item-clear-success",
            EventName::ItemClearFailure => "item-clear-failure",
            EventName::ItemNew => "item-new",
            EventName::ItemLoadFailure => "item-load-failure",
            EventName::UserIdChanged => "user-id-changed",
            EventName::OutfitStoreSuccess => "outfit-store-success",
            EventName::OutfitStoreFailure => "outfit-store-failure",
            EventName::OutfitNew => "outfit-new",
            EventName::OutfitLoadFailure => "outfit-load-failure",
            EventName::OutfitClearSuccess => "outfit-clear-success",
            EventName::OutfitClearFailure => "outfit-clear-failure",
        }
    }

    /// True for the failure half of a success/failure pair
    pub fn is_failure(&self) -> bool {
        self.as_str().ends_with("-failure")
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = WardrobeError;

    fn from_str(s: &str) -> Result<Self> {
        EventName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| WardrobeError::ValidationError(format!("Unknown event: {s}")))
    }
}

/// Data carried by an event
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Item(WardrobeItem),
    Outfit(Outfit),
    UserId(String),
    /// Human-readable failure message
    Error(String),
}

/// A named event with its optional payload
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: EventName,
    pub payload: Option<EventPayload>,
}

impl Event {
    pub fn new(name: EventName, payload: Option<EventPayload>) -> Self {
        Self { name, payload }
    }

    /// The user id carried by a `user-id-changed` event
    pub fn user_id(&self) -> Option<&str> {
        match &self.payload {
            Some(EventPayload::UserId(id)) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip_through_wire_form() {
        for name in EventName::ALL {
            assert_eq!(name.as_str().parse::<EventName>().unwrap(), name);
        }
        assert!("item-deleted".parse::<EventName>().is_err());
    }

    #[test]
    fn test_is_failure() {
        assert!(EventName::ItemClearFailure.is_failure());
        assert!(EventName::OutfitLoadFailure.is_failure());
        assert!(!EventName::ItemUpdateSuccess.is_failure());
        assert!(!EventName::UserIdChanged.is_failure());
    }

    #[test]
    fn test_user_id_accessor() {
        let event = Event::new(
            EventName::UserIdChanged,
            Some(EventPayload::UserId("user-9".to_string())),
        );
        assert_eq!(event.user_id(), Some("user-9"));
        assert_eq!(Event::new(EventName::ItemNew, None).user_id(), None);
    }
}
