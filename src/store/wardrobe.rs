//! Local wardrobe item store

use crate::database::schema::{StoreSchema, WARDROBE_ITEM_STORE};
use crate::database::{ItemId, WardrobeItem};
use crate::error::{Result, WardrobeError};
use crate::events::{EventName, EventPayload};

use super::object_store::{DeletableRecord, ObjectStore, StoreEvents, StoreRecord, UpdatableRecord};

/// Local store of wardrobe items keyed by `item_id`
pub type WardrobeItemStore = ObjectStore<WardrobeItem>;

impl StoreRecord for WardrobeItem {
    const SCHEMA: StoreSchema = WARDROBE_ITEM_STORE;
    const EVENTS: StoreEvents = StoreEvents {
        store_success: EventName::ItemStoreSuccess,
        store_failure: EventName::ItemStoreFailure,
        new_record: EventName::ItemNew,
        load_failure: EventName::ItemLoadFailure,
        clear_success: EventName::ItemClearSuccess,
        clear_failure: EventName::ItemClearFailure,
    };

    fn key(&self) -> Option<i64> {
        self.item_id
    }

    fn set_key(&mut self, key: i64) {
        self.item_id = Some(key);
    }

    fn payload(&self) -> EventPayload {
        EventPayload::Item(self.clone())
    }

    fn validate(&self) -> Result<()> {
        WardrobeItem::validate(self)
    }
}

impl DeletableRecord for WardrobeItem {}

impl UpdatableRecord for WardrobeItem {
    const UPDATE_SUCCESS: EventName = EventName::ItemUpdateSuccess;
    const UPDATE_FAILURE: EventName = EventName::ItemUpdateFailure;
}

impl ObjectStore<WardrobeItem> {
    /// Flip `is_favorite` on the stored item and write it back.
    ///
    /// Returns the new flag value.
    pub fn toggle_favorite(&mut self, item_id: ItemId) -> Result<bool> {
        let mut item = self
            .get(item_id)?
            .ok_or_else(|| WardrobeError::NotFound(format!("Wardrobe item {item_id}")))?;

        item.is_favorite = !item.is_favorite;
        self.put_and_report(&item)?;
        Ok(item.is_favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Season, StoreLocation};
    use crate::events::{Event, EventBus};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn recorder(bus: &EventBus, names: &[EventName]) -> Arc<Mutex<Vec<Event>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        for name in names {
            let seen = seen.clone();
            bus.subscribe(*name, move |event| seen.lock().unwrap().push(event.clone()));
        }
        seen
    }

    fn item(id: ItemId, name: &str) -> WardrobeItem {
        let mut item = WardrobeItem::new(name, [Season::Fall]);
        item.item_id = Some(id);
        item
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut store = WardrobeItemStore::new(StoreLocation::InMemory, EventBus::new());
        assert!(!store.is_open());
        store.open().unwrap();
        store.open().unwrap();
        assert!(store.is_open());
    }

    #[test]
    fn test_open_failure_is_storage_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let location = StoreLocation::File(temp_dir.path().join("no").join("such").join("db"));
        let mut store = WardrobeItemStore::new(location, EventBus::new());
        assert!(matches!(store.open(), Err(WardrobeError::StorageUnavailable(_))));
    }

    #[test]
    fn test_create_emits_success_and_duplicate_fails() {
        let bus = EventBus::new();
        let seen = recorder(&bus, &[EventName::ItemStoreSuccess, EventName::ItemStoreFailure]);
        let mut store = WardrobeItemStore::new(StoreLocation::InMemory, bus);

        store.create(&item(1, "Coat")).unwrap();
        let dup = store.create(&item(1, "Other Coat"));
        assert!(matches!(dup, Err(WardrobeError::DuplicateKey(_))));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].name, EventName::ItemStoreSuccess);
        assert_eq!(seen[1].name, EventName::ItemStoreFailure);
    }

    #[test]
    fn test_create_requires_key() {
        let mut store = WardrobeItemStore::new(StoreLocation::InMemory, EventBus::new());
        let unsaved = WardrobeItem::new("Hat", [Season::Winter]);
        assert!(matches!(store.create(&unsaved), Err(WardrobeError::ValidationError(_))));
    }

    #[test]
    fn test_writes_reject_empty_seasons() {
        let bus = EventBus::new();
        let seen = recorder(&bus, &[EventName::ItemStoreFailure, EventName::ItemUpdateFailure]);
        let mut store = WardrobeItemStore::new(StoreLocation::InMemory, bus);

        let mut seasonless = WardrobeItem::new("Hat", []);
        seasonless.item_id = Some(3);
        assert!(matches!(store.create(&seasonless), Err(WardrobeError::ValidationError(_))));
        assert_eq!(store.get(3).unwrap(), None);

        store.create(&item(3, "Hat")).unwrap();
        assert!(matches!(
            store.update_by_key(3, &seasonless),
            Err(WardrobeError::ValidationError(_))
        ));
        assert!(!store.get(3).unwrap().unwrap().seasons.is_empty());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].name, EventName::ItemStoreFailure);
        assert_eq!(seen[1].name, EventName::ItemUpdateFailure);
    }

    #[test]
    fn test_read_all_emits_one_event_per_record() {
        let bus = EventBus::new();
        let seen = recorder(&bus, &[EventName::ItemNew]);
        let mut store = WardrobeItemStore::new(StoreLocation::InMemory, bus);

        store.create(&item(1, "Coat")).unwrap();
        store.create(&item(2, "Boots")).unwrap();

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_absent_key_succeeds() {
        let bus = EventBus::new();
        let seen = recorder(&bus, &[EventName::ItemClearSuccess]);
        let mut store = WardrobeItemStore::new(StoreLocation::InMemory, bus);

        store.delete_by_key(404).unwrap();
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_removes_record() {
        let mut store = WardrobeItemStore::new(StoreLocation::InMemory, EventBus::new());
        store.create(&item(1, "Coat")).unwrap();
        store.delete_by_key(1).unwrap();
        assert!(store.get(1).unwrap().is_none());
    }

    #[test]
    fn test_update_by_key() {
        let bus = EventBus::new();
        let seen = recorder(&bus, &[EventName::ItemUpdateSuccess]);
        let mut store = WardrobeItemStore::new(StoreLocation::InMemory, bus);

        store.create(&item(1, "Coat")).unwrap();
        let mut renamed = item(1, "Long Coat");
        renamed.brand = "Acme".to_string();
        store.update_by_key(1, &renamed).unwrap();

        let stored = store.get(1).unwrap().unwrap();
        assert_eq!(stored.name, "Long Coat");
        assert_eq!(stored.brand, "Acme");
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_update_missing_key_is_not_found() {
        let bus = EventBus::new();
        let seen = recorder(&bus, &[EventName::ItemUpdateSuccess, EventName::ItemUpdateFailure]);
        let mut store = WardrobeItemStore::new(StoreLocation::InMemory, bus);

        let result = store.update_by_key(9, &item(9, "Ghost"));
        assert!(matches!(result, Err(WardrobeError::NotFound(_))));
        assert!(store.get(9).unwrap().is_none());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_toggle_favorite_twice_restores_value() {
        let mut store = WardrobeItemStore::new(StoreLocation::InMemory, EventBus::new());
        store.create(&item(1, "Coat")).unwrap();

        assert!(store.toggle_favorite(1).unwrap());
        assert!(!store.toggle_favorite(1).unwrap());
        assert!(!store.get(1).unwrap().unwrap().is_favorite);
        assert!(matches!(store.toggle_favorite(2), Err(WardrobeError::NotFound(_))));
    }

    #[test]
    fn test_clear_all_and_persistence_across_adapters() {
        let temp_dir = TempDir::new().unwrap();
        let location = StoreLocation::File(temp_dir.path().join("wardrobeDB.sqlite"));

        let mut first = WardrobeItemStore::new(location.clone(), EventBus::new());
        first.create(&item(1, "Coat")).unwrap();
        first.create(&item(2, "Boots")).unwrap();

        let config = crate::config::WardrobeConfig::default().with_local_store(location);
        let mut second = WardrobeItemStore::from_config(&config, EventBus::new());
        assert_eq!(second.read_all().unwrap().len(), 2);

        second.clear_all().unwrap();
        assert!(first.read_all().unwrap().is_empty());
        second.clear_all().unwrap();
    }
}
