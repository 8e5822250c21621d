//! Local outfit store. Create, read-all and clear only.

use crate::database::Outfit;
use crate::database::schema::{OUTFIT_STORE, StoreSchema};
use crate::events::{EventName, EventPayload};

use super::object_store::{ObjectStore, StoreEvents, StoreRecord};

/// Local store of outfits keyed by an auto-assigned `id`
pub type OutfitStore = ObjectStore<Outfit>;

impl StoreRecord for Outfit {
    const SCHEMA: StoreSchema = OUTFIT_STORE;
    const EVENTS: StoreEvents = StoreEvents {
        store_success: EventName::OutfitStoreSuccess,
        store_failure: EventName::OutfitStoreFailure,
        new_record: EventName::OutfitNew,
        load_failure: EventName::OutfitLoadFailure,
        clear_success: EventName::OutfitClearSuccess,
        clear_failure: EventName::OutfitClearFailure,
    };

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn payload(&self) -> EventPayload {
        EventPayload::Outfit(self.clone())
    }
}
