//! Filter state and the pure filtering function

use std::collections::BTreeSet;

use crate::database::{Occasion, Season, WardrobeItem};

/// Filter controls as last applied by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Selected seasons; an empty selection matches nothing
    pub seasons: BTreeSet<Season>,
    /// Selected occasion; [`Occasion::Any`] disables occasion filtering
    pub occasion: Occasion,
    /// Free-text search over id, name and brand
    pub search: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            seasons: Season::all(),
            occasion: Occasion::Any,
            search: String::new(),
        }
    }
}

impl FilterState {
    pub fn with_seasons(mut self, seasons: impl IntoIterator<Item = Season>) -> Self {
        self.seasons = seasons.into_iter().collect();
        self
    }

    pub fn with_occasion(mut self, occasion: Occasion) -> Self {
        self.occasion = occasion;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// True if `item` passes every active predicate
    pub fn matches(&self, item: &WardrobeItem) -> bool {
        if self.seasons.is_disjoint(&item.seasons) {
            return false;
        }

        if self.occasion != Occasion::Any
            && item.occasion != self.occasion
            && item.occasion != Occasion::Any
        {
            return false;
        }

        let term = self.search.to_lowercase();
        if term.is_empty() {
            return true;
        }

        item.id_string().contains(&term)
            || item.name.to_lowercase().contains(&term)
            || item.brand.to_lowercase().contains(&term)
    }
}

/// Items from `items` that pass `filter`, in their original order
pub fn apply_filters(items: &[WardrobeItem], filter: &FilterState) -> Vec<WardrobeItem> {
    items.iter().filter(|item| filter.matches(item)).cloned().collect()
}
