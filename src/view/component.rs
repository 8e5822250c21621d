//! Wardrobe view component
//!
//! Owns the snapshot of the current user's items, the applied filter and the
//! rendered grid. Bus events never touch that state directly: handlers only
//! queue a [`ViewCommand`], and [`WardrobeView::pump`] applies queued commands
//! on the view's own task.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::filter::{FilterState, apply_filters};
use super::grid::WardrobeGrid;
use crate::database::{ItemId, WardrobeItem};
use crate::error::{Result, WardrobeError};
use crate::events::{Event, EventBus, EventName, SubscriptionId};
use crate::remote::RemoteRepository;
use crate::store::WardrobeItemStore;

/// Alert shown when clearing fails
pub const CLEAR_FAILURE_ALERT: &str = "Failed to clear wardrobe item. Please try again.";

/// Events after which the snapshot is reloaded
pub const REFRESH_EVENTS: [EventName; 6] = [
    EventName::ItemStoreSuccess,
    EventName::ItemStoreFailure,
    EventName::ItemUpdateSuccess,
    EventName::ItemUpdateFailure,
    EventName::ItemClearSuccess,
    EventName::ItemClearFailure,
];

/// Lifecycle of the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Uninitialized,
    Loading,
    Rendered,
}

/// Work queued by bus handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    Refresh,
    ChangeUser(String),
    Alert(String),
}

/// Grid view over one user's wardrobe
pub struct WardrobeView {
    repository: RemoteRepository,
    local_store: Option<WardrobeItemStore>,
    user_id: String,
    state: ViewState,
    items: Vec<WardrobeItem>,
    filter: FilterState,
    grid: WardrobeGrid,
    alerts: Vec<String>,
    generation: u64,
    commands: UnboundedReceiver<ViewCommand>,
    bus: EventBus,
    subscriptions: Vec<(EventName, SubscriptionId)>,
}

impl WardrobeView {
    /// Create the view and subscribe it to `bus`
    pub fn new(repository: RemoteRepository, bus: &EventBus, user_id: impl Into<String>) -> Self {
        let (sender, commands) = mpsc::unbounded_channel();
        let subscriptions = subscribe_to_wardrobe_events(bus, sender);

        Self {
            repository,
            local_store: None,
            user_id: user_id.into(),
            state: ViewState::Uninitialized,
            items: Vec::new(),
            filter: FilterState::default(),
            grid: WardrobeGrid::default(),
            alerts: Vec::new(),
            generation: 0,
            commands,
            bus: bus.clone(),
            subscriptions,
        }
    }

    /// Attach the local store used for deletes
    pub fn with_local_store(mut self, store: WardrobeItemStore) -> Self {
        self.local_store = Some(store);
        self
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The full snapshot, unfiltered
    pub fn items(&self) -> &[WardrobeItem] {
        &self.items
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn grid(&self) -> &WardrobeGrid {
        &self.grid
    }

    /// User-facing alerts raised so far
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Number of reloads started
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// First load: `Uninitialized -> Loading -> Rendered`
    pub async fn init(&mut self) -> Result<()> {
        self.refresh().await
    }

    /// Reload the snapshot for the current user and render it with the
    /// default filter. On failure the previous snapshot stays rendered.
    pub async fn refresh(&mut self) -> Result<()> {
        self.generation += 1;
        self.state = ViewState::Loading;
        tracing::debug!(user_id = %self.user_id, generation = self.generation, "Loading wardrobe items");

        let result = self.repository.read_all_for_user(&self.user_id).await;
        match result {
            Ok(items) => {
                self.items = items;
                self.filter = FilterState::default();
                self.render();
                Ok(())
            }
            Err(e) => {
                tracing::error!(user_id = %self.user_id, "Error loading wardrobe items: {e}");
                self.state = ViewState::Rendered;
                Err(e)
            }
        }
    }

    fn render(&mut self) {
        let visible = apply_filters(&self.items, &self.filter);
        self.grid = WardrobeGrid::render(&visible);
        self.state = ViewState::Rendered;
    }

    /// Apply `filter` to the snapshot and render the result
    pub fn apply_filters(&mut self, filter: FilterState) -> Vec<WardrobeItem> {
        self.filter = filter;
        let visible = apply_filters(&self.items, &self.filter);
        self.grid = WardrobeGrid::render(&visible);
        if self.state == ViewState::Uninitialized {
            self.state = ViewState::Rendered;
        }
        visible
    }

    /// Switch to another user; the old snapshot is discarded, not merged.
    /// If the reload fails the grid stays empty rather than showing the
    /// previous user's cards.
    pub async fn change_user(&mut self, user_id: impl Into<String>) -> Result<()> {
        self.user_id = user_id.into();
        self.items.clear();
        self.grid = WardrobeGrid::default();
        self.refresh().await
    }

    /// Apply queued bus commands.
    ///
    /// Any number of queued refreshes collapse into one reload; the last
    /// queued user change wins. Failures are logged, not returned. Returns the
    /// number of commands consumed.
    pub async fn pump(&mut self) -> usize {
        let mut batch = Vec::new();
        while let Ok(command) = self.commands.try_recv() {
            batch.push(command);
        }
        self.apply(batch).await
    }

    /// Wait for at least one queued command, then apply everything queued
    /// behind it. Returns 0 once every sender is gone.
    pub async fn next_event(&mut self) -> usize {
        let Some(first) = self.commands.recv().await else {
            return 0;
        };
        let mut batch = vec![first];
        while let Ok(command) = self.commands.try_recv() {
            batch.push(command);
        }
        self.apply(batch).await
    }

    async fn apply(&mut self, batch: Vec<ViewCommand>) -> usize {
        let consumed = batch.len();
        let mut refresh = false;
        let mut new_user = None;

        for command in batch {
            match command {
                ViewCommand::Refresh => refresh = true,
                ViewCommand::ChangeUser(user_id) => new_user = Some(user_id),
                ViewCommand::Alert(message) => self.alerts.push(message),
            }
        }

        let outcome = match new_user {
            Some(user_id) => Some(self.change_user(user_id).await),
            None if refresh => Some(self.refresh().await),
            None => None,
        };
        if let Some(Err(e)) = outcome {
            tracing::warn!("wardrobe view refresh failed: {e}");
        }

        consumed
    }

    /// Create an item remotely; the store-success event schedules the reload
    pub async fn add_item(&mut self, mut item: WardrobeItem) -> Result<Option<WardrobeItem>> {
        if item.user_id.is_none() {
            item.user_id = Some(self.user_id.clone());
        }
        self.repository.create_item(&item).await
    }

    /// Replace an item remotely with the complete `item`
    pub async fn update_item(&mut self, item: &WardrobeItem) -> Result<()> {
        self.repository.update_item(item).await
    }

    /// Flip an item's favorite flag.
    ///
    /// The flag and icon change immediately; the full record is then written
    /// remotely. If that write fails the flip is rolled back and re-rendered.
    pub async fn toggle_favorite(&mut self, item_id: ItemId) -> Result<bool> {
        let index = self
            .items
            .iter()
            .position(|i| i.item_id == Some(item_id))
            .ok_or_else(|| WardrobeError::NotFound(format!("Wardrobe item {item_id}")))?;

        let is_favorite = !self.items[index].is_favorite;
        self.items[index].is_favorite = is_favorite;
        self.grid.set_favorite(item_id, is_favorite);

        let record = self.items[index].clone();
        if let Err(e) = self.repository.update_item(&record).await {
            tracing::error!(item_id, "favorite update failed, rolling back: {e}");
            if let Some(item) = self.items.iter_mut().find(|i| i.item_id == Some(item_id)) {
                item.is_favorite = !is_favorite;
            }
            self.grid.set_favorite(item_id, !is_favorite);
            return Err(e);
        }

        Ok(is_favorite)
    }

    /// Delete an item through the local store; its clear event schedules the reload
    pub fn delete_item(&mut self, item_id: ItemId) -> Result<()> {
        let store = self.local_store.as_mut().ok_or_else(|| {
            WardrobeError::StorageUnavailable("No local store attached to the view".to_string())
        })?;
        store.delete_by_key(item_id)
    }
}

impl Drop for WardrobeView {
    fn drop(&mut self) {
        for (name, id) in self.subscriptions.drain(..) {
            self.bus.unsubscribe(name, id);
        }
    }
}

fn subscribe_to_wardrobe_events(
    bus: &EventBus,
    sender: UnboundedSender<ViewCommand>,
) -> Vec<(EventName, SubscriptionId)> {
    let mut subscriptions = Vec::with_capacity(REFRESH_EVENTS.len() + 1);

    for name in REFRESH_EVENTS {
        let sender = sender.clone();
        let id = bus.subscribe(name, move |event: &Event| {
            if event.name.is_failure() {
                tracing::error!(event = %event.name, "wardrobe operation failed");
            } else {
                tracing::info!(event = %event.name, "Loading Wardrobe Items");
            }
            if event.name == EventName::ItemClearFailure {
                let _ = sender.send(ViewCommand::Alert(CLEAR_FAILURE_ALERT.to_string()));
            }
            let _ = sender.send(ViewCommand::Refresh);
        });
        subscriptions.push((name, id));
    }

    let id = bus.subscribe(EventName::UserIdChanged, move |event: &Event| {
        tracing::info!("User id updated");
        match event.user_id() {
            Some(user_id) => {
                let _ = sender.send(ViewCommand::ChangeUser(user_id.to_string()));
            }
            None => {
                let _ = sender.send(ViewCommand::Refresh);
            }
        }
    });
    subscriptions.push((EventName::UserIdChanged, id));

    subscriptions
}
