//! The favorites store and its persistence contract.

use crate::domain::error::{MarqueeError, Result};
use crate::domain::{FavoriteItem, FavoriteKey, MediaType, NewFavorite};
use crate::notify::{Notification, NotificationBus};
use crate::storage::{KeyValueStore, FAVORITES_KEY};
use chrono::Utc;
use std::collections::HashSet;

/// Result of [`FavoritesStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The favorite was appended.
    Added,
    /// A favorite with the same key already existed; nothing changed.
    AlreadyPresent,
}

/// Summary of [`FavoritesStore::complete_load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Well-formed entries read from storage.
    pub loaded: usize,
    /// Entries that could not be decoded.
    pub skipped: usize,
    /// Entries dropped because their key appeared earlier.
    pub duplicates: usize,
    /// Pre-load additions appended after the persisted items.
    pub merged: usize,
    /// Incomplete entries removed.
    pub pruned: usize,
    /// Whether the reconciled list was written back.
    pub persisted: bool,
    /// Whether this call was ignored because the store was already loaded.
    pub ignored: bool,
}

/// Number of favorites per media type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FavoriteCounts {
    pub movie: usize,
    pub tv: usize,
    pub person: usize,
}

impl FavoriteCounts {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.movie + self.tv + self.person
    }
}

/// Authoritative favorites list mirrored into durable storage.
///
/// At most one item exists per `(id, media_type)` and items keep insertion
/// order.
pub struct FavoritesStore {
    items: Vec<FavoriteItem>,
    initialized: bool,
    backend: Box<dyn KeyValueStore>,

    /// Notifications emitted before the persisted list was loaded.
    queued: Vec<Notification>,

    /// Set by any mutation made before load.
    dirty: bool,

    /// Persisted keys the user removed before load.
    removed_before_load: HashSet<FavoriteKey>,

    /// `clear()` ran before load; every persisted item is discarded.
    cleared_before_load: bool,

    /// A write failed; the store stays in memory for the rest of the session.
    persistence_disabled: bool,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("items", &self.items.len())
            .field("initialized", &self.initialized)
            .field("queued", &self.queued.len())
            .field("persistence_disabled", &self.persistence_disabled)
            .finish_non_exhaustive()
    }
}

impl FavoritesStore {
    /// Creates an empty, not yet loaded store over `backend`.
    #[must_use]
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            items: Vec::new(),
            initialized: false,
            backend,
            queued: Vec::new(),
            dirty: false,
            removed_before_load: HashSet::new(),
            cleared_before_load: false,
            persistence_disabled: false,
        }
    }

    /// Reads the persisted list synchronously from the backend and completes
    /// the load.
    ///
    /// A read failure is logged and treated as an empty list.
    pub fn load(&mut self, bus: &mut NotificationBus) -> LoadReport {
        let raw = match self.backend.get(FAVORITES_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read favorites, starting empty");
                None
            }
        };
        self.complete_load(raw.as_deref(), bus)
    }

    /// Reconciles the persisted list with in-memory state and marks the store
    /// initialized.
    ///
    /// `raw` is the stored JSON array, or `None` when nothing was stored.
    /// Persisted items come first, followed by additions made before the load
    /// whose key is not already present. Incomplete movie/TV entries are
    /// pruned. Queued notifications are flushed to `bus` in order.
    ///
    /// Only the first call has an effect.
    pub fn complete_load(&mut self, raw: Option<&str>, bus: &mut NotificationBus) -> LoadReport {
        let _span = tracing::debug_span!("favorites_complete_load", has_value = raw.is_some()).entered();

        if self.initialized {
            tracing::debug!("favorites already loaded, ignoring");
            return LoadReport {
                ignored: true,
                ..LoadReport::default()
            };
        }

        let mut report = LoadReport::default();
        let (persisted, malformed) = match raw {
            Some(raw) => decode_items(raw, &mut report),
            None => (Vec::new(), false),
        };

        let mut merged: Vec<FavoriteItem> = Vec::with_capacity(persisted.len() + self.items.len());
        let mut seen: HashSet<FavoriteKey> = HashSet::new();

        for item in persisted {
            if self.cleared_before_load || self.removed_before_load.contains(&item.key()) {
                continue;
            }
            if seen.insert(item.key()) {
                merged.push(item);
            } else {
                report.duplicates += 1;
            }
        }
        let persisted_kept = merged.len();

        for item in std::mem::take(&mut self.items) {
            if seen.insert(item.key()) {
                merged.push(item);
                report.merged += 1;
            }
        }

        self.items = merged;
        report.pruned = self.retain_complete();

        let dropped_by_user = report.loaded - report.duplicates - persisted_kept;
        let changed = self.dirty
            || malformed
            || report.skipped > 0
            || report.duplicates > 0
            || report.pruned > 0
            || dropped_by_user > 0;

        self.initialized = true;
        self.dirty = false;
        self.removed_before_load.clear();
        self.cleared_before_load = false;

        if changed {
            report.persisted = self.persist();
        }

        let queued = std::mem::take(&mut self.queued);
        for notification in queued {
            bus.emit_notification(notification);
        }

        tracing::debug!(
            loaded = report.loaded,
            skipped = report.skipped,
            duplicates = report.duplicates,
            merged = report.merged,
            pruned = report.pruned,
            persisted = report.persisted,
            total = self.items.len(),
            "favorites loaded"
        );

        report
    }

    /// Adds a favorite, stamping `added_at` with the current time.
    ///
    /// Emits exactly one notification: success when added, info when the key
    /// already exists.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Validation`] for an id of zero; nothing is
    /// changed or emitted in that case.
    pub fn add(&mut self, favorite: NewFavorite, bus: &mut NotificationBus) -> Result<AddOutcome> {
        let _span = tracing::debug_span!("favorites_add", id = favorite.id, media_type = %favorite.media_type).entered();

        if favorite.id == 0 {
            return Err(MarqueeError::Validation(
                "favorite id must be a positive integer".to_string(),
            ));
        }

        if self.is_favorite(favorite.id, favorite.media_type) {
            let message = format!("\"{}\" is already in your favorites", favorite.title);
            self.notify(bus, Notification::info("Already in favorites", Some(message)));
            return Ok(AddOutcome::AlreadyPresent);
        }

        let item = favorite.stamp(Utc::now());
        let message = format!("\"{}\" has been added to your favorites", item.title);
        self.removed_before_load.remove(&item.key());
        self.items.push(item);
        self.mark_changed();

        self.notify(bus, Notification::success("Added to favorites", Some(message)));
        Ok(AddOutcome::Added)
    }

    /// Removes the favorite with the given key.
    ///
    /// A missing key is a silent no-op. Returns the removed item.
    pub fn remove(&mut self, id: u64, media_type: MediaType, bus: &mut NotificationBus) -> Option<FavoriteItem> {
        let _span = tracing::debug_span!("favorites_remove", id = id, media_type = %media_type).entered();

        let position = self.items.iter().position(|item| item.key() == (id, media_type))?;
        let removed = self.items.remove(position);
        if !self.initialized {
            self.removed_before_load.insert(removed.key());
        }
        self.mark_changed();

        let message = format!("\"{}\" has been removed from your favorites", removed.title);
        self.notify(bus, Notification::success("Removed from favorites", Some(message)));
        Some(removed)
    }

    /// Removes every favorite. Always emits one success notification.
    ///
    /// Returns how many items were removed.
    pub fn clear(&mut self, bus: &mut NotificationBus) -> usize {
        let removed = self.items.len();
        tracing::debug!(removed = removed, "clearing favorites");

        self.items.clear();
        if !self.initialized {
            self.cleared_before_load = true;
            self.removed_before_load.clear();
        }
        self.mark_changed();

        self.notify(
            bus,
            Notification::success("Favorites cleared", Some("All favorites have been removed".to_string())),
        );
        removed
    }

    /// Removes movie/TV favorites lacking runtime or genres. Silent.
    ///
    /// Returns how many items were removed.
    pub fn prune_incomplete(&mut self) -> usize {
        let pruned = self.retain_complete();
        if pruned > 0 {
            self.mark_changed();
        }
        pruned
    }

    fn retain_complete(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| {
            let keep = item.is_complete();
            if !keep {
                tracing::debug!(id = item.id, media_type = %item.media_type, title = %item.title, "pruning incomplete favorite");
            }
            keep
        });
        before - self.items.len()
    }

    /// Whether a favorite with this key exists.
    #[must_use]
    pub fn is_favorite(&self, id: u64, media_type: MediaType) -> bool {
        self.get(id, media_type).is_some()
    }

    #[must_use]
    pub fn get(&self, id: u64, media_type: MediaType) -> Option<&FavoriteItem> {
        self.items.iter().find(|item| item.key() == (id, media_type))
    }

    /// Favorites of one media type, in store order.
    #[must_use]
    pub fn by_type(&self, media_type: MediaType) -> Vec<&FavoriteItem> {
        self.items.iter().filter(|item| item.media_type == media_type).collect()
    }

    /// All favorites in insertion order.
    #[must_use]
    pub fn items(&self) -> &[FavoriteItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether a write failure switched the store to memory-only operation.
    #[must_use]
    pub const fn is_persistence_disabled(&self) -> bool {
        self.persistence_disabled
    }

    #[must_use]
    pub fn counts(&self) -> FavoriteCounts {
        self.items.iter().fold(FavoriteCounts::default(), |mut counts, item| {
            match item.media_type {
                MediaType::Movie => counts.movie += 1,
                MediaType::Tv => counts.tv += 1,
                MediaType::Person => counts.person += 1,
            }
            counts
        })
    }

    fn notify(&mut self, bus: &mut NotificationBus, notification: Notification) {
        if self.initialized {
            bus.emit_notification(notification);
        } else {
            self.queued.push(notification);
        }
    }

    /// Persists now when loaded, otherwise defers to `complete_load`.
    fn mark_changed(&mut self) {
        if self.initialized {
            self.persist();
        } else {
            self.dirty = true;
        }
    }

    /// Writes the list to the backend. Returns `true` on success.
    fn persist(&mut self) -> bool {
        if self.persistence_disabled {
            return false;
        }

        let result = serde_json::to_string(&self.items)
            .map_err(MarqueeError::from)
            .and_then(|json| self.backend.set(FAVORITES_KEY, json));

        match result {
            Ok(()) => {
                tracing::trace!(count = self.items.len(), "favorites persisted");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist favorites, continuing in memory");
                self.persistence_disabled = true;
                false
            }
        }
    }
}

/// Decodes the persisted array, skipping malformed entries.
///
/// Returns the items and whether the document as a whole was malformed.
fn decode_items(raw: &str, report: &mut LoadReport) -> (Vec<FavoriteItem>, bool) {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(error = %e, "persisted favorites are malformed, starting empty");
            return (Vec::new(), true);
        }
    };

    let mut items = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value::<FavoriteItem>(value) {
            Ok(item) if item.id > 0 => items.push(item),
            Ok(item) => {
                tracing::warn!(title = %item.title, "skipping persisted favorite with id 0");
                report.skipped += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed persisted favorite");
                report.skipped += 1;
            }
        }
    }
    report.loaded = items.len();
    (items, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;
    use crate::storage::MemoryStore;

    fn movie(id: u64, title: &str) -> NewFavorite {
        NewFavorite::new(id, MediaType::Movie, title).with_details(120, vec!["Drama".to_string()])
    }

    fn loaded_store() -> (FavoritesStore, MemoryStore, NotificationBus) {
        let memory = MemoryStore::new();
        let mut bus = NotificationBus::new();
        bus.mark_ready();
        let mut store = FavoritesStore::new(Box::new(memory.clone()));
        store.load(&mut bus);
        (store, memory, bus)
    }

    #[test]
    fn zero_id_is_rejected_without_notification() {
        let (mut store, _, mut bus) = loaded_store();
        let err = store.add(movie(0, "Nothing"), &mut bus).unwrap_err();
        assert!(matches!(err, MarqueeError::Validation(_)));
        assert!(store.is_empty());
        assert!(bus.history().is_empty());
    }

    #[test]
    fn same_id_different_type_are_distinct() {
        let (mut store, _, mut bus) = loaded_store();
        store.add(movie(1, "A"), &mut bus).unwrap();
        store.add(NewFavorite::new(1, MediaType::Person, "A"), &mut bus).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.counts(), FavoriteCounts { movie: 1, tv: 0, person: 1 });
    }

    #[test]
    fn write_failure_disables_persistence_but_keeps_memory() {
        let (mut store, memory, mut bus) = loaded_store();
        memory.fail_writes(true);

        store.add(movie(1, "A"), &mut bus).unwrap();
        assert!(store.is_persistence_disabled());
        assert_eq!(store.len(), 1);

        memory.fail_writes(false);
        store.add(movie(2, "B"), &mut bus).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(memory.peek(FAVORITES_KEY), None);
        assert_eq!(bus.history().len(), 2);
    }

    #[test]
    fn manual_prune_is_silent() {
        let (mut store, _, mut bus) = loaded_store();
        store.add(NewFavorite::new(9, MediaType::Tv, "Bare"), &mut bus).unwrap();
        let before = bus.history().len();

        assert_eq!(store.prune_incomplete(), 1);
        assert!(store.is_empty());
        assert_eq!(bus.history().len(), before);
    }

    #[test]
    fn duplicate_persisted_entries_keep_first() {
        let raw = r#"[
            {"id":1,"mediaType":"person","title":"First","addedAt":"2024-01-01T00:00:00Z"},
            {"id":1,"mediaType":"person","title":"Second","addedAt":"2024-01-02T00:00:00Z"}
        ]"#;
        let mut bus = NotificationBus::new();
        let mut store = FavoritesStore::new(Box::new(MemoryStore::new()));
        let report = store.complete_load(Some(raw), &mut bus);

        assert_eq!(report.duplicates, 1);
        assert!(report.persisted);
        assert_eq!(store.items()[0].title, "First");
    }

    #[test]
    fn second_load_is_ignored() {
        let (mut store, _, mut bus) = loaded_store();
        store.add(movie(1, "A"), &mut bus).unwrap();

        let report = store.complete_load(Some("[]"), &mut bus);
        assert!(report.ignored);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removal_before_load_drops_persisted_item() {
        let raw = r#"[{"id":5,"mediaType":"person","title":"Gone","addedAt":"2024-01-01T00:00:00Z"}]"#;
        let mut bus = NotificationBus::new();
        bus.mark_ready();
        let mut store = FavoritesStore::new(Box::new(MemoryStore::new()));

        store.add(NewFavorite::new(5, MediaType::Person, "Gone"), &mut bus).unwrap();
        store.remove(5, MediaType::Person, &mut bus);
        store.complete_load(Some(raw), &mut bus);

        assert!(store.is_empty());
        let kinds: Vec<_> = bus.history().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, [NotificationKind::Success, NotificationKind::Success]);
    }
}
