//! Symptom repository
//!
//! Owns the in-memory list of symptom entries and keeps it equal to the
//! persisted copy: every mutation writes the full list through to the
//! [`PersistenceStore`] before it is committed in memory, then broadcasts a
//! [`RepositoryEvent`] to subscribers.
//!
//! The repository assumes a single logical writer. The interior locks only
//! make it shareable (`Arc<SymptomRepository>`) between the host and
//! subscribers such as the insights feed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{SymptomCategory, SymptomEntry};
use crate::store::PersistenceStore;

/// Days covered by [`SymptomRepository::list_recent`]
pub const RECENT_DAYS: i64 = 7;

/// Handle returned by [`SymptomRepository::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What a mutation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added(Uuid),
    Updated(Uuid),
    Deleted(Uuid),
    Cleared,
    Reloaded,
}

/// Broadcast after every successful mutation
#[derive(Debug, Clone)]
pub struct RepositoryEvent {
    pub change: Change,
    /// The full list as committed by this mutation
    pub entries: Vec<SymptomEntry>,
}

type Listener = Arc<dyn Fn(&RepositoryEvent) + Send + Sync>;

pub struct SymptomRepository {
    store: PersistenceStore,
    entries: RwLock<Vec<SymptomEntry>>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl SymptomRepository {
    /// Create a repository primed with whatever the store holds
    pub fn new(store: PersistenceStore) -> Self {
        let entries = store.load_symptoms();
        debug!(count = entries.len(), "Loaded symptom entries");
        Self {
            store,
            entries: RwLock::new(entries),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &PersistenceStore {
        &self.store
    }

    /// Insert a new entry at the front of the list
    pub fn add(&self, entry: SymptomEntry) -> Result<()> {
        let id = entry.id;
        self.mutate(move |entries| {
            entries.insert(0, entry);
            Some(Change::Added(id))
        })?;
        Ok(())
    }

    /// Replace the entry with the same id
    ///
    /// Returns `false` (and changes nothing) when no entry has that id.
    pub fn update(&self, entry: SymptomEntry) -> Result<bool> {
        let id = entry.id;
        let change = self.mutate(move |entries| {
            let slot = entries.iter_mut().find(|e| e.id == id)?;
            *slot = entry;
            Some(Change::Updated(id))
        })?;
        Ok(change.is_some())
    }

    /// Remove the entry with `id`; returns `false` if it was not present
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let change = self.mutate(move |entries| {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            (entries.len() != before).then_some(Change::Deleted(id))
        })?;
        Ok(change.is_some())
    }

    /// Remove every entry
    pub fn clear_all(&self) -> Result<()> {
        self.mutate(|entries| {
            entries.clear();
            Some(Change::Cleared)
        })?;
        info!("Cleared all symptom entries");
        Ok(())
    }

    /// Re-read the list from the store, e.g. after the store was cleared
    pub fn reload(&self) {
        let loaded = self.store.load_symptoms();
        let snapshot = {
            let mut entries = self.write_entries();
            *entries = loaded;
            entries.clone()
        };
        self.notify(RepositoryEvent {
            change: Change::Reloaded,
            entries: snapshot,
        });
    }

    pub fn all(&self) -> Vec<SymptomEntry> {
        self.read_entries().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<SymptomEntry> {
        self.read_entries().iter().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Entries with `start <= timestamp <= end`, in list order
    pub fn list_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<SymptomEntry> {
        self.read_entries()
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .cloned()
            .collect()
    }

    pub fn list_by_category(&self, category: SymptomCategory) -> Vec<SymptomEntry> {
        self.read_entries()
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect()
    }

    /// Entries from the last seven days
    pub fn list_recent(&self) -> Vec<SymptomEntry> {
        self.list_recent_at(Utc::now())
    }

    pub fn list_recent_at(&self, now: DateTime<Utc>) -> Vec<SymptomEntry> {
        self.list_in_range(now - Duration::days(RECENT_DAYS), now)
    }

    /// Register a callback run after every successful mutation
    ///
    /// Callbacks run on the mutating thread after all internal locks are
    /// released, so they may read from the repository.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&RepositoryEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        self.lock_listeners().push((id, Arc::new(listener)));
        id
    }

    /// Remove a subscription; returns `false` if it was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock_listeners().len()
    }

    /// Apply `f` to a copy of the list, persist it, then commit and notify
    ///
    /// `f` returning `None` means nothing changed: no write, no event.
    fn mutate<F>(&self, f: F) -> Result<Option<Change>>
    where
        F: FnOnce(&mut Vec<SymptomEntry>) -> Option<Change>,
    {
        let (change, snapshot) = {
            let mut entries = self.write_entries();
            let mut next = entries.clone();
            let Some(change) = f(&mut next) else {
                return Ok(None);
            };

            self.store.save_symptoms(&next)?;
            *entries = next;
            (change, entries.clone())
        };

        debug!(change = ?change, count = snapshot.len(), "Symptom list changed");
        self.notify(RepositoryEvent {
            change,
            entries: snapshot,
        });
        Ok(Some(change))
    }

    fn notify(&self, event: RepositoryEvent) {
        let listeners: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(&event);
        }
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, Vec<SymptomEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, Vec<SymptomEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }
}
