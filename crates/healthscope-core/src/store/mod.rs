//! Persistence layer
//!
//! Everything the app keeps on the device lives in a flat string-keyed
//! namespace behind [`KeyValueStore`]:
//! - `memory` - process-local map (tests, throwaway sessions)
//! - `sqlite` - single-table SQLite store with connection pooling
//!
//! [`PersistenceStore`] layers typed JSON access on top. Reads never fail
//! outward: a missing or corrupt value is treated as "no data".

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{SymptomEntry, UserProfile};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Fixed keys of the persisted namespace
pub mod keys {
    /// UserProfile JSON
    pub const USER_DATA: &str = "userData";
    /// JSON array of SymptomEntry
    pub const SYMPTOMS_DATA: &str = "symptomsData";
    /// Mirror of `UserProfile::onboarding_completed`
    pub const HAS_COMPLETED_ONBOARDING: &str = "hasCompletedOnboarding";
    /// Mirror of `UserProfile::notifications_enabled`
    pub const NOTIFICATIONS_ENABLED: &str = "notificationsEnabled";
    /// Last gate decision; `true` means show the native app
    pub const IS_BLOCK: &str = "isBlock";
}

/// One write inside a [`KeyValueStore::write_batch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

impl KvWrite {
    pub fn set(key: &str, value: impl Into<String>) -> Self {
        Self::Set {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn remove(key: &str) -> Self {
        Self::Remove {
            key: key.to_string(),
        }
    }

    fn flag(key: &str, value: bool) -> Self {
        Self::set(key, if value { "true" } else { "false" })
    }
}

/// Raw string key-value backend
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Apply every write or none of them
    fn write_batch(&self, writes: &[KvWrite]) -> Result<()>;
}

/// Typed JSON persistence for the profile, symptoms and flags
#[derive(Clone)]
pub struct PersistenceStore {
    backend: Arc<dyn KeyValueStore>,
}

impl PersistenceStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Store backed by a fresh in-process map
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Store backed by the SQLite file at `path` (created if missing)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let sqlite = SqliteStore::open(path)?;
        Ok(Self::new(Arc::new(sqlite)))
    }

    /// Save the profile and mirror its two flags in one batch
    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let json = serde_json::to_string(profile)?;
        self.backend.write_batch(&[
            KvWrite::set(keys::USER_DATA, json),
            KvWrite::flag(keys::HAS_COMPLETED_ONBOARDING, profile.onboarding_completed),
            KvWrite::flag(keys::NOTIFICATIONS_ENABLED, profile.notifications_enabled),
        ])?;
        debug!(profile_id = %profile.id, "Profile saved");
        Ok(())
    }

    pub fn load_profile(&self) -> Option<UserProfile> {
        self.read_json(keys::USER_DATA)
    }

    pub fn save_symptoms(&self, entries: &[SymptomEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.backend.set(keys::SYMPTOMS_DATA, &json)?;
        debug!(count = entries.len(), "Symptoms saved");
        Ok(())
    }

    /// Load the symptom list; absent or undecodable data yields an empty list
    pub fn load_symptoms(&self) -> Vec<SymptomEntry> {
        self.read_json(keys::SYMPTOMS_DATA).unwrap_or_default()
    }

    /// Remove the profile and all symptoms and reset the mirrored flags
    ///
    /// Applied as one batch. The gate cache is device state, not account
    /// data, and is kept.
    pub fn clear_all(&self) -> Result<()> {
        self.backend.write_batch(&[
            KvWrite::remove(keys::USER_DATA),
            KvWrite::remove(keys::SYMPTOMS_DATA),
            KvWrite::flag(keys::HAS_COMPLETED_ONBOARDING, false),
            KvWrite::flag(keys::NOTIFICATIONS_ENABLED, true),
        ])
    }

    pub fn has_completed_onboarding(&self) -> bool {
        self.flag(keys::HAS_COMPLETED_ONBOARDING, false)
    }

    pub fn notifications_enabled(&self) -> bool {
        self.flag(keys::NOTIFICATIONS_ENABLED, true)
    }

    /// Cached gate value; `true` (the default) means show the native app
    pub fn gate_cache(&self) -> bool {
        self.flag(keys::IS_BLOCK, true)
    }

    pub fn set_gate_cache(&self, is_block: bool) -> Result<()> {
        self.set_flag(keys::IS_BLOCK, is_block)
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        self.read_json(key).unwrap_or(default)
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        self.backend.write_batch(&[KvWrite::flag(key, value)])
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read stored value");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Discarding undecodable stored value");
                None
            }
        }
    }
}
