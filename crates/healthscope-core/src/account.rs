//! Settings and destructive account actions

use std::sync::Arc;

use tracing::info;

use crate::error::{Error, Result};
use crate::models::UserProfile;
use crate::repository::SymptomRepository;
use crate::store::PersistenceStore;

/// Explicit answer to a destructive-action prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

impl Confirmation {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Cancelled
        }
    }
}

/// Profile settings plus the reset and delete-account actions
#[derive(Clone)]
pub struct AccountService {
    store: PersistenceStore,
    repository: Arc<SymptomRepository>,
}

impl AccountService {
    pub fn new(store: PersistenceStore, repository: Arc<SymptomRepository>) -> Self {
        Self { store, repository }
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.store.load_profile()
    }

    /// Toggle notifications on the saved profile
    pub fn set_notifications_enabled(&self, enabled: bool) -> Result<UserProfile> {
        let mut profile = self
            .store
            .load_profile()
            .ok_or_else(|| Error::NotFound("profile".into()))?;

        profile.notifications_enabled = enabled;
        self.store.save_profile(&profile)?;
        info!(enabled, "Notifications setting changed");

        Ok(profile)
    }

    /// Delete every symptom entry, keeping the profile
    ///
    /// Returns `false` without touching anything when cancelled.
    pub fn reset_symptoms(&self, confirmation: Confirmation) -> Result<bool> {
        if !confirmation.is_confirmed() {
            return Ok(false);
        }

        let count = self.repository.len();
        self.repository.clear_all()?;
        info!(count, "Symptom data reset");
        Ok(true)
    }

    /// Delete the profile, flags and every symptom entry
    ///
    /// The gate cache survives. Returns `false` when cancelled.
    pub fn delete_account(&self, confirmation: Confirmation) -> Result<bool> {
        if !confirmation.is_confirmed() {
            return Ok(false);
        }

        self.store.clear_all()?;
        self.repository.reload();
        info!("Account deleted");
        Ok(true)
    }
}
