use log::{debug, warn};

use crate::config::StorageKeys;
use crate::error::StorageError;
use crate::model::UserProfile;
use crate::storage::{BrowserStorage, KeyValueStore};

pub struct SessionStore<S: KeyValueStore> {
    store: S,
}

impl SessionStore<BrowserStorage> {
    pub fn browser() -> Self {
        Self::new(BrowserStorage)
    }
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // The profile marks the session, so it is written last.
    pub fn save(&self, profile: &UserProfile, remember: bool) -> Result<(), StorageError> {
        let raw = serde_json::to_string(profile)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;

        if remember {
            self.store
                .set(StorageKeys::ACCOUNT_NUMBER, &profile.account_number)?;
            self.store.set(StorageKeys::REMEMBER_ME, "true")?;
        } else {
            self.store.remove(StorageKeys::ACCOUNT_NUMBER)?;
            self.store.remove(StorageKeys::REMEMBER_ME)?;
        }
        self.store.set(StorageKeys::USER_DATA, &raw)?;

        debug!("session saved for account {}", profile.account_number);
        Ok(())
    }

    pub fn load(&self) -> Option<UserProfile> {
        let raw = self.store.get(StorageKeys::USER_DATA)?;
        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!("ignoring malformed session record: {}", err);
                None
            }
        }
    }

    /// Removes the profile only. Remember-me keys stay for the next prefill.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(StorageKeys::USER_DATA)
    }

    pub fn remembered_account(&self) -> Option<String> {
        if self.store.get(StorageKeys::REMEMBER_ME).as_deref() != Some("true") {
            return None;
        }
        self.store
            .get(StorageKeys::ACCOUNT_NUMBER)
            .filter(|account| !account.is_empty())
    }
}
