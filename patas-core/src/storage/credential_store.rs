//! Persistent credential store for the logged-in identity.

use std::sync::Arc;

use super::error::StorageResult;
use super::traits::{KeyValueEntry, KeyValueStore};
use super::{
    KEY_EMAIL, KEY_ID, KEY_NAME, KEY_PROFILE_PICTURE_URL, KEY_TOKEN, KEY_USER_TYPE,
};
use crate::{Identity, UserType};

/// Persists an [`Identity`] in the app-private key-value namespace, one entry
/// per field.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish()
    }
}

impl CredentialStore {
    /// Wraps a platform key-value store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Writes every field of `identity` in a single batch, overwriting prior
    /// values. An absent profile picture removes the stored one.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform store rejects the batch.
    pub fn save(&self, identity: &Identity) -> StorageResult<()> {
        let picture = identity.profile_picture_url.as_ref().map_or_else(
            || KeyValueEntry::remove(KEY_PROFILE_PICTURE_URL),
            |url| KeyValueEntry::put(KEY_PROFILE_PICTURE_URL, url.as_str()),
        );
        let batch = vec![
            KeyValueEntry::put(KEY_TOKEN, identity.token.as_str()),
            KeyValueEntry::put(KEY_ID, identity.id.as_str()),
            KeyValueEntry::put(KEY_NAME, identity.name.as_str()),
            KeyValueEntry::put(KEY_EMAIL, identity.email.as_str()),
            KeyValueEntry::put(KEY_USER_TYPE, identity.user_type.to_string()),
            picture,
        ];
        self.store.apply(batch)
    }

    /// Reads the stored identity back.
    ///
    /// Returns `None` when `token`, `id` or `name` is missing or empty, so a
    /// half-written record is never treated as a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform store cannot be read.
    pub fn load(&self) -> StorageResult<Option<Identity>> {
        let Some(token) = self.required(KEY_TOKEN)? else {
            return Ok(None);
        };
        let Some(id) = self.required(KEY_ID)? else {
            return Ok(None);
        };
        let Some(name) = self.required(KEY_NAME)? else {
            return Ok(None);
        };

        let email = self.get(KEY_EMAIL)?.unwrap_or_default();
        let user_type = self
            .get(KEY_USER_TYPE)?
            .map_or(UserType::Common, |raw| UserType::parse_lenient(&raw));
        let profile_picture_url = self
            .get(KEY_PROFILE_PICTURE_URL)?
            .filter(|url| !url.is_empty());

        Ok(Some(Identity {
            token,
            id,
            name,
            email,
            user_type,
            profile_picture_url,
        }))
    }

    /// Removes every stored entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform store rejects the delete.
    pub fn clear(&self) -> StorageResult<()> {
        self.store.clear()
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.store.get(key.to_string())
    }

    fn required(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self.get(key)?.filter(|value| !value.trim().is_empty());
        if value.is_none() {
            log::debug!("stored session is missing `{key}`");
        }
        Ok(value)
    }
}
