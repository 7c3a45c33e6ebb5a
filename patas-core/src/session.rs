//! The current authenticated identity, shared by the request pipeline and the
//! view-models.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::PatasError;
use crate::storage::{CredentialStore, KeyValueStore};
use crate::Identity;

/// Whether a user is currently logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum SessionState {
    /// No identity is held.
    LoggedOut,
    /// An identity with a usable token is held.
    LoggedIn,
}

/// First screen to show after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, uniffi::Enum)]
#[strum(serialize_all = "lowercase")]
pub enum Route {
    /// The feed of nearby animals.
    Home,
    /// The login form.
    Login,
}

/// Holds at most one [`Identity`] and mirrors every login/logout to the
/// credential store.
///
/// One `Session` is created per process and shared behind an `Arc`. Writes
/// go to the store first, so a failed write never leaves memory and disk out
/// of sync.
#[derive(Debug, uniffi::Object)]
pub struct Session {
    store: CredentialStore,
    current: RwLock<Option<Identity>>,
}

impl Session {
    /// Creates a logged-out session over an existing credential store.
    #[must_use]
    pub fn with_store(store: CredentialStore) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    /// Bearer token of the current identity, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read(|identity| identity.map(|identity| identity.token.clone()))
    }

    fn read<T>(&self, f: impl FnOnce(Option<&Identity>) -> T) -> T {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        f(guard.as_ref())
    }

    fn replace(&self, identity: Option<Identity>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = identity;
    }
}

#[uniffi::export]
impl Session {
    /// Creates a logged-out session persisting to `store`.
    ///
    /// Call [`Session::restore`] right after construction.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_store(CredentialStore::new(store))
    }

    /// Restores the identity persisted by a previous process.
    ///
    /// Returns `true` if a session was restored.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store cannot be read.
    pub fn restore(&self) -> Result<bool, PatasError> {
        match self.store.load()? {
            Some(identity) => {
                log::info!("restored session for user {}", identity.id);
                self.replace(Some(identity));
                Ok(true)
            }
            None => {
                log::debug!("no stored session");
                Ok(false)
            }
        }
    }

    /// Starts a session for `identity`, replacing any current one.
    ///
    /// Must only be called with the identity returned by a successful login.
    ///
    /// # Errors
    ///
    /// Returns [`PatasError::InvalidInput`] if the identity has no usable
    /// token or id, or a storage error if it cannot be persisted.
    pub fn login(&self, identity: Identity) -> Result<(), PatasError> {
        if !identity.is_usable() {
            return Err(PatasError::invalid_input(
                "identity",
                "login response is missing a token or id",
            ));
        }
        self.store.save(&identity)?;
        log::info!("logged in as user {}", identity.id);
        self.replace(Some(identity));
        Ok(())
    }

    /// Ends the current session and wipes the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the stored credentials cannot be removed;
    /// the in-memory session is kept in that case.
    pub fn logout(&self) -> Result<(), PatasError> {
        self.store.clear()?;
        self.replace(None);
        log::info!("logged out");
        Ok(())
    }

    /// Whether an identity is currently held.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.read(|identity| identity.is_some())
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_logged_in() {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }

    /// Returns a copy of the current identity.
    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        self.read(|identity| identity.cloned())
    }

    /// Numeric id of the logged-in user, or `None` without a session.
    #[must_use]
    pub fn current_user_id(&self) -> Option<u64> {
        self.read(|identity| identity.and_then(Identity::user_id))
    }

    /// Screen to open at startup: home with a session, login otherwise.
    #[must_use]
    pub fn initial_route(&self) -> Route {
        match self.state() {
            SessionState::LoggedIn => Route::Home,
            SessionState::LoggedOut => Route::Login,
        }
    }
}
