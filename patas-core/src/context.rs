use std::sync::Arc;

use crate::api::PatasApi;
use crate::config::ClientConfig;
use crate::error::PatasError;
use crate::session::{Route, Session};
use crate::storage::KeyValueStore;

/// Everything a view-model needs: the shared session and the API client
/// that authenticates with it.
///
/// Built once at startup and cloned into each view-model.
#[derive(Debug, Clone)]
pub struct AppContext {
    session: Arc<Session>,
    api: Arc<PatasApi>,
}

impl AppContext {
    /// Restores the persisted session from `store` and builds the API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the config is invalid.
    pub fn start(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, PatasError> {
        let session = Arc::new(Session::new(store));
        session.restore()?;
        let api = Arc::new(PatasApi::new(config, Arc::clone(&session))?);
        Ok(Self { session, api })
    }

    /// Wraps an existing session and client.
    #[must_use]
    pub const fn from_parts(session: Arc<Session>, api: Arc<PatasApi>) -> Self {
        Self { session, api }
    }

    /// The shared session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The API client.
    #[must_use]
    pub fn api(&self) -> &PatasApi {
        &self.api
    }

    /// Screen to open at startup.
    #[must_use]
    pub fn initial_route(&self) -> Route {
        self.session.initial_route()
    }
}
