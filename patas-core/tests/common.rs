//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use patas_core::storage::{FileKeyValueStore, KeyValueStore, SESSION_NAMESPACE};
use patas_core::{AppContext, ClientConfig, Identity, UserType};
use tempfile::TempDir;

/// Creates a fresh temporary directory for a test.
pub fn temp_root() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Opens the session store the way a fresh process would.
pub fn open_store(root: &Path) -> Arc<dyn KeyValueStore> {
    Arc::new(FileKeyValueStore::open(root, SESSION_NAMESPACE).expect("open store"))
}

/// Starts an app context against `base_url` backed by the store under `root`.
pub fn start(root: &Path, base_url: &str) -> AppContext {
    AppContext::start(ClientConfig::with_base_url(base_url), open_store(root))
        .expect("start context")
}

/// Builds a test identity with the given id.
pub fn identity(id: &str) -> Identity {
    Identity {
        token: format!("token-{id}"),
        id: id.to_string(),
        name: "Ana".to_string(),
        email: "ana@x.com".to_string(),
        user_type: UserType::ProtectorOng,
        profile_picture_url: Some("ana.jpg".to_string()),
    }
}
