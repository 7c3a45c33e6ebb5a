//! Patas Unidas client SDK.
//!
//! Re-exports [`patas_core`] and its foreign bindings, plus [`open`] for hosts
//! written in Rust that keep the session in a directory on disk.

use std::path::Path;
use std::sync::Arc;

pub use patas_core::*;

use patas_core::storage::{FileKeyValueStore, SESSION_NAMESPACE};

patas_core::uniffi_reexport_scaffolding!();

/// Result of SDK operations.
pub type PatasResult<T, E = PatasError> = std::result::Result<T, E>;

/// Restores the session kept under `data_dir` and returns the app context.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or read, or the
/// config is invalid.
pub fn open(config: ClientConfig, data_dir: impl AsRef<Path>) -> PatasResult<AppContext> {
    let store = FileKeyValueStore::open(data_dir, SESSION_NAMESPACE)?;
    AppContext::start(config, Arc::new(store))
}
