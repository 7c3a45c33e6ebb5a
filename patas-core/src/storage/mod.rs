//! Credential storage: the platform key-value interface, bundled
//! implementations, and the identity store built on top of them.

mod credential_store;
pub mod error;
mod file;
mod memory;
pub mod traits;

pub use credential_store::CredentialStore;
pub use error::{StorageError, StorageResult};
pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use traits::{KeyValueEntry, KeyValueStore};

/// Namespace hosts should use for the session key-value store.
pub const SESSION_NAMESPACE: &str = "patas_session";

pub(crate) const KEY_TOKEN: &str = "token";
pub(crate) const KEY_ID: &str = "id";
pub(crate) const KEY_NAME: &str = "name";
pub(crate) const KEY_EMAIL: &str = "email";
pub(crate) const KEY_USER_TYPE: &str = "userType";
pub(crate) const KEY_PROFILE_PICTURE_URL: &str = "profilePictureUrl";
