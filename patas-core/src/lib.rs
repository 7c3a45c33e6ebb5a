#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Client core of the Patas Unidas app: persisted login session, the
//! authenticated HTTP client for the backend, and the view-models screens
//! are built on.

mod animal;
pub use animal::*;

pub mod api;
pub use api::PatasApi;

mod config;
pub use config::*;

mod context;
pub use context::*;

mod error;
pub use error::*;

mod identity;
pub use identity::*;

mod session;
pub use session::*;

pub mod logger;

pub mod storage;

pub mod viewmodel;

// private modules
mod http_request;

uniffi::setup_scaffolding!("patas_core");
