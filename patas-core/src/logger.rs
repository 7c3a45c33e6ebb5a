//! Bridges the `log` facade used inside the SDK to a logger implemented by the host app.
//!
//! ## Kotlin
//!
//! ```kotlin
//! object PatasLogBridge : Logger {
//!     override fun log(level: LogLevel, message: String) {
//!         when (level) {
//!             LogLevel.ERROR -> Log.e("Patas", message)
//!             LogLevel.WARN -> Log.w("Patas", message)
//!             else -> Log.d("Patas", message)
//!         }
//!     }
//! }
//!
//! // Application.onCreate, once
//! setLogger(PatasLogBridge, LogLevel.INFO)
//! ```

use std::sync::{Arc, OnceLock};

/// Receives the SDK's log records.
///
/// Implemented by the host (Logcat, `os_log`, ...) and installed with [`set_logger`].
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs `message` at `level`.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, uniffi::Enum)]
pub enum LogLevel {
    /// Very detailed tracing.
    Trace,
    /// Debugging information.
    Debug,
    /// Normal progress, e.g. login and logout.
    Info,
    /// Something unexpected that the SDK recovered from.
    Warn,
    /// A failed operation.
    Error,
}

impl LogLevel {
    const fn to_filter(self) -> log::LevelFilter {
        match self {
            Self::Trace => log::LevelFilter::Trace,
            Self::Debug => log::LevelFilter::Debug,
            Self::Info => log::LevelFilter::Info,
            Self::Warn => log::LevelFilter::Warn,
            Self::Error => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Forwards `log` records to the installed [`Logger`].
struct ForeignLogger;

/// Debug and trace records from dependencies (reqwest, hyper, ...) are noise
/// for app developers; only the SDK's own are forwarded.
fn is_forwarded(level: log::Level, module_path: Option<&str>) -> bool {
    level <= log::Level::Info || module_path.is_some_and(|path| path.starts_with("patas"))
}

impl log::Log for ForeignLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !is_forwarded(record.level(), record.module_path()) {
            return;
        }
        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(record.level().into(), record.args().to_string());
        }
    }

    fn flush(&self) {}
}

/// Installs the host logger and sets the most verbose level that is forwarded.
///
/// Only the first call installs a logger; later calls just adjust `max_level`.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>, max_level: LogLevel) {
    static BRIDGE: ForeignLogger = ForeignLogger;

    if LOGGER_INSTANCE.set(logger).is_ok() {
        if let Err(e) = log::set_logger(&BRIDGE) {
            eprintln!("Failed to set logger: {e}");
        }
    }
    log::set_max_level(max_level.to_filter());
}
