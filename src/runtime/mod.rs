//! Runtime wiring: configuration, logging, cancellation, debounce and the
//! [`BrowserSystem`] that owns the running pieces.

pub mod cancel;
pub mod config;
pub mod debounce;
pub mod system;
pub mod tracing;

pub use cancel::{cancellable, CancellationToken};
pub use config::{BrowserConfig, ConfigError};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use system::{BrowserSystem, SystemError};
pub use self::tracing::setup_tracing;
