//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Default filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the logging system
///
/// Honors `RUST_LOG` and falls back to [`DEFAULT_FILTER`]. Calling it more than
/// once is harmless; later calls leave the first logger in place.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or(DEFAULT_FILTER);
    if env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialised");
    }
}
