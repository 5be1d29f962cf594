//! Logging setup.
//!
//! Installs a `tracing-subscriber` formatter filtered by `RUST_LOG`, or by
//! the given default directive when `RUST_LOG` is unset. Page logs are
//! emitted under the request's `session` span, so formatted lines look
//! like:
//!
//! ```text
//! INFO request{caller_ip=10.0.0.5}:session{session_guid=67e5...}: gatehouse::pages::index: index page accessed
//! ```

use tracing_subscriber::EnvFilter;

use crate::GatehouseError;

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Installs the global subscriber. Panics if one is already installed.
pub fn init_logging(default_directive: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .init();
}

/// Like [`init_logging`], but reports an already-installed subscriber as
/// an error instead of panicking.
pub fn try_init_logging(default_directive: &str) -> Result<(), GatehouseError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .try_init()
        .map_err(|e| GatehouseError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_logging_twice_reports_error() {
        // Other tests in this binary may have won the race; either way the
        // second call must fail without panicking.
        let _ = try_init_logging("info");

        let second = try_init_logging("info");

        assert!(matches!(second, Err(GatehouseError::Logging(_))));
    }
}
