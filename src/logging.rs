//! Logging initialization for the `blocky` binary.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `BLOCKY_LOG` environment variable. Falls back to `info` level when the
//! variable is unset.
//!
//! # Usage
//!
//! ```bash
//! # Default (info level)
//! blocky show
//!
//! # Debug level
//! BLOCKY_LOG=debug blocky show
//!
//! # Module-specific filtering
//! BLOCKY_LOG=blocky_board::session=debug,warn blocky session
//! ```

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "BLOCKY_LOG";

/// Initialize the tracing subscriber.
///
/// Reads [`LOG_ENV`] for filter directives and falls back to `info` when the
/// variable is unset or invalid. Output goes to stderr so that stdout stays
/// reserved for command output.
///
/// # Panics
///
/// Panics if a global subscriber has already been set (should only be
/// called once, at startup).
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::EnvFilter;

    #[test]
    fn env_filter_parses_level_directives() {
        for d in ["info", "debug", "warn", "error", "trace"] {
            assert!(EnvFilter::try_new(d).is_ok(), "failed to parse directive: {}", d);
        }
    }

    #[test]
    fn env_filter_parses_module_directive() {
        let filter = EnvFilter::try_new("blocky_board::session=debug,warn");
        assert!(filter.is_ok());
    }
}
