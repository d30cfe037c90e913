//! Tracing setup shared by the harness binary and demos.
//!
//! Logs go to stderr so that stdout stays free for prompts and summaries.
//! `RUST_LOG` always wins; without it the level follows the `-v` count.

#![warn(missing_docs, clippy::pedantic)]

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Result alias for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter `{directive}`: {reason}")]
    Filter {
        /// The rejected directive.
        directive: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("tracing subscriber already installed: {reason}")]
    AlreadyInstalled {
        /// Subscriber diagnostic.
        reason: String,
    },
}

/// Returns the filter directive used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,prompt_eval=info",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Builds the filter from an explicit `RUST_LOG` value, falling back to the
/// verbosity-derived default.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] if `rust_log` is not a valid directive.
pub fn filter_for(verbosity: u8, rust_log: Option<&str>) -> TelemetryResult<EnvFilter> {
    let directive = rust_log
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default_directive(verbosity));

    EnvFilter::try_new(directive).map_err(|err| TelemetryError::Filter {
        directive: directive.to_owned(),
        reason: err.to_string(),
    })
}

/// Installs the global fmt subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an invalid `RUST_LOG` and
/// [`TelemetryError::AlreadyInstalled`] if called twice.
pub fn init_tracing(verbosity: u8) -> TelemetryResult<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter_for(verbosity, rust_log.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity > 1)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| TelemetryError::AlreadyInstalled {
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(default_directive(0), "warn,prompt_eval=info");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(9), "trace");
    }

    #[test]
    fn rust_log_overrides_verbosity() {
        let filter = filter_for(0, Some("prompt_factory=trace")).unwrap();
        assert_eq!(filter.to_string(), "prompt_factory=trace");
    }

    #[test]
    fn blank_rust_log_is_ignored() {
        let filter = filter_for(1, Some("  ")).unwrap();
        assert_eq!(filter.to_string(), "info");
    }

    #[test]
    fn invalid_directive_is_reported() {
        let err = filter_for(0, Some("prompt_factory=loud")).expect_err("bad directive");
        assert!(matches!(err, TelemetryError::Filter { .. }));
    }
}
