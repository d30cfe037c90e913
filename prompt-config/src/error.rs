use std::path::PathBuf;

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid YAML for its schema.
    #[error("invalid configuration in {origin}: {source}")]
    Parse {
        /// File name, or `<inline>` for in-memory documents.
        origin: String,
        /// Underlying parser failure.
        #[source]
        source: serde_yaml::Error,
    },

    /// A model key is not defined in `models.yaml`.
    #[error("model `{key}` is not defined in the models configuration")]
    UnknownModel {
        /// The missing key.
        key: String,
    },

    /// An agent is not defined in `agents.yaml`.
    #[error("agent `{name}` is not defined in the agents configuration")]
    UnknownAgent {
        /// The missing agent name.
        name: String,
    },

    /// The environment variable holding a model's API key is unset or empty.
    #[error("API key env var `{env}` for model `{model}` is not set")]
    MissingApiKey {
        /// Model key.
        model: String,
        /// Environment variable name.
        env: String,
    },

    /// A value is present but unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl ConfigError {
    /// Convenience constructor for invalid values.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}
