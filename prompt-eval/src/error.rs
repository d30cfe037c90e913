use std::path::PathBuf;

use prompt_adapters::AdapterError;
use prompt_config::ConfigError;
use prompt_factory::{FactoryError, TemplateError};
use thiserror::Error;

/// Result alias for harness operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while loading or running test cases.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A file or directory could not be read or written.
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A test case is not valid YAML for the test-case format.
    #[error("cannot parse test case {}: {source}", .path.display())]
    TestCaseParse {
        /// Test case file.
        path: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: serde_yaml::Error,
    },

    /// A test case parsed but is unusable.
    #[error("invalid test case {}: {reason}", .path.display())]
    InvalidTestCase {
        /// Test case file.
        path: PathBuf,
        /// What is wrong.
        reason: String,
    },

    /// No test cases matched.
    #[error("no test cases found in {}", .dir.display())]
    NoTestCases {
        /// Directory that was scanned.
        dir: PathBuf,
    },

    /// Configuration lookup failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The prompt could not be built.
    #[error(transparent)]
    Factory(#[from] FactoryError),

    /// The template set could not be loaded.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The model call failed.
    #[error("model call failed: {0}")]
    Adapter(#[from] AdapterError),

    /// An environment file exists but could not be loaded.
    #[error("cannot load .env file: {source}")]
    EnvFile {
        /// Loader diagnostic.
        #[source]
        source: dotenvy::Error,
    },

    /// The report could not be rendered.
    #[error("cannot render report: {reason}")]
    Report {
        /// Renderer diagnostic.
        reason: String,
    },
}

impl EvalError {
    pub(crate) fn invalid_case(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidTestCase {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
