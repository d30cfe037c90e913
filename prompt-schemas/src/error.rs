//! Shared error definitions for schema validation.

use std::fmt;

use thiserror::Error;

/// Result alias used by schema construction and parsing.
pub type Result<T> = std::result::Result<T, Error>;

/// A single constraint violated by a raw input value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldViolation {
    path: String,
    message: String,
}

impl FieldViolation {
    /// Creates a violation for the field at `path` (a JSON pointer, empty for the root).
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns the JSON pointer of the offending field.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the violated constraint in human-readable form.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {}", self.message)
    }
}

/// Errors raised while constructing schema values from raw input.
#[derive(Debug, Error)]
pub enum Error {
    /// The value did not satisfy the schema. Every violation is listed.
    #[error("{schema} failed validation: {}", join_violations(.violations))]
    Validation {
        /// Name of the schema that rejected the input.
        schema: &'static str,
        /// All violated constraints, in discovery order.
        violations: Vec<FieldViolation>,
    },

    /// The input text was not valid JSON.
    #[error("{schema} input is not valid JSON: {source}")]
    MalformedJson {
        /// Name of the schema the text was parsed for.
        schema: &'static str,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The generated JSON Schema could not be compiled into a validator.
    #[error("{schema} has an invalid JSON Schema: {reason}")]
    InvalidSchema {
        /// Name of the offending schema.
        schema: &'static str,
        /// Compiler diagnostic.
        reason: String,
    },

    /// No response schema is registered under the supplied name.
    #[error("unknown response schema `{name}`")]
    UnknownSchema {
        /// The name that failed to resolve.
        name: String,
    },

    /// An agent or task identifier could not be parsed.
    #[error("unknown {kind} `{value}`")]
    UnknownIdentifier {
        /// Either `agent` or `task`.
        kind: &'static str,
        /// The rejected identifier.
        value: String,
    },
}

impl Error {
    /// Returns the field violations if this is a validation failure.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation { violations, .. } => violations,
            _ => &[],
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
