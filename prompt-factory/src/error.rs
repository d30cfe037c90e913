//! Error types for template loading and prompt rendering.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for template store operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Result alias for prompt factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;

/// Errors raised while loading or rendering templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Templates named by the catalog are absent from the store.
    #[error("missing templates: {}", .names.join(", "))]
    MissingTemplates {
        /// Names of the absent templates.
        names: Vec<String>,
    },

    /// The template directory could not be used.
    #[error("cannot load templates from {}: {reason}", .path.display())]
    Directory {
        /// The directory that was requested.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// A template failed to parse.
    #[error("template parse failed: {reason}")]
    Parse {
        /// Parser diagnostic, including the cause chain.
        reason: String,
    },

    /// A template referenced a placeholder its context does not provide, or
    /// otherwise failed to render.
    #[error("template `{name}` failed to render: {reason}")]
    Render {
        /// Name of the template.
        name: String,
        /// Renderer diagnostic, including the cause chain.
        reason: String,
    },
}

impl TemplateError {
    pub(crate) fn render(name: &str, err: &tera::Error) -> Self {
        Self::Render {
            name: name.to_owned(),
            reason: describe(err),
        }
    }

    pub(crate) fn parse(err: &tera::Error) -> Self {
        Self::Parse {
            reason: describe(err),
        }
    }
}

/// Errors raised while building prompts.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// The agent does not offer the requested task.
    #[error("unsupported operation: agent `{agent}` has no `{task}` task")]
    UnsupportedOperation {
        /// Requested agent name.
        agent: String,
        /// Requested task name.
        task: String,
    },

    /// The raw inputs did not validate against the task's request schema.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] prompt_schemas::Error),

    /// A template does not match the data bound to it. This is a programming
    /// error: the template or the schema must be fixed.
    #[error("template/schema mismatch: {0}")]
    TemplateMismatch(#[from] TemplateError),

    /// The request could not be turned into a template context.
    #[error("cannot build template context: {reason}")]
    Context {
        /// Serializer diagnostic.
        reason: String,
    },
}

impl FactoryError {
    /// Convenience constructor for unsupported agent/task pairs.
    #[must_use]
    pub fn unsupported(agent: impl ToString, task: impl ToString) -> Self {
        Self::UnsupportedOperation {
            agent: agent.to_string(),
            task: task.to_string(),
        }
    }
}

// Tera reports the useful detail (undefined variable, bad filter) in the
// source chain rather than the top-level message.
fn describe(err: &tera::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}
