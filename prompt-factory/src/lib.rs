//! Prompt construction for scenario prompt agents.
//!
//! A [`TemplateStore`] holds every agent template, parsed once. Per-agent
//! factories borrow it, validate a typed request and render a
//! [`PromptPair`]. [`PromptFactory`] does the same for callers that only
//! know the agent and task by name; the supported pairs are listed in
//! [`CATALOG`].
//!
//! Rendering is deterministic: the same request always yields the same
//! bytes.

#![warn(missing_docs, clippy::pedantic)]

mod agents;
mod catalog;
mod error;
mod factory;
mod pair;
mod template;

/// Per-agent factories.
pub use agents::{
    CharacterHelperFactory, CharacterInSimulationFactory, ModeratorFactory,
    ScenarioFeedbackFactory, ScenarioHelperFactory,
};
/// The (agent, task) catalog.
pub use catalog::{CATALOG, FIXED_USER_PROMPT, PromptSpec, lookup, tasks_for, template_names};
/// Error types and result aliases.
pub use error::{FactoryError, FactoryResult, TemplateError, TemplateResult};
/// Name-addressed dispatch.
pub use factory::PromptFactory;
/// Rendered output.
pub use pair::PromptPair;
/// Template storage.
pub use template::TemplateStore;
