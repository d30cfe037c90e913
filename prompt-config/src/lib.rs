//! Configuration for the prompt evaluation harness.
//!
//! Two YAML documents drive a run: `models.yaml` names every model the
//! harness may call, and `agents.yaml` picks a default model per agent.
//! API keys never live in these files; each model names the environment
//! variable that holds its key.

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_agents, load_models};
pub use schema::{
    AgentConfig, AgentsConfig, DEFAULT_CRITIQUE_MODEL, GenerationConfig, ModelConfig,
    ModelsConfig, Provider,
};
