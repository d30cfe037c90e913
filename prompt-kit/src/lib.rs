//! Typed prompt construction and validation for scenario role-play agents.
//!
//! Depend on this crate via `cargo add prompt-kit`. It bundles the library
//! crates behind feature flags so hosts that only validate model replies
//! can leave out templating and HTTP clients.

#![warn(missing_docs, clippy::pedantic)]

/// Request and response schemas (always available).
pub use prompt_schemas as schemas;

/// Template store and prompt factories (enabled by `factory` feature).
#[cfg(feature = "factory")]
pub use prompt_factory as factory;

/// Model API adapters (enabled by `adapters` feature).
#[cfg(feature = "adapters")]
pub use prompt_adapters as adapters;

/// Model and agent configuration (enabled by `config` feature).
#[cfg(feature = "config")]
pub use prompt_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use prompt_telemetry as telemetry;

/// The types most hosts need.
pub mod prelude {
    #[cfg(feature = "factory")]
    pub use prompt_factory::{PromptFactory, PromptPair, TemplateStore};
    pub use prompt_schemas::{Agent, ChainOfThought, ResponseSchema, Schema, Task};
}
