//! Validated request and response schemas for scenario prompt agents.
//!
//! Request schemas carry user-entered data into the prompt factory;
//! response schemas describe the JSON a model must return. Both are built
//! through [`Schema::from_value`], which reports every violated field at
//! once instead of stopping at the first.

#![warn(missing_docs, clippy::pedantic)]

mod character;
mod error;
mod ids;
mod response;
mod router;
mod scenario;
mod schema;
mod session;

/// Character shapes.
pub use character::{
    ChainOfThoughtCharacterSchema, CharacterCreationRequest, CharacterEditRequest,
    CharacterInternalThoughtProcess, CharacterSchema,
};
/// Error type and result alias shared by the schema layer.
pub use error::{Error, FieldViolation, Result};
/// Agent and task identifiers.
pub use ids::{Agent, Task};
/// Name-addressable response schemas.
pub use response::{ResponseSchema, strip_code_fence};
/// Intent router output.
pub use router::{FactoryMethod, IntentRouterSchema, RouterAgent};
/// Scenario shapes.
pub use scenario::{
    ChainOfThoughtScenarioSchema, Difficulty, ObjectiveSchema, Priority, ScenarioCharacterSchema,
    ScenarioCreationRequest, ScenarioEditRequest, ScenarioSchema, ScenarioThoughtProcess,
};
/// Validated construction.
pub use schema::{ChainOfThought, Schema, validate_value};
/// Play-session shapes.
pub use session::{
    CharacterInSimulationInput, CharacterInSimulationOutput, ChatTurn, GameState,
    ObjectiveProgress, ObjectiveStatus, ScenarioFeedbackRequest, ScenarioFeedbackSchema,
    ScenarioModeratorInput, ScenarioModeratorOutput,
};
