//! Name-addressable response schemas and reply clean-up.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::character::{CharacterSchema, ChainOfThoughtCharacterSchema};
use crate::error::{Error, Result};
use crate::router::IntentRouterSchema;
use crate::scenario::{ChainOfThoughtScenarioSchema, ScenarioSchema};
use crate::schema::Schema;
use crate::session::{CharacterInSimulationOutput, ScenarioFeedbackSchema, ScenarioModeratorOutput};

/// Every response schema a model reply can be checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseSchema {
    /// [`ScenarioSchema`].
    Scenario,
    /// [`ChainOfThoughtScenarioSchema`].
    ChainOfThoughtScenario,
    /// [`CharacterSchema`].
    Character,
    /// [`ChainOfThoughtCharacterSchema`].
    ChainOfThoughtCharacter,
    /// [`ScenarioModeratorOutput`].
    ModeratorOutput,
    /// [`CharacterInSimulationOutput`].
    CharacterInSimulationOutput,
    /// [`ScenarioFeedbackSchema`].
    ScenarioFeedback,
    /// [`IntentRouterSchema`].
    IntentRouter,
}

impl ResponseSchema {
    /// Every registered schema.
    pub const ALL: [Self; 8] = [
        Self::Scenario,
        Self::ChainOfThoughtScenario,
        Self::Character,
        Self::ChainOfThoughtCharacter,
        Self::ModeratorOutput,
        Self::CharacterInSimulationOutput,
        Self::ScenarioFeedback,
        Self::IntentRouter,
    ];

    /// Returns the schema's type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scenario => ScenarioSchema::NAME,
            Self::ChainOfThoughtScenario => ChainOfThoughtScenarioSchema::NAME,
            Self::Character => CharacterSchema::NAME,
            Self::ChainOfThoughtCharacter => ChainOfThoughtCharacterSchema::NAME,
            Self::ModeratorOutput => ScenarioModeratorOutput::NAME,
            Self::CharacterInSimulationOutput => CharacterInSimulationOutput::NAME,
            Self::ScenarioFeedback => ScenarioFeedbackSchema::NAME,
            Self::IntentRouter => IntentRouterSchema::NAME,
        }
    }

    /// Returns the JSON Schema of the underlying type.
    #[must_use]
    pub fn json_schema(self) -> Value {
        match self {
            Self::Scenario => ScenarioSchema::schema_value(),
            Self::ChainOfThoughtScenario => ChainOfThoughtScenarioSchema::schema_value(),
            Self::Character => CharacterSchema::schema_value(),
            Self::ChainOfThoughtCharacter => ChainOfThoughtCharacterSchema::schema_value(),
            Self::ModeratorOutput => ScenarioModeratorOutput::schema_value(),
            Self::CharacterInSimulationOutput => CharacterInSimulationOutput::schema_value(),
            Self::ScenarioFeedback => ScenarioFeedbackSchema::schema_value(),
            Self::IntentRouter => IntentRouterSchema::schema_value(),
        }
    }

    /// Validates a raw model reply and returns the normalized value
    /// (defaults applied).
    ///
    /// Markdown code fences around the JSON are stripped first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedJson`] or [`Error::Validation`].
    pub fn validate_reply(self, reply: &str) -> Result<Value> {
        let text = strip_code_fence(reply);
        match self {
            Self::Scenario => normalize::<ScenarioSchema>(text),
            Self::ChainOfThoughtScenario => normalize::<ChainOfThoughtScenarioSchema>(text),
            Self::Character => normalize::<CharacterSchema>(text),
            Self::ChainOfThoughtCharacter => normalize::<ChainOfThoughtCharacterSchema>(text),
            Self::ModeratorOutput => normalize::<ScenarioModeratorOutput>(text),
            Self::CharacterInSimulationOutput => normalize::<CharacterInSimulationOutput>(text),
            Self::ScenarioFeedback => normalize::<ScenarioFeedbackSchema>(text),
            Self::IntentRouter => normalize::<IntentRouterSchema>(text),
        }
    }

    /// Returns `true` for chain-of-thought envelopes.
    #[must_use]
    pub const fn is_chain_of_thought(self) -> bool {
        matches!(
            self,
            Self::ChainOfThoughtScenario | Self::ChainOfThoughtCharacter
        )
    }

    /// Extracts the reasoning block from a validated envelope value.
    #[must_use]
    pub fn reasoning_of(self, value: &Value) -> Option<Value> {
        if !self.is_chain_of_thought() {
            return None;
        }
        value.get("internal_thought_process").cloned()
    }
}

impl fmt::Display for ResponseSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResponseSchema {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|schema| schema.name() == name)
            .ok_or_else(|| Error::UnknownSchema {
                name: name.to_owned(),
            })
    }
}

fn normalize<T: Schema>(text: &str) -> Result<Value> {
    T::from_json(text).map(|parsed| parsed.to_value())
}

/// Removes a Markdown code fence (```` ```json ```` or bare ```` ``` ````)
/// surrounding a model reply. Text without a fence is returned trimmed.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, ...) on the opening line.
    let body = match body.find('\n') {
        Some(newline) if !body[..newline].trim().contains(['{', '[']) => &body[newline + 1..],
        _ => body,
    };
    body.trim()
}
