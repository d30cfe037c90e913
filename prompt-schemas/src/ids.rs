//! Agent and task identifiers.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A named family of prompt-generation tasks.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Agent {
    /// Authors and revises whole scenarios.
    ScenarioHelper,
    /// Authors and revises standalone characters.
    CharacterHelper,
    /// Tracks objective progress while a scenario is played.
    Moderator,
    /// Speaks as one character inside a running scenario.
    CharacterInSimulation,
    /// Reviews a finished play session.
    ScenarioFeedback,
}

impl Agent {
    /// Every agent, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::ScenarioHelper,
        Self::CharacterHelper,
        Self::Moderator,
        Self::CharacterInSimulation,
        Self::ScenarioFeedback,
    ];

    /// Returns the snake_case name used in templates, config and test cases.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ScenarioHelper => "scenario_helper",
            Self::CharacterHelper => "character_helper",
            Self::Moderator => "moderator",
            Self::CharacterInSimulation => "character_in_simulation",
            Self::ScenarioFeedback => "scenario_feedback",
        }
    }
}

impl Display for Agent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Agent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|agent| agent.as_str() == s.trim())
            .ok_or_else(|| Error::UnknownIdentifier {
                kind: "agent",
                value: s.to_owned(),
            })
    }
}

/// A single operation offered by an agent.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Produce something new from free-form notes.
    Create,
    /// Revise an existing object according to an instruction.
    Edit,
    /// Judge the state of a running scenario.
    Moderate,
    /// Produce the next in-character reply.
    Respond,
    /// Review a completed session.
    Review,
}

impl Task {
    /// Every task, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Create,
        Self::Edit,
        Self::Moderate,
        Self::Respond,
        Self::Review,
    ];

    /// Returns the snake_case task name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Moderate => "moderate",
            Self::Respond => "respond",
            Self::Review => "review",
        }
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = Error;

    /// Accepts plain names (`create`) and factory method names
    /// (`build_prompt_create`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_prefix("build_prompt_").unwrap_or(trimmed);
        Self::ALL
            .into_iter()
            .find(|task| task.as_str() == name)
            .ok_or_else(|| Error::UnknownIdentifier {
                kind: "task",
                value: s.to_owned(),
            })
    }
}
