//! Scenario request and response shapes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::{ChainOfThought, impl_schema};

/// How much an objective matters to winning the scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must be achieved.
    Critical,
    /// Strongly expected.
    Important,
    /// Bonus goal.
    Optional,
}

/// Scenario difficulty level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Difficulty {
    /// Suitable for first-time players.
    Beginner,
    /// Some experience expected.
    Intermediate,
    /// Demanding.
    Advanced,
    /// Hardest tier.
    Expert,
}

/// A single objective within a scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectiveSchema {
    /// Objective ID.
    pub id: u32,
    /// Objective description.
    pub description: String,
    /// Objective priority level.
    pub priority: Priority,
}

/// A character as it appears inside a scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioCharacterSchema {
    /// Character name.
    pub name: String,
    /// Character role or profession.
    #[serde(default = "default_role")]
    pub role: String,
    /// Detailed personality description.
    pub personality: String,
    /// Expertise keywords.
    pub expertise_keywords: Vec<String>,
    /// Tailwind CSS background colour class (e.g. `bg-blue-500`).
    pub avatar_color: String,
}

fn default_role() -> String {
    "Character".to_owned()
}

/// The structured scenario a model is expected to return.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioSchema {
    /// Scenario title.
    pub title: String,
    /// Detailed scenario description.
    pub description: String,
    /// Scenario category.
    pub category: String,
    /// Scenario difficulty level.
    pub difficulty: Difficulty,
    /// Estimated play duration in minutes.
    pub estimated_duration: u32,
    /// Objectives, in the order they should be presented.
    pub objectives: Vec<ObjectiveSchema>,
    /// Conditions for scenario success.
    pub win_conditions: String,
    /// Conditions for scenario failure.
    pub lose_conditions: String,
    /// Maximum number of turns.
    pub max_turns: u32,
    /// Opening scene description.
    pub scenario_opening_message: String,
    /// Characters involved in the scenario.
    pub characters: Vec<ScenarioCharacterSchema>,
    /// Tags for categorization and search.
    pub tags: Vec<String>,
    /// Whether the scenario is publicly visible.
    #[serde(default = "default_public")]
    pub is_public: bool,
}

const fn default_public() -> bool {
    true
}

/// The model's planning notes for a scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioThoughtProcess {
    /// What the request is really asking for.
    pub analysis: String,
    /// Plan for setting, tone and category.
    pub setting_idea: String,
    /// Plan for objectives and their priorities.
    pub objectives_idea: String,
    /// Plan for the cast.
    pub characters_idea: String,
    /// Draft of the opening message.
    pub opening_idea: String,
}

/// Chain-of-thought envelope wrapping a [`ScenarioSchema`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChainOfThoughtScenarioSchema {
    /// Structured plan, filled before the final result.
    pub internal_thought_process: ScenarioThoughtProcess,
    /// The final scenario built from the plan.
    pub final_scenario: ScenarioSchema,
}

/// Input for creating a scenario from a free-text request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ScenarioCreationRequest {
    /// What the user asked for, verbatim.
    #[schemars(length(min = 1))]
    pub user_request: String,
}

/// Input for revising an existing scenario.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ScenarioEditRequest {
    /// The scenario as it currently stands.
    pub current_scenario: ScenarioSchema,
    /// The requested change.
    #[schemars(length(min = 1))]
    pub edit_request: String,
}

impl_schema!(
    ObjectiveSchema,
    ScenarioCharacterSchema,
    ScenarioSchema,
    ScenarioThoughtProcess,
    ChainOfThoughtScenarioSchema,
    ScenarioCreationRequest,
    ScenarioEditRequest,
);

impl ChainOfThought for ChainOfThoughtScenarioSchema {
    type Reasoning = ScenarioThoughtProcess;
    type Final = ScenarioSchema;

    fn reasoning(&self) -> &ScenarioThoughtProcess {
        &self.internal_thought_process
    }

    fn into_final(self) -> ScenarioSchema {
        self.final_scenario
    }
}
