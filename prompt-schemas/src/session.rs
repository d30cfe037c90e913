//! Shapes used while a scenario is being played: moderation, in-character
//! replies and post-session feedback.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scenario::{ScenarioCharacterSchema, ScenarioSchema};
use crate::schema::impl_schema;

/// One line of a play-session transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ChatTurn {
    /// Who spoke (`user` or a character name).
    #[schemars(length(min = 1))]
    pub speaker: String,
    /// What was said.
    pub message: String,
}

/// Input for the moderator agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ScenarioModeratorInput {
    /// The scenario being played.
    pub scenario: ScenarioSchema,
    /// Transcript so far, oldest first.
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
    /// Current turn number (1-based).
    #[schemars(range(min = 1))]
    pub turn_number: u32,
}

/// Progress state of one objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveStatus {
    /// Not yet addressed.
    Pending,
    /// Partially achieved.
    InProgress,
    /// Achieved.
    Completed,
    /// No longer achievable.
    Failed,
}

/// Overall state of a running scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Play continues.
    Ongoing,
    /// Win conditions met.
    Won,
    /// Lose conditions met.
    Lost,
}

/// Progress for a single objective, as judged by the moderator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectiveProgress {
    /// The objective's ID within the scenario.
    pub objective_id: u32,
    /// Current status.
    pub status: ObjectiveStatus,
}

/// Output of the moderator agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioModeratorOutput {
    /// One entry per scenario objective.
    pub objectives: Vec<ObjectiveProgress>,
    /// Whether the scenario continues.
    pub game_state: GameState,
    /// Optional narration shown to the player.
    #[serde(default)]
    pub narration: Option<String>,
}

/// Input for the in-character reply agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CharacterInSimulationInput {
    /// The character to voice.
    pub character: ScenarioCharacterSchema,
    /// Title of the running scenario.
    pub scenario_title: String,
    /// Description of the running scenario.
    pub scenario_description: String,
    /// Transcript so far, oldest first.
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
    /// The player's latest message.
    #[schemars(length(min = 1))]
    pub user_message: String,
}

/// Output of the in-character reply agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CharacterInSimulationOutput {
    /// The spoken reply.
    pub message: String,
    /// One or two words describing the character's mood.
    pub emotional_state: String,
    /// Optional non-verbal action.
    #[serde(default)]
    pub action: Option<String>,
}

/// Input for the post-session feedback agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFeedbackRequest {
    /// The scenario that was played.
    pub scenario: ScenarioSchema,
    /// Full transcript, oldest first.
    pub conversation_history: Vec<ChatTurn>,
    /// How the session ended, if known.
    #[serde(default)]
    pub outcome: Option<String>,
}

/// Output of the post-session feedback agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioFeedbackSchema {
    /// Short overall assessment.
    pub summary: String,
    /// What the player did well.
    pub strengths: Vec<String>,
    /// What the player could do better.
    pub improvements: Vec<String>,
    /// Overall score from 0 to 100.
    #[schemars(range(max = 100))]
    pub score: u8,
}

impl_schema!(
    ChatTurn,
    ScenarioModeratorInput,
    ScenarioModeratorOutput,
    CharacterInSimulationInput,
    CharacterInSimulationOutput,
    ScenarioFeedbackRequest,
    ScenarioFeedbackSchema,
);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::Schema;

    #[test]
    fn moderator_output_preserves_objective_order() {
        let output = ScenarioModeratorOutput::from_value(json!({
            "objectives": [
                { "objective_id": 3, "status": "completed" },
                { "objective_id": 1, "status": "in_progress" }
            ],
            "game_state": "ongoing"
        }))
        .expect("valid output");

        assert_eq!(output.objectives[0].objective_id, 3);
        assert_eq!(output.objectives[1].status, ObjectiveStatus::InProgress);
        assert_eq!(output.narration, None);
    }

    #[test]
    fn feedback_score_is_bounded() {
        let err = ScenarioFeedbackSchema::from_value(json!({
            "summary": "Great run",
            "strengths": [],
            "improvements": [],
            "score": 140
        }))
        .expect_err("score too high");
        assert_eq!(err.violations()[0].path(), "/score");
    }

    #[test]
    fn simulation_output_requires_message() {
        let err = CharacterInSimulationOutput::from_value(json!({ "emotional_state": "wary" }))
            .expect_err("message missing");
        assert!(err.to_string().contains("message"));
    }

    #[test]
    fn chat_turn_rejects_empty_speaker() {
        assert!(ChatTurn::from_value(json!({ "speaker": "", "message": "hi" })).is_err());
    }
}
