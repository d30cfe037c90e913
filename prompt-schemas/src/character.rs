//! Character request and response shapes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::{ChainOfThought, impl_schema};

/// The complete data schema for a single character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CharacterSchema {
    /// A realistic, culturally appropriate name.
    pub name: String,
    /// Profession, function or archetype.
    pub role: String,
    /// Distinctive physical description.
    pub appearance: String,
    /// Multi-dimensional personality, including flaws and stress response.
    pub personality: String,
    /// Between three and eight specific skills.
    #[schemars(length(min = 3, max = 8))]
    pub expertise_keywords: Vec<String>,
    /// Personal history explaining expertise and motivations.
    pub background: String,
    /// What the character wants to achieve.
    pub goals: String,
    /// What the character worries about or avoids.
    pub fears: String,
    /// Two or three example phrases separated by ` | `.
    pub notable_quotes: String,
}

/// The model's planning notes for a character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CharacterInternalThoughtProcess {
    /// Analysis of the user's notes.
    pub analysis: String,
    /// Plan for the role.
    pub role_idea: String,
    /// Plan for the personality, including internal conflict.
    pub personality_idea: String,
    /// Plan for the background.
    pub background_idea: String,
    /// Plan for the expertise keywords.
    pub expertise_idea: String,
    /// Draft notable quote.
    pub quote_idea: String,
}

/// Chain-of-thought envelope wrapping a [`CharacterSchema`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChainOfThoughtCharacterSchema {
    /// Structured plan, filled before the final result.
    pub internal_thought_process: CharacterInternalThoughtProcess,
    /// The final character built from the plan.
    pub final_character: CharacterSchema,
}

/// Optional guidance notes for creating a character.
///
/// Every field may be omitted; the template tells the model to invent
/// whatever is missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CharacterCreationRequest {
    /// Guidance on role or profession.
    #[serde(default)]
    pub role_notes: Option<String>,
    /// Guidance on personality and internal conflicts.
    #[serde(default)]
    pub personality_notes: Option<String>,
    /// Guidance on history and key life events.
    #[serde(default)]
    pub background_notes: Option<String>,
    /// Guidance on skills and knowledge.
    #[serde(default)]
    pub expertise_notes: Option<String>,
    /// Guidance on primary objectives.
    #[serde(default)]
    pub goal_notes: Option<String>,
    /// Anything else.
    #[serde(default)]
    pub other_notes: Option<String>,
}

/// Input for revising an existing character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CharacterEditRequest {
    /// The character as it currently stands.
    pub current_character: CharacterSchema,
    /// The requested change.
    #[schemars(length(min = 1))]
    pub edit_notes: String,
}

impl_schema!(
    CharacterSchema,
    CharacterInternalThoughtProcess,
    ChainOfThoughtCharacterSchema,
    CharacterCreationRequest,
    CharacterEditRequest,
);

impl ChainOfThought for ChainOfThoughtCharacterSchema {
    type Reasoning = CharacterInternalThoughtProcess;
    type Final = CharacterSchema;

    fn reasoning(&self) -> &CharacterInternalThoughtProcess {
        &self.internal_thought_process
    }

    fn into_final(self) -> CharacterSchema {
        self.final_character
    }
}

impl CharacterCreationRequest {
    /// Returns `true` when no guidance was supplied at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [
            &self.role_notes,
            &self.personality_notes,
            &self.background_notes,
            &self.expertise_notes,
            &self.goal_notes,
            &self.other_notes,
        ]
        .iter()
        .all(|note| note.as_deref().is_none_or(|text| text.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::Schema;

    fn character_json(keywords: &[&str]) -> serde_json::Value {
        json!({
            "name": "Mara Voss",
            "role": "Harbour master",
            "appearance": "Weathered coat, brass spyglass.",
            "personality": "Dry wit, stubborn, fiercely loyal.",
            "expertise_keywords": keywords,
            "background": "Grew up on the docks.",
            "goals": "Keep the port safe.",
            "fears": "Losing another ship.",
            "notable_quotes": "Tide waits for no one. | Papers, please."
        })
    }

    #[test]
    fn expertise_keywords_are_bounded() {
        assert!(CharacterSchema::from_value(character_json(&["tides", "ledgers", "knots"])).is_ok());

        let err = CharacterSchema::from_value(character_json(&["tides"])).expect_err("too few");
        assert_eq!(err.violations()[0].path(), "/expertise_keywords");

        let nine = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
        assert!(CharacterSchema::from_value(character_json(&nine)).is_err());
    }

    #[test]
    fn creation_request_fields_are_optional() {
        let request = CharacterCreationRequest::from_value(json!({})).expect("empty is fine");
        assert!(request.is_blank());

        let request = CharacterCreationRequest::from_value(json!({ "role_notes": "smuggler" }))
            .expect("one note");
        assert!(!request.is_blank());
        assert_eq!(request.role_notes.as_deref(), Some("smuggler"));
    }

    #[test]
    fn creation_request_rejects_wrong_types() {
        let err = CharacterCreationRequest::from_value(json!({
            "role_notes": 7,
            "goal_notes": ["conquer"]
        }))
        .expect_err("two wrong types");
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn edit_request_validates_nested_character() {
        let mut current = character_json(&["tides", "ledgers", "knots"]);
        current.as_object_mut().unwrap().remove("fears");

        let err = CharacterEditRequest::from_value(json!({
            "current_character": current,
            "edit_notes": "make her younger"
        }))
        .expect_err("nested failure");
        assert_eq!(err.violations()[0].path(), "/current_character");
    }

    #[test]
    fn chain_of_thought_discards_reasoning() {
        let envelope = ChainOfThoughtCharacterSchema::from_value(json!({
            "internal_thought_process": {
                "analysis": "a",
                "role_idea": "b",
                "personality_idea": "c",
                "background_idea": "d",
                "expertise_idea": "e",
                "quote_idea": "f"
            },
            "final_character": character_json(&["tides", "ledgers", "knots"])
        }))
        .expect("valid envelope");

        assert_eq!(envelope.reasoning().quote_idea, "f");
        assert_eq!(envelope.into_final().name, "Mara Voss");
    }
}
