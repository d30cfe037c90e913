use prompt_schemas::{ChatTurn, ScenarioCharacterSchema, ScenarioSchema, Schema};
use serde_json::json;

pub(crate) fn scenario() -> ScenarioSchema {
    ScenarioSchema::from_value(json!({
        "title": "Mutiny on the Salty Gull",
        "description": "Talk a grumpy pirate captain out of marooning the crew.",
        "category": "Negotiation",
        "difficulty": "Intermediate",
        "estimated_duration": 15,
        "objectives": [
            { "id": 1, "description": "Learn why the captain is furious", "priority": "critical" },
            { "id": 2, "description": "Offer a fair share of the treasure", "priority": "important" }
        ],
        "win_conditions": "The captain agrees to keep the crew aboard.",
        "lose_conditions": "The crew is marooned.",
        "max_turns": 12,
        "scenario_opening_message": "The deck creaks as Captain Grimbeard glares at you.",
        "characters": [character()],
        "tags": ["pirates", "negotiation"]
    }))
    .expect("fixture scenario is valid")
}

pub(crate) fn character() -> ScenarioCharacterSchema {
    ScenarioCharacterSchema {
        name: "Captain Grimbeard".to_owned(),
        role: "Pirate captain".to_owned(),
        personality: "Gruff, suspicious and secretly sentimental.".to_owned(),
        expertise_keywords: vec!["navigation".to_owned(), "swordplay".to_owned()],
        avatar_color: "bg-amber-500".to_owned(),
    }
}

pub(crate) fn transcript() -> Vec<ChatTurn> {
    vec![
        ChatTurn {
            speaker: "user".to_owned(),
            message: "Captain, a word?".to_owned(),
        },
        ChatTurn {
            speaker: "Captain Grimbeard".to_owned(),
            message: "Make it quick, landlubber.".to_owned(),
        },
    ]
}
