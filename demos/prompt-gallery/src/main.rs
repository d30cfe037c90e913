//! Renders every supported prompt and validates a sample model reply.

use anyhow::Result;
use prompt_kit::factory::CATALOG;
use prompt_kit::prelude::*;
use prompt_kit::schemas::ScenarioCreationRequest;
use serde_json::{Value, json};
use tracing::info;

fn main() -> Result<()> {
    prompt_kit::telemetry::init_tracing(1)?;

    println!("=== Scenario prompt gallery ===\n");

    let store = TemplateStore::builtin()?;
    render_catalog(&store)?;
    validate_reply()?;
    reject_bad_request(&store);

    Ok(())
}

fn render_catalog(store: &TemplateStore) -> Result<()> {
    println!("--- Every (agent, task) pair ---\n");

    let factory = PromptFactory::new(store);
    for spec in CATALOG {
        let pair = factory.build(spec.agent, spec.task, sample_inputs(spec.agent, spec.task))?;
        info!(agent = %spec.agent, task = %spec.task, "rendered");
        println!(
            "{}/{}: system {} chars, user {} chars, expects {}",
            spec.agent,
            spec.task,
            pair.system().len(),
            pair.user().len(),
            spec.output_schema
        );
    }

    let pirate = factory.scenario_helper().build_create(&ScenarioCreationRequest {
        user_request: "a grumpy pirate scenario".to_owned(),
    })?;
    println!("\nUser prompt for the pirate request:\n{}", pirate.user());
    Ok(())
}

fn validate_reply() -> Result<()> {
    println!("--- Validating a reply ---\n");

    let reply = format!(
        "```json\n{}\n```",
        json!({ "message": "Arr, state yer business.", "emotional_state": "grumpy" })
    );
    let value = ResponseSchema::CharacterInSimulationOutput.validate_reply(&reply)?;
    println!("Fenced reply accepted: {value}\n");
    Ok(())
}

fn reject_bad_request(store: &TemplateStore) {
    println!("--- Rejecting an invalid request ---\n");

    let inputs = json!({ "scenario": {}, "conversation_history": [], "turn_number": 0 });
    match PromptFactory::new(store).build(Agent::Moderator, Task::Moderate, inputs) {
        Ok(_) => println!("unexpectedly rendered"),
        Err(err) => println!("{err}"),
    }
}

fn scenario() -> Value {
    json!({
        "title": "Mutiny on the Salty Gull",
        "description": "Talk the captain out of hanging the mutineers.",
        "category": "Negotiation",
        "difficulty": "Intermediate",
        "estimated_duration": 15,
        "objectives": [
            { "id": 1, "description": "Learn why the captain is furious", "priority": "critical" },
            { "id": 2, "description": "Win a pardon for the crew", "priority": "important" }
        ],
        "win_conditions": "The captain spares the crew.",
        "lose_conditions": "The gallows are used.",
        "max_turns": 12,
        "scenario_opening_message": "The captain glares from the quarterdeck.",
        "characters": [{
            "name": "Captain Grimbeard",
            "role": "Pirate captain",
            "personality": "Grumpy, proud, secretly fair.",
            "expertise_keywords": ["navigation", "swordplay"],
            "avatar_color": "bg-red-700"
        }],
        "tags": ["pirate"]
    })
}

fn sample_inputs(agent: Agent, task: Task) -> Value {
    let transcript = json!([
        { "speaker": "user", "message": "Captain, a word?" },
        { "speaker": "Captain Grimbeard", "message": "Make it quick, landlubber." }
    ]);
    match (agent, task) {
        (Agent::ScenarioHelper, Task::Edit) => {
            json!({ "current_scenario": scenario(), "edit_request": "Set it during a storm" })
        }
        (Agent::CharacterHelper, Task::Create) => json!({ "role_notes": "ship's cook" }),
        (Agent::CharacterHelper, Task::Edit) => json!({
            "current_character": {
                "name": "Captain Grimbeard",
                "role": "Pirate captain",
                "appearance": "Salt-stained coat, one gold tooth.",
                "personality": "Grumpy, proud, secretly fair.",
                "expertise_keywords": ["navigation", "swordplay", "gambling"],
                "background": "Thirty years at sea.",
                "goals": "Keep his ship.",
                "fears": "Mutiny.",
                "notable_quotes": "Nobody leaves the Gull."
            },
            "edit_notes": "Give him a parrot"
        }),
        (Agent::Moderator, _) => json!({
            "scenario": scenario(),
            "conversation_history": transcript,
            "turn_number": 2
        }),
        (Agent::CharacterInSimulation, _) => json!({
            "character": scenario()["characters"][0],
            "scenario_title": "Mutiny on the Salty Gull",
            "scenario_description": "Talk the captain out of hanging the mutineers.",
            "conversation_history": transcript,
            "user_message": "The crew only wants a fair share."
        }),
        (Agent::ScenarioFeedback, _) => json!({
            "scenario": scenario(),
            "conversation_history": transcript,
            "outcome": "won"
        }),
        _ => json!({ "user_request": "a grumpy pirate scenario" }),
    }
}
