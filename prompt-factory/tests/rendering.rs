use std::fs;

use prompt_factory::{
    FactoryError, PromptFactory, ScenarioHelperFactory, TemplateError, TemplateStore,
};
use prompt_schemas::{Agent, ScenarioCreationRequest, Task};
use serde_json::{Value, json};

fn scenario() -> Value {
    json!({
        "title": "The Lighthouse Keeper",
        "description": "Convince a reclusive keeper to relight the lamp.",
        "category": "Persuasion",
        "difficulty": "Beginner",
        "estimated_duration": 10,
        "objectives": [
            { "id": 1, "description": "Earn the keeper's trust", "priority": "critical" }
        ],
        "win_conditions": "The lamp is lit before dusk.",
        "lose_conditions": "The keeper bars the door.",
        "max_turns": 8,
        "scenario_opening_message": "Wind howls around the tower.",
        "characters": [{
            "name": "Old Tom",
            "personality": "Tired and stubborn.",
            "expertise_keywords": ["lamps", "weather"],
            "avatar_color": "bg-slate-500"
        }],
        "tags": ["coastal"]
    })
}

fn sample_inputs(agent: Agent, task: Task) -> Value {
    let transcript = json!([{ "speaker": "user", "message": "Hello up there!" }]);
    match (agent, task) {
        (Agent::ScenarioHelper, Task::Create) => json!({ "user_request": "a grumpy pirate scenario" }),
        (Agent::ScenarioHelper, Task::Edit) => {
            json!({ "current_scenario": scenario(), "edit_request": "Make it night time" })
        }
        (Agent::CharacterHelper, Task::Create) => json!({ "role_notes": "ship's cook" }),
        (Agent::CharacterHelper, Task::Edit) => json!({
            "current_character": {
                "name": "Old Tom",
                "role": "Lighthouse keeper",
                "appearance": "Oilskin coat.",
                "personality": "Tired and stubborn.",
                "expertise_keywords": ["lamps", "weather", "semaphore"],
                "background": "Forty years on the rock.",
                "goals": "Be left alone.",
                "fears": "Shipwrecks.",
                "notable_quotes": "Go away. | The light stays dark."
            },
            "edit_notes": "Give him a cat"
        }),
        (Agent::Moderator, Task::Moderate) => json!({
            "scenario": scenario(),
            "conversation_history": transcript,
            "turn_number": 1
        }),
        (Agent::CharacterInSimulation, Task::Respond) => json!({
            "character": scenario()["characters"][0],
            "scenario_title": "The Lighthouse Keeper",
            "scenario_description": "Convince a reclusive keeper to relight the lamp.",
            "conversation_history": transcript,
            "user_message": "Please, ships are coming."
        }),
        (Agent::ScenarioFeedback, Task::Review) => json!({
            "scenario": scenario(),
            "conversation_history": transcript
        }),
        other => panic!("no sample for {other:?}"),
    }
}

fn marked_scenario() -> Value {
    json!({
        "title": "title-m01",
        "description": "description-m02",
        "category": "category-m03",
        "difficulty": "Expert",
        "estimated_duration": 4747,
        "objectives": [
            { "id": 9191, "description": "objective-m04", "priority": "optional" },
            { "id": 9292, "description": "objective-m05", "priority": "critical" }
        ],
        "win_conditions": "win-m06",
        "lose_conditions": "lose-m07",
        "max_turns": 2323,
        "scenario_opening_message": "opening-m08",
        "characters": [{
            "name": "name-m09",
            "role": "role-m10",
            "personality": "personality-m11",
            "expertise_keywords": ["keyword-m12", "keyword-m13"],
            "avatar_color": "bg-m14-500"
        }],
        "tags": ["tag-m15", "tag-m16"]
    })
}

// Every string and number is unique, so each one must show up verbatim.
fn marked_inputs(agent: Agent, task: Task) -> Value {
    let transcript = json!([
        { "speaker": "user", "message": "message-m20" },
        { "speaker": "name-m09", "message": "message-m21" }
    ]);
    match (agent, task) {
        (Agent::ScenarioHelper, Task::Create) => json!({ "user_request": "request-m30" }),
        (Agent::ScenarioHelper, Task::Edit) => json!({
            "current_scenario": marked_scenario(),
            "edit_request": "edit-m31"
        }),
        (Agent::CharacterHelper, Task::Create) => json!({
            "role_notes": "role-m40",
            "personality_notes": "personality-m41",
            "background_notes": "background-m42",
            "expertise_notes": "expertise-m43",
            "goal_notes": "goal-m44",
            "other_notes": "other-m45"
        }),
        (Agent::CharacterHelper, Task::Edit) => json!({
            "current_character": {
                "name": "name-m50",
                "role": "role-m51",
                "appearance": "appearance-m52",
                "personality": "personality-m53",
                "expertise_keywords": ["keyword-m54", "keyword-m55", "keyword-m56"],
                "background": "background-m57",
                "goals": "goals-m58",
                "fears": "fears-m59",
                "notable_quotes": "quote-m60"
            },
            "edit_notes": "edit-m61"
        }),
        (Agent::Moderator, Task::Moderate) => json!({
            "scenario": marked_scenario(),
            "conversation_history": transcript,
            "turn_number": 6161
        }),
        (Agent::CharacterInSimulation, Task::Respond) => json!({
            "character": marked_scenario()["characters"][0],
            "scenario_title": "title-m70",
            "scenario_description": "description-m71",
            "conversation_history": transcript,
            "user_message": "message-m72"
        }),
        (Agent::ScenarioFeedback, Task::Review) => json!({
            "scenario": marked_scenario(),
            "conversation_history": transcript,
            "outcome": "outcome-m80"
        }),
        other => panic!("no sample for {other:?}"),
    }
}

fn leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(text) => out.push(text.clone()),
        Value::Number(number) => out.push(number.to_string()),
        Value::Array(items) => items.iter().for_each(|item| leaves(item, out)),
        Value::Object(map) => map.values().for_each(|item| leaves(item, out)),
        Value::Bool(_) | Value::Null => {}
    }
}

#[test]
fn grumpy_pirate_request_renders_both_prompts() {
    let store = TemplateStore::builtin().expect("builtin templates");
    let factory = ScenarioHelperFactory::new(&store);
    let pair = factory
        .build_create(&ScenarioCreationRequest {
            user_request: "a grumpy pirate scenario".to_owned(),
        })
        .expect("renders");

    assert!(!pair.system().trim().is_empty());
    assert!(!pair.user().trim().is_empty());
    assert!(pair.user().contains("a grumpy pirate scenario"));
}

#[test]
fn every_catalog_pair_renders_deterministically() {
    let store = TemplateStore::builtin().unwrap();
    let factory = PromptFactory::new(&store);

    for spec in prompt_factory::CATALOG {
        let first = factory
            .build(spec.agent, spec.task, sample_inputs(spec.agent, spec.task))
            .unwrap_or_else(|err| panic!("{}/{}: {err}", spec.agent, spec.task));
        let second = factory
            .build(spec.agent, spec.task, sample_inputs(spec.agent, spec.task))
            .unwrap();

        assert_eq!(first, second, "{}/{} not deterministic", spec.agent, spec.task);
        assert!(first.system().ends_with('\n') && !first.system().ends_with("\n\n"));
        assert!(first.user().ends_with('\n') && !first.user().ends_with("\n\n"));
    }
}

#[test]
fn every_input_field_reaches_the_prompt() {
    let store = TemplateStore::builtin().unwrap();
    let factory = PromptFactory::new(&store);

    for spec in prompt_factory::CATALOG {
        let inputs = marked_inputs(spec.agent, spec.task);
        let mut expected = Vec::new();
        leaves(&inputs, &mut expected);

        let pair = factory
            .build(spec.agent, spec.task, inputs)
            .unwrap_or_else(|err| panic!("{}/{}: {err}", spec.agent, spec.task));
        let text = format!("{}{}", pair.system(), pair.user());
        for marker in expected {
            assert!(
                text.contains(&marker),
                "{}/{} dropped {marker}",
                spec.agent,
                spec.task
            );
        }
    }
}

#[test]
fn directory_templates_override_builtins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agents/scenario_helper");
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("user_create.tera"), "PIRATE MODE: {{ user_request }}").unwrap();

    let store = TemplateStore::from_dir(dir.path()).expect("loads");
    let pair = PromptFactory::new(&store)
        .build(Agent::ScenarioHelper, Task::Create, json!({ "user_request": "arr" }))
        .unwrap();
    assert_eq!(pair.user(), "PIRATE MODE: arr\n");
}

#[test]
fn placeholder_without_field_is_a_template_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agents/scenario_helper");
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("user_create.tera"), "{{ user_request }} in {{ setting }}").unwrap();

    let store = TemplateStore::from_dir(dir.path()).unwrap();
    let err = PromptFactory::new(&store)
        .build(Agent::ScenarioHelper, Task::Create, json!({ "user_request": "arr" }))
        .expect_err("setting is not a request field");

    assert!(matches!(err, FactoryError::TemplateMismatch(TemplateError::Render { .. })));
    assert!(err.to_string().contains("setting"));
}

#[test]
fn invalid_inputs_list_every_violation() {
    let store = TemplateStore::builtin().unwrap();
    let mut inputs = sample_inputs(Agent::Moderator, Task::Moderate);
    inputs["turn_number"] = json!(0);
    inputs["scenario"]
        .as_object_mut()
        .unwrap()
        .remove("title");

    let err = PromptFactory::new(&store)
        .build(Agent::Moderator, Task::Moderate, inputs)
        .expect_err("two violations");
    let FactoryError::InvalidRequest(inner) = err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(inner.violations().len(), 2);
}
