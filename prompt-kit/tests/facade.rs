use prompt_kit::prelude::*;
use prompt_kit::schemas::ChainOfThoughtScenarioSchema;
use serde_json::json;

#[test]
fn builds_prompt_and_checks_reply_through_facade() {
    let store = TemplateStore::builtin().expect("builtin templates");
    let factory = PromptFactory::new(&store);
    let pair = factory
        .build(
            Agent::ScenarioHelper,
            Task::Create,
            json!({ "user_request": "a grumpy pirate scenario" }),
        )
        .expect("prompt");
    assert!(pair.user().contains("a grumpy pirate scenario"));

    let schema = PromptFactory::output_schema(Agent::ScenarioHelper, Task::Create).unwrap();
    assert_eq!(schema.name(), ChainOfThoughtScenarioSchema::NAME);
}
