//! Name-addressed prompt building over the whole catalog.

use prompt_schemas::{
    Agent, CharacterCreationRequest, CharacterEditRequest, CharacterInSimulationInput,
    ResponseSchema, ScenarioCreationRequest, ScenarioEditRequest, ScenarioFeedbackRequest,
    ScenarioModeratorInput, Schema, Task,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::agents::{
    CharacterHelperFactory, CharacterInSimulationFactory, ModeratorFactory,
    ScenarioFeedbackFactory, ScenarioHelperFactory, render_validated,
};
use crate::catalog::{self, PromptSpec};
use crate::error::{FactoryError, FactoryResult};
use crate::pair::PromptPair;
use crate::template::TemplateStore;

/// Dispatches raw JSON inputs to the right per-agent factory.
///
/// This is the entry point for callers that only know the agent and task
/// by name, such as the evaluation harness.
///
/// # Examples
///
/// ```
/// use prompt_factory::{PromptFactory, TemplateStore};
/// use prompt_schemas::{Agent, Task};
/// use serde_json::json;
///
/// let store = TemplateStore::builtin().unwrap();
/// let factory = PromptFactory::new(&store);
/// let pair = factory
///     .build(Agent::ScenarioHelper, Task::Create, json!({ "user_request": "a heist" }))
///     .unwrap();
/// assert!(pair.user().contains("a heist"));
/// ```
#[derive(Debug)]
pub struct PromptFactory<'a> {
    store: &'a TemplateStore,
    scenario_helper: ScenarioHelperFactory<'a>,
    character_helper: CharacterHelperFactory<'a>,
    moderator: ModeratorFactory<'a>,
    character_in_simulation: CharacterInSimulationFactory<'a>,
    scenario_feedback: ScenarioFeedbackFactory<'a>,
}

impl<'a> PromptFactory<'a> {
    /// Creates the per-agent factories over `store`.
    #[must_use]
    pub fn new(store: &'a TemplateStore) -> Self {
        Self {
            store,
            scenario_helper: ScenarioHelperFactory::new(store),
            character_helper: CharacterHelperFactory::new(store),
            moderator: ModeratorFactory::new(store),
            character_in_simulation: CharacterInSimulationFactory::new(store),
            scenario_feedback: ScenarioFeedbackFactory::new(store),
        }
    }

    /// Validates `inputs` against the request schema of `(agent, task)` and
    /// builds the prompt pair.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnsupportedOperation`] for pairs missing from
    /// the catalog, [`FactoryError::InvalidRequest`] listing every violated
    /// field, and [`FactoryError::TemplateMismatch`] if rendering fails.
    pub fn build(&self, agent: Agent, task: Task, inputs: Value) -> FactoryResult<PromptPair> {
        let spec = catalog::lookup(agent, task)?;
        debug!(%agent, %task, request = spec.request_schema, "building prompt");

        match (agent, task) {
            (Agent::ScenarioHelper, Task::Create) => self.render(
                spec,
                self.scenario_helper.output_schema_text(),
                &ScenarioCreationRequest::from_value(inputs)?,
            ),
            (Agent::ScenarioHelper, Task::Edit) => self.render(
                spec,
                self.scenario_helper.output_schema_text(),
                &ScenarioEditRequest::from_value(inputs)?,
            ),
            (Agent::CharacterHelper, Task::Create) => self.render(
                spec,
                self.character_helper.output_schema_text(),
                &CharacterCreationRequest::from_value(inputs)?,
            ),
            (Agent::CharacterHelper, Task::Edit) => self.render(
                spec,
                self.character_helper.output_schema_text(),
                &CharacterEditRequest::from_value(inputs)?,
            ),
            (Agent::Moderator, Task::Moderate) => self.render(
                spec,
                self.moderator.output_schema_text(),
                &ScenarioModeratorInput::from_value(inputs)?,
            ),
            (Agent::CharacterInSimulation, Task::Respond) => self.render(
                spec,
                self.character_in_simulation.output_schema_text(),
                &CharacterInSimulationInput::from_value(inputs)?,
            ),
            (Agent::ScenarioFeedback, Task::Review) => self.render(
                spec,
                self.scenario_feedback.output_schema_text(),
                &ScenarioFeedbackRequest::from_value(inputs)?,
            ),
            _ => Err(FactoryError::unsupported(agent, task)),
        }
    }

    // `from_value` has already checked the raw inputs.
    fn render<R: Serialize>(
        &self,
        spec: &PromptSpec,
        output_schema: &str,
        request: &R,
    ) -> FactoryResult<PromptPair> {
        render_validated(self.store, spec, output_schema, request)
    }

    /// Like [`Self::build`], with the agent and task given by name.
    ///
    /// Task names may carry the `build_prompt_` prefix.
    ///
    /// # Errors
    ///
    /// Unknown names are reported as [`FactoryError::UnsupportedOperation`];
    /// otherwise the errors of [`Self::build`].
    pub fn build_named(&self, agent: &str, task: &str, inputs: Value) -> FactoryResult<PromptPair> {
        let (Ok(parsed_agent), Ok(parsed_task)) = (agent.parse::<Agent>(), task.parse::<Task>())
        else {
            return Err(FactoryError::unsupported(agent, task));
        };
        self.build(parsed_agent, parsed_task, inputs)
    }

    /// Returns the response schema a model must satisfy for `(agent, task)`.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::UnsupportedOperation`] for unknown pairs.
    pub fn output_schema(agent: Agent, task: Task) -> FactoryResult<ResponseSchema> {
        catalog::lookup(agent, task).map(|spec| spec.output_schema)
    }

    /// Returns the scenario helper factory.
    #[must_use]
    pub const fn scenario_helper(&self) -> &ScenarioHelperFactory<'a> {
        &self.scenario_helper
    }

    /// Returns the character helper factory.
    #[must_use]
    pub const fn character_helper(&self) -> &CharacterHelperFactory<'a> {
        &self.character_helper
    }

    /// Returns the moderator factory.
    #[must_use]
    pub const fn moderator(&self) -> &ModeratorFactory<'a> {
        &self.moderator
    }

    /// Returns the in-character reply factory.
    #[must_use]
    pub const fn character_in_simulation(&self) -> &CharacterInSimulationFactory<'a> {
        &self.character_in_simulation
    }

    /// Returns the feedback factory.
    #[must_use]
    pub const fn scenario_feedback(&self) -> &ScenarioFeedbackFactory<'a> {
        &self.scenario_feedback
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn dispatches_by_name_with_prefixed_task() {
        let store = TemplateStore::builtin().unwrap();
        let factory = PromptFactory::new(&store);
        let pair = factory
            .build_named(
                "scenario_helper",
                "build_prompt_create",
                json!({ "user_request": "a grumpy pirate scenario" }),
            )
            .expect("renders");
        assert!(pair.user().contains("a grumpy pirate scenario"));
    }

    #[test]
    fn unknown_names_are_unsupported() {
        let store = TemplateStore::builtin().unwrap();
        let factory = PromptFactory::new(&store);
        let err = factory
            .build_named("bartender", "create", json!({}))
            .expect_err("no such agent");
        assert!(matches!(
            err,
            FactoryError::UnsupportedOperation { ref agent, .. } if agent == "bartender"
        ));
    }

    #[test]
    fn catalog_gaps_are_unsupported() {
        let store = TemplateStore::builtin().unwrap();
        let factory = PromptFactory::new(&store);
        let err = factory
            .build(Agent::CharacterInSimulation, Task::Edit, json!({}))
            .expect_err("no edit task");
        assert!(matches!(err, FactoryError::UnsupportedOperation { .. }));
    }

    #[test]
    fn missing_field_reports_violation_and_renders_nothing() {
        let store = TemplateStore::builtin().unwrap();
        let factory = PromptFactory::new(&store);
        let err = factory
            .build(Agent::ScenarioHelper, Task::Create, json!({}))
            .expect_err("user_request missing");
        let FactoryError::InvalidRequest(inner) = err else {
            panic!("expected invalid request, got {err}");
        };
        assert_eq!(inner.violations().len(), 1);
        assert!(inner.violations()[0].message().contains("user_request"));
    }

    #[test]
    fn unknown_input_fields_are_rejected() {
        let store = TemplateStore::builtin().unwrap();
        let factory = PromptFactory::new(&store);
        let err = factory
            .build(
                Agent::ScenarioHelper,
                Task::Create,
                json!({ "user_request": "x", "tone": "dark" }),
            )
            .expect_err("extra field");
        assert!(matches!(err, FactoryError::InvalidRequest(_)));
    }

    #[test]
    fn dispatch_renders_the_same_pair_as_the_typed_factory() {
        let store = TemplateStore::builtin().unwrap();
        let factory = PromptFactory::new(&store);
        let inputs = json!({ "user_request": "a lighthouse keeper" });

        let dispatched = factory
            .build(Agent::CharacterHelper, Task::Create, inputs.clone())
            .unwrap();
        let typed = factory
            .character_helper()
            .build_create(&CharacterCreationRequest::from_value(inputs).unwrap())
            .unwrap();
        assert_eq!(dispatched, typed);
    }

    #[test]
    fn output_schema_follows_catalog() {
        assert_eq!(
            PromptFactory::output_schema(Agent::Moderator, Task::Moderate).unwrap(),
            ResponseSchema::ModeratorOutput
        );
        assert_eq!(
            PromptFactory::output_schema(Agent::CharacterHelper, Task::Edit).unwrap(),
            ResponseSchema::ChainOfThoughtCharacter
        );
    }
}
