use prompt_schemas::{Agent, ResponseSchema, ScenarioCreationRequest, ScenarioEditRequest, Task};

use super::{render_pair, schema_text, system_only};
use crate::catalog;
use crate::error::FactoryResult;
use crate::pair::PromptPair;
use crate::template::TemplateStore;

/// Builds prompts that create or edit a scenario.
///
/// Both tasks ask for a [`ChainOfThoughtScenarioSchema`] reply.
///
/// [`ChainOfThoughtScenarioSchema`]: prompt_schemas::ChainOfThoughtScenarioSchema
#[derive(Debug)]
pub struct ScenarioHelperFactory<'a> {
    store: &'a TemplateStore,
    output_schema: String,
}

impl<'a> ScenarioHelperFactory<'a> {
    /// Creates a factory backed by `store`.
    #[must_use]
    pub fn new(store: &'a TemplateStore) -> Self {
        Self {
            store,
            output_schema: schema_text(ResponseSchema::ChainOfThoughtScenario),
        }
    }

    pub(crate) fn output_schema_text(&self) -> &str {
        &self.output_schema
    }

    /// Renders the system prompt for scenario creation.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::TemplateMismatch`](crate::FactoryError::TemplateMismatch)
    /// if the template cannot be rendered.
    pub fn system_prompt_create(&self) -> FactoryResult<String> {
        let spec = catalog::lookup(Agent::ScenarioHelper, Task::Create)?;
        system_only(self.store, spec, &self.output_schema)
    }

    /// Builds the prompt pair for a creation request.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::InvalidRequest`](crate::FactoryError::InvalidRequest)
    /// for an empty request and
    /// [`FactoryError::TemplateMismatch`](crate::FactoryError::TemplateMismatch)
    /// if rendering fails.
    pub fn build_create(&self, request: &ScenarioCreationRequest) -> FactoryResult<PromptPair> {
        let spec = catalog::lookup(Agent::ScenarioHelper, Task::Create)?;
        render_pair(self.store, spec, &self.output_schema, request)
    }

    /// Renders the system prompt for scenario editing.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::TemplateMismatch`](crate::FactoryError::TemplateMismatch)
    /// if the template cannot be rendered.
    pub fn system_prompt_edit(&self) -> FactoryResult<String> {
        let spec = catalog::lookup(Agent::ScenarioHelper, Task::Edit)?;
        system_only(self.store, spec, &self.output_schema)
    }

    /// Builds the prompt pair for an edit request. The current scenario is
    /// embedded as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Same as [`Self::build_create`].
    pub fn build_edit(&self, request: &ScenarioEditRequest) -> FactoryResult<PromptPair> {
        let spec = catalog::lookup(Agent::ScenarioHelper, Task::Edit)?;
        render_pair(self.store, spec, &self.output_schema, request)
    }
}
