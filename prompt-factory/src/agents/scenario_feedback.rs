use prompt_schemas::{Agent, ResponseSchema, ScenarioFeedbackRequest, Task};

use super::{render_pair, schema_text};
use crate::catalog;
use crate::error::FactoryResult;
use crate::pair::PromptPair;
use crate::template::TemplateStore;

/// Builds prompts that review a finished session.
///
/// Everything goes into the system prompt; the user prompt is the fixed
/// [`FIXED_USER_PROMPT`](crate::FIXED_USER_PROMPT).
#[derive(Debug)]
pub struct ScenarioFeedbackFactory<'a> {
    store: &'a TemplateStore,
    output_schema: String,
}

impl<'a> ScenarioFeedbackFactory<'a> {
    /// Creates a factory backed by `store`.
    #[must_use]
    pub fn new(store: &'a TemplateStore) -> Self {
        Self {
            store,
            output_schema: schema_text(ResponseSchema::ScenarioFeedback),
        }
    }

    pub(crate) fn output_schema_text(&self) -> &str {
        &self.output_schema
    }

    /// Builds the feedback prompt pair.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::InvalidRequest`](crate::FactoryError::InvalidRequest)
    /// for an invalid scenario and
    /// [`FactoryError::TemplateMismatch`](crate::FactoryError::TemplateMismatch)
    /// if rendering fails.
    pub fn build(&self, request: &ScenarioFeedbackRequest) -> FactoryResult<PromptPair> {
        let spec = catalog::lookup(Agent::ScenarioFeedback, Task::Review)?;
        render_pair(self.store, spec, &self.output_schema, request)
    }
}
