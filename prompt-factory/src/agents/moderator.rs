use prompt_schemas::{Agent, ResponseSchema, ScenarioModeratorInput, Task};

use super::{render_pair, schema_text};
use crate::catalog;
use crate::error::FactoryResult;
use crate::pair::PromptPair;
use crate::template::TemplateStore;

/// Builds prompts that judge objective progress after each turn.
///
/// The scenario and its objectives go into the system prompt; the
/// transcript and turn number go into the user prompt.
#[derive(Debug)]
pub struct ModeratorFactory<'a> {
    store: &'a TemplateStore,
    output_schema: String,
}

impl<'a> ModeratorFactory<'a> {
    /// Creates a factory backed by `store`.
    #[must_use]
    pub fn new(store: &'a TemplateStore) -> Self {
        Self {
            store,
            output_schema: schema_text(ResponseSchema::ModeratorOutput),
        }
    }

    pub(crate) fn output_schema_text(&self) -> &str {
        &self.output_schema
    }

    /// Builds the moderation prompt pair.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::InvalidRequest`](crate::FactoryError::InvalidRequest)
    /// for a zero turn number or an invalid scenario, and
    /// [`FactoryError::TemplateMismatch`](crate::FactoryError::TemplateMismatch)
    /// if rendering fails.
    pub fn build(&self, input: &ScenarioModeratorInput) -> FactoryResult<PromptPair> {
        let spec = catalog::lookup(Agent::Moderator, Task::Moderate)?;
        render_pair(self.store, spec, &self.output_schema, input)
    }
}
