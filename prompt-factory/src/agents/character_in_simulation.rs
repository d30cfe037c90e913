use prompt_schemas::{Agent, CharacterInSimulationInput, ResponseSchema, Task};

use super::{render_pair, schema_text};
use crate::catalog;
use crate::error::FactoryResult;
use crate::pair::PromptPair;
use crate::template::TemplateStore;

/// Builds prompts that voice one scenario character during play.
#[derive(Debug)]
pub struct CharacterInSimulationFactory<'a> {
    store: &'a TemplateStore,
    output_schema: String,
}

impl<'a> CharacterInSimulationFactory<'a> {
    /// Creates a factory backed by `store`.
    #[must_use]
    pub fn new(store: &'a TemplateStore) -> Self {
        Self {
            store,
            output_schema: schema_text(ResponseSchema::CharacterInSimulationOutput),
        }
    }

    pub(crate) fn output_schema_text(&self) -> &str {
        &self.output_schema
    }

    /// Builds the in-character reply prompt pair.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::InvalidRequest`](crate::FactoryError::InvalidRequest)
    /// for an empty player message and
    /// [`FactoryError::TemplateMismatch`](crate::FactoryError::TemplateMismatch)
    /// if rendering fails.
    pub fn build(&self, input: &CharacterInSimulationInput) -> FactoryResult<PromptPair> {
        let spec = catalog::lookup(Agent::CharacterInSimulation, Task::Respond)?;
        render_pair(self.store, spec, &self.output_schema, input)
    }
}
