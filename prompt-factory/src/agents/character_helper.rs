use prompt_schemas::{Agent, CharacterCreationRequest, CharacterEditRequest, ResponseSchema, Task};

use super::{render_pair, schema_text, system_only};
use crate::catalog;
use crate::error::FactoryResult;
use crate::pair::PromptPair;
use crate::template::TemplateStore;

/// Builds prompts that create or edit a standalone character.
#[derive(Debug)]
pub struct CharacterHelperFactory<'a> {
    store: &'a TemplateStore,
    output_schema: String,
}

impl<'a> CharacterHelperFactory<'a> {
    /// Creates a factory backed by `store`.
    #[must_use]
    pub fn new(store: &'a TemplateStore) -> Self {
        Self {
            store,
            output_schema: schema_text(ResponseSchema::ChainOfThoughtCharacter),
        }
    }

    pub(crate) fn output_schema_text(&self) -> &str {
        &self.output_schema
    }

    /// Renders the system prompt for character creation.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::TemplateMismatch`](crate::FactoryError::TemplateMismatch)
    /// if the template cannot be rendered.
    pub fn system_prompt_create(&self) -> FactoryResult<String> {
        let spec = catalog::lookup(Agent::CharacterHelper, Task::Create)?;
        system_only(self.store, spec, &self.output_schema)
    }

    /// Builds the prompt pair for a creation request. Notes left out of the
    /// request are left out of the prompt.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::TemplateMismatch`](crate::FactoryError::TemplateMismatch)
    /// if rendering fails.
    pub fn build_create(&self, request: &CharacterCreationRequest) -> FactoryResult<PromptPair> {
        let spec = catalog::lookup(Agent::CharacterHelper, Task::Create)?;
        render_pair(self.store, spec, &self.output_schema, request)
    }

    /// Renders the system prompt for character editing.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::TemplateMismatch`](crate::FactoryError::TemplateMismatch)
    /// if the template cannot be rendered.
    pub fn system_prompt_edit(&self) -> FactoryResult<String> {
        let spec = catalog::lookup(Agent::CharacterHelper, Task::Edit)?;
        system_only(self.store, spec, &self.output_schema)
    }

    /// Builds the prompt pair for an edit request.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::InvalidRequest`](crate::FactoryError::InvalidRequest)
    /// if the current character or the notes are invalid, and
    /// [`FactoryError::TemplateMismatch`](crate::FactoryError::TemplateMismatch)
    /// if rendering fails.
    pub fn build_edit(&self, request: &CharacterEditRequest) -> FactoryResult<PromptPair> {
        let spec = catalog::lookup(Agent::CharacterHelper, Task::Edit)?;
        render_pair(self.store, spec, &self.output_schema, request)
    }
}
