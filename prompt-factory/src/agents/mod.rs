//! One factory per agent.
//!
//! Each factory borrows a [`TemplateStore`] and caches the pretty-printed
//! JSON Schema of its output type, so building a prompt is a pure render.

mod character_helper;
mod character_in_simulation;
mod moderator;
mod scenario_feedback;
mod scenario_helper;

#[cfg(test)]
mod fixtures;

pub use character_helper::CharacterHelperFactory;
pub use character_in_simulation::CharacterInSimulationFactory;
pub use moderator::ModeratorFactory;
pub use scenario_feedback::ScenarioFeedbackFactory;
pub use scenario_helper::ScenarioHelperFactory;

use prompt_schemas::{ResponseSchema, Schema, validate_value};
use serde::Serialize;
use tera::Context;
use tracing::debug;

use crate::catalog::{FIXED_USER_PROMPT, PromptSpec};
use crate::error::{FactoryError, FactoryResult};
use crate::pair::{self, PromptPair};
use crate::template::TemplateStore;

fn schema_text(schema: ResponseSchema) -> String {
    format!("{:#}", schema.json_schema())
}

fn system_only(
    store: &TemplateStore,
    spec: &PromptSpec,
    output_schema: &str,
) -> FactoryResult<String> {
    let mut context = Context::new();
    context.insert("output_schema", output_schema);
    let system = store.render(spec.system_template, &context)?;
    Ok(pair::normalize(&system))
}

fn render_pair<R: Schema>(
    store: &TemplateStore,
    spec: &PromptSpec,
    output_schema: &str,
    request: &R,
) -> FactoryResult<PromptPair> {
    validate_value::<R>(&request.to_value())?;
    render_validated(store, spec, output_schema, request)
}

/// Renders a pair for a request already checked against its schema.
pub(crate) fn render_validated<R: Serialize>(
    store: &TemplateStore,
    spec: &PromptSpec,
    output_schema: &str,
    request: &R,
) -> FactoryResult<PromptPair> {
    let request_context = Context::from_serialize(request).map_err(|err| FactoryError::Context {
        reason: err.to_string(),
    })?;

    let mut system_context = if spec.system_sees_request {
        request_context.clone()
    } else {
        Context::new()
    };
    system_context.insert("output_schema", output_schema);

    let system = store.render(spec.system_template, &system_context)?;
    let user = match spec.user_template {
        Some(name) => store.render(name, &request_context)?,
        None => FIXED_USER_PROMPT.to_owned(),
    };

    debug!(
        agent = %spec.agent,
        task = %spec.task,
        system_len = system.len(),
        user_len = user.len(),
        "rendered prompt pair"
    );
    Ok(PromptPair::new(system, user))
}
