//! Output of the intent router, which decides which agent and factory
//! method handle a free-form user request.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{Agent, Task};
use crate::schema::impl_schema;

/// Agents the router may choose from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RouterAgent {
    /// Route to [`Agent::CharacterHelper`].
    CharacterHelper,
    /// Route to [`Agent::ScenarioHelper`].
    ScenarioHelper,
    /// Route to [`Agent::Moderator`].
    Moderator,
    /// The request fits no agent.
    Unknown,
}

/// Factory methods the router may choose from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FactoryMethod {
    /// Maps to [`Task::Create`].
    BuildPromptCreate,
    /// Maps to [`Task::Edit`].
    BuildPromptEdit,
    /// Maps to [`Task::Moderate`].
    BuildPromptModerate,
    /// Nothing to call.
    NotApplicable,
}

/// The router's decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IntentRouterSchema {
    /// The agent to route to.
    pub agent: RouterAgent,
    /// The factory method to call on that agent.
    pub factory_method: FactoryMethod,
    /// Arguments for the method, shaped like its request schema.
    pub arguments: Map<String, Value>,
}

impl_schema!(
    IntentRouterSchema,
);

impl IntentRouterSchema {
    /// Resolves the decision to a concrete agent and task.
    ///
    /// Returns `None` when the router declined (`unknown` agent or
    /// `not_applicable` method). Whether the pair is actually supported is
    /// decided by the prompt catalog, not here.
    #[must_use]
    pub fn route(&self) -> Option<(Agent, Task)> {
        let agent = match self.agent {
            RouterAgent::CharacterHelper => Agent::CharacterHelper,
            RouterAgent::ScenarioHelper => Agent::ScenarioHelper,
            RouterAgent::Moderator => Agent::Moderator,
            RouterAgent::Unknown => return None,
        };
        let task = match self.factory_method {
            FactoryMethod::BuildPromptCreate => Task::Create,
            FactoryMethod::BuildPromptEdit => Task::Edit,
            FactoryMethod::BuildPromptModerate => Task::Moderate,
            FactoryMethod::NotApplicable => return None,
        };
        Some((agent, task))
    }

    /// Returns the routed arguments as a JSON object value.
    #[must_use]
    pub fn arguments_value(&self) -> Value {
        Value::Object(self.arguments.clone())
    }
}
