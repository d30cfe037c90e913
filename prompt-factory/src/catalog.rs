//! The explicit table of supported (agent, task) pairs.

use prompt_schemas::{
    Agent, CharacterCreationRequest, CharacterEditRequest, CharacterInSimulationInput,
    ResponseSchema, ScenarioCreationRequest, ScenarioEditRequest, ScenarioFeedbackRequest,
    ScenarioModeratorInput, Schema, Task,
};

use crate::error::{FactoryError, FactoryResult};

/// User message sent when a task puts everything in the system prompt.
pub const FIXED_USER_PROMPT: &str = "Produce ONLY the JSON now.";

/// Everything the factory needs to know about one (agent, task) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PromptSpec {
    /// The agent.
    pub agent: Agent,
    /// The task.
    pub task: Task,
    /// Template rendered into the system prompt.
    pub system_template: &'static str,
    /// Template rendered into the user prompt; `None` sends
    /// [`FIXED_USER_PROMPT`].
    pub user_template: Option<&'static str>,
    /// Whether the system template also receives the request fields.
    pub system_sees_request: bool,
    /// Name of the request schema the inputs must satisfy.
    pub request_schema: &'static str,
    /// Shape the model is asked to return.
    pub output_schema: ResponseSchema,
}

/// Every supported pair.
pub const CATALOG: &[PromptSpec] = &[
    PromptSpec {
        agent: Agent::ScenarioHelper,
        task: Task::Create,
        system_template: "agents/scenario_helper/system_create.tera",
        user_template: Some("agents/scenario_helper/user_create.tera"),
        system_sees_request: false,
        request_schema: ScenarioCreationRequest::NAME,
        output_schema: ResponseSchema::ChainOfThoughtScenario,
    },
    PromptSpec {
        agent: Agent::ScenarioHelper,
        task: Task::Edit,
        system_template: "agents/scenario_helper/system_edit.tera",
        user_template: Some("agents/scenario_helper/user_edit.tera"),
        system_sees_request: false,
        request_schema: ScenarioEditRequest::NAME,
        output_schema: ResponseSchema::ChainOfThoughtScenario,
    },
    PromptSpec {
        agent: Agent::CharacterHelper,
        task: Task::Create,
        system_template: "agents/character_helper/system_create.tera",
        user_template: Some("agents/character_helper/user_create.tera"),
        system_sees_request: false,
        request_schema: CharacterCreationRequest::NAME,
        output_schema: ResponseSchema::ChainOfThoughtCharacter,
    },
    PromptSpec {
        agent: Agent::CharacterHelper,
        task: Task::Edit,
        system_template: "agents/character_helper/system_edit.tera",
        user_template: Some("agents/character_helper/user_edit.tera"),
        system_sees_request: false,
        request_schema: CharacterEditRequest::NAME,
        output_schema: ResponseSchema::ChainOfThoughtCharacter,
    },
    PromptSpec {
        agent: Agent::Moderator,
        task: Task::Moderate,
        system_template: "agents/moderator/system.tera",
        user_template: Some("agents/moderator/user.tera"),
        system_sees_request: true,
        request_schema: ScenarioModeratorInput::NAME,
        output_schema: ResponseSchema::ModeratorOutput,
    },
    PromptSpec {
        agent: Agent::CharacterInSimulation,
        task: Task::Respond,
        system_template: "agents/character_in_simulation/system.tera",
        user_template: Some("agents/character_in_simulation/user.tera"),
        system_sees_request: false,
        request_schema: CharacterInSimulationInput::NAME,
        output_schema: ResponseSchema::CharacterInSimulationOutput,
    },
    PromptSpec {
        agent: Agent::ScenarioFeedback,
        task: Task::Review,
        system_template: "agents/scenario_feedback/system.tera",
        user_template: None,
        system_sees_request: true,
        request_schema: ScenarioFeedbackRequest::NAME,
        output_schema: ResponseSchema::ScenarioFeedback,
    },
];

/// Looks up the catalog entry for an (agent, task) pair.
///
/// # Errors
///
/// Returns [`FactoryError::UnsupportedOperation`] if the agent does not
/// offer the task.
pub fn lookup(agent: Agent, task: Task) -> FactoryResult<&'static PromptSpec> {
    CATALOG
        .iter()
        .find(|spec| spec.agent == agent && spec.task == task)
        .ok_or_else(|| FactoryError::unsupported(agent, task))
}

/// Returns the tasks an agent offers, in catalog order.
pub fn tasks_for(agent: Agent) -> impl Iterator<Item = Task> {
    CATALOG
        .iter()
        .filter(move |spec| spec.agent == agent)
        .map(|spec| spec.task)
}

/// Returns every template name the catalog references.
pub fn template_names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().flat_map(|spec| {
        std::iter::once(spec.system_template).chain(spec.user_template)
    })
}
