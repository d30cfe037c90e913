//! Strongly typed configuration schemas.

use std::collections::BTreeMap;
use std::fmt;

use prompt_schemas::{Agent, Task};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Model key used for `ai_critique` assertions when `critique_model` is unset.
pub const DEFAULT_CRITIQUE_MODEL: &str = "gemini_pro_creative";

/// Model API families the harness can call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google Gemini.
    Google,
    /// `OpenAI`.
    OpenAi,
    /// Mistral (OpenAI-compatible).
    Mistral,
    /// Cerebras (OpenAI-compatible).
    Cerebras,
}

impl Provider {
    /// Returns the lowercase provider label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::OpenAi => "openai",
            Self::Mistral => "mistral",
            Self::Cerebras => "cerebras",
        }
    }

    /// Returns the API base URL used when a model sets no `base_url`.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Google => "https://generativelanguage.googleapis.com/",
            Self::OpenAi => "https://api.openai.com/v1/",
            Self::Mistral => "https://api.mistral.ai/v1/",
            Self::Cerebras => "https://api.cerebras.ai/v1/",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling parameters passed through to the provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Output token budget.
    #[serde(default, alias = "max_tokens")]
    pub max_output_tokens: Option<u32>,
    /// Nucleus sampling.
    #[serde(default)]
    pub top_p: Option<f32>,
    /// Ask the provider for a JSON object reply.
    #[serde(default)]
    pub json_mode: bool,
}

/// One entry of `models.yaml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// API family.
    pub provider: Provider,
    /// Provider-side model identifier.
    pub model_name: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Base URL override for OpenAI-compatible providers.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Sampling parameters.
    #[serde(default)]
    pub generation_config: GenerationConfig,
}

impl ModelConfig {
    /// Returns the configured base URL or the provider default.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    /// Reads the API key through `lookup`, which maps an environment
    /// variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if the variable is unset or
    /// blank.
    pub fn resolve_api_key_with<F>(&self, key: &str, lookup: F) -> ConfigResult<String>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        lookup(&self.api_key_env)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                model: key.to_owned(),
                env: self.api_key_env.clone(),
            })
    }
}

/// The `models.yaml` document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Models keyed by the friendly name test cases refer to.
    #[serde(default)]
    pub models: BTreeMap<String, ModelConfig>,
    /// Model key used for `ai_critique` assertions.
    #[serde(default)]
    pub critique_model: Option<String>,
}

impl ModelsConfig {
    /// Looks up a model by key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownModel`] if the key is not defined.
    pub fn model(&self, key: &str) -> ConfigResult<&ModelConfig> {
        self.models.get(key).ok_or_else(|| ConfigError::UnknownModel {
            key: key.to_owned(),
        })
    }

    /// Returns the key of the model used for AI critiques.
    #[must_use]
    pub fn critique_model(&self) -> &str {
        self.critique_model
            .as_deref()
            .unwrap_or(DEFAULT_CRITIQUE_MODEL)
    }

    /// Checks that every model has a name and a key variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending model.
    pub fn validate(&self) -> ConfigResult<()> {
        for (key, model) in &self.models {
            if model.model_name.trim().is_empty() {
                return Err(ConfigError::invalid(format!("model `{key}` has no model_name")));
            }
            if model.api_key_env.trim().is_empty() {
                return Err(ConfigError::invalid(format!("model `{key}` has no api_key_env")));
            }
        }
        Ok(())
    }
}

/// One entry of `agents.yaml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Human-readable purpose.
    #[serde(default)]
    pub description: Option<String>,
    /// Model key used when a test case names none.
    pub default_model: String,
    /// Tasks the agent is evaluated on.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// The `agents.yaml` document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Agents keyed by their snake_case name.
    #[serde(default)]
    pub agents: BTreeMap<String, AgentConfig>,
}

impl AgentsConfig {
    /// Looks up an agent's configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAgent`] if the agent has no entry.
    pub fn agent(&self, agent: Agent) -> ConfigResult<&AgentConfig> {
        self.agents
            .get(agent.as_str())
            .ok_or_else(|| ConfigError::UnknownAgent {
                name: agent.as_str().to_owned(),
            })
    }

    /// Picks the model for a run: `requested` when given, otherwise the
    /// agent's default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAgent`] when no model was requested and
    /// the agent has no entry.
    pub fn model_for<'a>(&'a self, agent: Agent, requested: Option<&'a str>) -> ConfigResult<&'a str> {
        match requested {
            Some(model) => Ok(model),
            None => self.agent(agent).map(|config| config.default_model.as_str()),
        }
    }

    /// Checks agent names and that every default model exists in `models`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAgent`] for names that are not agents
    /// and [`ConfigError::UnknownModel`] for dangling model keys.
    pub fn validate(&self, models: &ModelsConfig) -> ConfigResult<()> {
        for (name, config) in &self.agents {
            if name.parse::<Agent>().is_err() {
                return Err(ConfigError::UnknownAgent { name: name.clone() });
            }
            models.model(&config.default_model)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(provider: Provider) -> ModelConfig {
        ModelConfig {
            provider,
            model_name: "m".to_owned(),
            api_key_env: "TEST_KEY".to_owned(),
            base_url: None,
            generation_config: GenerationConfig::default(),
        }
    }

    #[test]
    fn base_url_falls_back_to_provider_default() {
        assert_eq!(model(Provider::Mistral).base_url(), "https://api.mistral.ai/v1/");
        let mut custom = model(Provider::OpenAi);
        custom.base_url = Some("http://localhost:8080/v1".to_owned());
        assert_eq!(custom.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn api_key_lookup_rejects_blank_values() {
        let cfg = model(Provider::Google);
        let key = cfg
            .resolve_api_key_with("gem", |name| (name == "TEST_KEY").then(|| "abc".to_owned()))
            .unwrap();
        assert_eq!(key, "abc");

        let err = cfg
            .resolve_api_key_with("gem", |_| Some("  ".to_owned()))
            .expect_err("blank key");
        assert!(matches!(err, ConfigError::MissingApiKey { ref env, .. } if env == "TEST_KEY"));
    }

    #[test]
    fn critique_model_has_default() {
        let models = ModelsConfig::default();
        assert_eq!(models.critique_model(), DEFAULT_CRITIQUE_MODEL);
    }

    #[test]
    fn requested_model_wins_over_default() {
        let mut agents = AgentsConfig::default();
        agents.agents.insert(
            "moderator".to_owned(),
            AgentConfig {
                description: None,
                default_model: "fast".to_owned(),
                tasks: vec![Task::Moderate],
            },
        );

        assert_eq!(agents.model_for(Agent::Moderator, None).unwrap(), "fast");
        assert_eq!(agents.model_for(Agent::Moderator, Some("slow")).unwrap(), "slow");
        let err = agents
            .model_for(Agent::ScenarioHelper, None)
            .expect_err("no entry");
        assert!(matches!(err, ConfigError::UnknownAgent { .. }));
    }

    #[test]
    fn validation_catches_dangling_default_model() {
        let mut agents = AgentsConfig::default();
        agents.agents.insert(
            "moderator".to_owned(),
            AgentConfig {
                description: None,
                default_model: "missing".to_owned(),
                tasks: Vec::new(),
            },
        );
        let err = agents
            .validate(&ModelsConfig::default())
            .expect_err("model not defined");
        assert!(matches!(err, ConfigError::UnknownModel { .. }));
    }
}
