//! Model clients built from `models.yaml`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use prompt_adapters::{
    GeminiAdapter, GeminiConfig, InferenceRequest, ModelAdapter, OpenAiAdapter, OpenAiConfig,
};
use prompt_config::{GenerationConfig, ModelConfig, ModelsConfig, Provider};
use tracing::debug;

use crate::error::EvalResult;

/// Maps an environment variable name to its value.
pub type KeyLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// A model adapter paired with the sampling parameters configured for it.
#[derive(Clone)]
pub struct ModelClient {
    adapter: Arc<dyn ModelAdapter>,
    generation: GenerationConfig,
}

impl fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClient")
            .field("model", &self.adapter.metadata().to_string())
            .field("generation", &self.generation)
            .finish()
    }
}

impl ModelClient {
    /// Wraps an adapter.
    #[must_use]
    pub fn new(adapter: Arc<dyn ModelAdapter>, generation: GenerationConfig) -> Self {
        Self {
            adapter,
            generation,
        }
    }

    /// Builds the request for a prompt pair, applying the sampling
    /// parameters.
    #[must_use]
    pub fn request(&self, system: &str, user: &str) -> InferenceRequest {
        let mut request =
            InferenceRequest::chat(system, user).with_json_mode(self.generation.json_mode);
        if let Some(temperature) = self.generation.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(tokens) = self.generation.max_output_tokens {
            request = request.with_max_output_tokens(tokens);
        }
        if let Some(top_p) = self.generation.top_p {
            request = request.with_top_p(top_p);
        }
        request
    }

    /// Sends a prompt pair and returns the reply text.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Adapter`](crate::EvalError::Adapter) if the call
    /// fails.
    pub async fn generate(&self, system: &str, user: &str) -> EvalResult<String> {
        let metadata = self.adapter.metadata();
        debug!(model = %metadata, "calling model");
        let reply = self.adapter.complete(self.request(system, user)).await?;
        debug!(model = %metadata, chars = reply.len(), "model replied");
        Ok(reply)
    }
}

/// Source of model clients, keyed by the names used in `models.yaml`.
pub trait ClientFactory: Send + Sync {
    /// Returns a client for `model_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unknown, its API key is missing or
    /// the adapter cannot be constructed.
    fn client(&self, model_key: &str) -> EvalResult<ModelClient>;
}

/// Builds real HTTP adapters from the models configuration.
pub struct ConfiguredClients {
    models: ModelsConfig,
    keys: KeyLookup,
    timeout: Duration,
}

impl fmt::Debug for ConfiguredClients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredClients")
            .field("models", &self.models.models.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ConfiguredClients {
    /// Creates a factory that reads API keys from the process environment.
    #[must_use]
    pub fn new(models: ModelsConfig) -> Self {
        Self {
            models,
            keys: Arc::new(|name: &str| std::env::var(name).ok()),
            timeout: Duration::from_secs(120),
        }
    }

    /// Replaces the API key source.
    #[must_use]
    pub fn with_key_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.keys = Arc::new(lookup);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn adapter(&self, model: &ModelConfig, api_key: String) -> EvalResult<Arc<dyn ModelAdapter>> {
        let adapter: Arc<dyn ModelAdapter> = match model.provider {
            Provider::Google => Arc::new(GeminiAdapter::new(
                GeminiConfig::new(&model.model_name)
                    .with_base_url(model.base_url())?
                    .with_api_key(api_key)
                    .with_timeout(self.timeout),
            )?),
            provider => Arc::new(OpenAiAdapter::new(
                OpenAiConfig::new(&model.model_name)
                    .with_provider(provider.as_str())
                    .with_base_url(model.base_url())?
                    .with_api_key(api_key)
                    .with_timeout(self.timeout),
            )?),
        };
        Ok(adapter)
    }
}

impl ClientFactory for ConfiguredClients {
    fn client(&self, model_key: &str) -> EvalResult<ModelClient> {
        let model = self.models.model(model_key)?;
        let api_key = model.resolve_api_key_with(model_key, |name| (self.keys)(name))?;
        let adapter = self.adapter(model, api_key)?;
        Ok(ModelClient::new(adapter, model.generation_config.clone()))
    }
}
