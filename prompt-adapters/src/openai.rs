//! Adapter for OpenAI-compatible chat completion APIs.
//!
//! `OpenAI` itself, Mistral and Cerebras all accept the same request shape;
//! only the base URL, the provider label and the key differ.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use futures::stream;
use hyper::Uri;
use hyper::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::http_client::{JsonTransport, sanitize_base_url};
use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, InferenceRequest,
    MessageRole, ModelAdapter, PromptMessage,
};

/// Default base URL of the `OpenAI` API.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";

/// Configuration for the OpenAI-compatible adapter.
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    api_key: Option<String>,
    model: String,
    provider: &'static str,
    base_url: String,
    timeout: Duration,
    default_temperature: Option<f32>,
}

impl OpenAiConfig {
    /// Creates a configuration using the supplied model identifier.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            provider: "openai",
            base_url: OPENAI_BASE_URL.to_owned(),
            timeout: Duration::from_secs(60),
            default_temperature: None,
        }
    }

    /// Sets the provider label reported in metadata and errors.
    #[must_use]
    pub fn with_provider(mut self, provider: &'static str) -> Self {
        self.provider = provider;
        self
    }

    /// Overrides the base URL. The chat endpoint is `<base>chat/completions`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url(self.provider, base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the default sampling temperature used when requests omit it.
    #[must_use]
    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = Some(temperature);
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supplies the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Adapter that calls an OpenAI-compatible `chat/completions` endpoint.
pub struct OpenAiAdapter {
    transport: JsonTransport,
    endpoint: Uri,
    metadata: AdapterMetadata,
    api_key: String,
    default_temperature: Option<f32>,
}

impl fmt::Debug for OpenAiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiAdapter")
            .field("provider", &self.metadata.provider())
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAiAdapter {
    /// Constructs a new adapter with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the API key is missing or
    /// the endpoint is invalid.
    pub fn new(config: OpenAiConfig) -> AdapterResult<Self> {
        let provider = config.provider;
        let api_key = config.api_key.ok_or_else(|| {
            AdapterError::configuration(format!("{provider} adapter requires an API key"))
        })?;

        let metadata = AdapterMetadata::new(provider, config.model);
        let endpoint = format!("{}chat/completions", config.base_url)
            .parse::<Uri>()
            .map_err(|err| {
                AdapterError::configuration(format!("invalid {provider} endpoint: {err}"))
            })?;

        Ok(Self {
            transport: JsonTransport::new(provider, config.timeout)?,
            endpoint,
            metadata,
            api_key,
            default_temperature: config.default_temperature,
        })
    }

    fn build_request(&self, request: &InferenceRequest) -> ChatCompletionRequest {
        let system = request
            .system_prompt()
            .map(|prompt| PromptMessage::new(MessageRole::System, prompt));
        let messages = system
            .iter()
            .chain(request.messages())
            .map(map_prompt_message)
            .collect();

        ChatCompletionRequest {
            model: self.metadata.model().to_owned(),
            messages,
            temperature: request.temperature().or(self.default_temperature),
            max_tokens: request.max_output_tokens(),
            top_p: request.top_p(),
            response_format: request.json_mode().then_some(ResponseFormat {
                kind: "json_object",
            }),
            stream: false,
        }
    }
}

#[async_trait]
impl ModelAdapter for OpenAiAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn infer(&self, request: InferenceRequest) -> AdapterResult<AdapterStream> {
        let payload = self.build_request(&request);
        let headers = [(AUTHORIZATION, format!("Bearer {}", self.api_key))];

        let response: ChatCompletionResponse = self
            .transport
            .post_json(self.endpoint.clone(), &headers, &payload)
            .await?;

        let content = response
            .choices
            .into_iter()
            .find_map(|choice| choice.message.and_then(|message| message.content))
            .ok_or_else(|| {
                AdapterError::response(format!(
                    "{} returned no message content",
                    self.metadata.provider()
                ))
            })?;

        let stream = stream::once(async move { Ok(InferenceChunk::new(content, true)) });
        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn map_prompt_message(message: &PromptMessage) -> OpenAiMessage {
    OpenAiMessage {
        role: message.role().to_string(),
        content: message.content().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> OpenAiAdapter {
        let config = OpenAiConfig::new("mistral-large-latest")
            .with_provider("mistral")
            .with_default_temperature(0.2)
            .with_api_key("test_key");
        OpenAiAdapter::new(config).expect("adapter")
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let err = OpenAiAdapter::new(OpenAiConfig::new("gpt-4o")).expect_err("no key");
        assert!(matches!(err, AdapterError::Configuration { .. }));
        assert!(err.to_string().contains("openai"));
    }

    #[test]
    fn endpoint_appends_chat_completions() {
        let config = OpenAiConfig::new("llama3.1-8b")
            .with_provider("cerebras")
            .with_base_url("https://api.cerebras.ai/v1")
            .unwrap()
            .with_api_key("k");
        let adapter = OpenAiAdapter::new(config).unwrap();
        assert_eq!(
            adapter.endpoint.to_string(),
            "https://api.cerebras.ai/v1/chat/completions"
        );
        assert_eq!(adapter.metadata().provider(), "cerebras");
    }

    #[test]
    fn system_prompt_becomes_first_message() {
        let request = InferenceRequest::chat("system text", "user text");
        let chat = adapter().build_request(&request);

        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, "system");
        assert_eq!(chat.messages[0].content, "system text");
        assert_eq!(chat.messages[1].role, "user");
        assert_eq!(chat.temperature, Some(0.2));
    }

    #[test]
    fn json_mode_sets_response_format() {
        let request = InferenceRequest::chat("s", "u").with_json_mode(true);
        let body = serde_json::to_value(adapter().build_request(&request)).unwrap();
        assert_eq!(body["response_format"]["type"], "json_object");

        let plain = serde_json::to_value(adapter().build_request(&InferenceRequest::chat("s", "u")))
            .unwrap();
        assert!(plain.get("response_format").is_none());
    }
}
