//! Shared model adapter traits and data structures.

use std::fmt;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by model adapters.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Streaming response emitted by [`ModelAdapter::infer`].
pub type AdapterStream = Pin<Box<dyn Stream<Item = AdapterResult<InferenceChunk>> + Send>>;

/// Error type shared by adapter implementations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Adapter is misconfigured or missing credentials.
    #[error("adapter not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The supplied request was invalid for the target model.
    #[error("invalid inference request: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be processed.
        reason: String,
    },

    /// Transport-level failures (network, protocol, timeouts).
    #[error("adapter transport error: {reason}")]
    Transport {
        /// Additional context about the error.
        reason: String,
    },

    /// The provider rejected the request due to rate limiting.
    #[error("adapter rate limited (retry after {retry_after:?})")]
    RateLimited {
        /// Suggested delay before retrying.
        retry_after: Option<Duration>,
    },

    /// The provider returned an error status or a malformed body.
    #[error("adapter response error: {reason}")]
    Response {
        /// Additional context about the response failure.
        reason: String,
    },
}

impl AdapterError {
    /// Convenience constructor for invalid requests.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for response failures.
    #[must_use]
    pub fn response(reason: impl Into<String>) -> Self {
        Self::Response {
            reason: reason.into(),
        }
    }
}

/// Minimal metadata describing a model adapter instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterMetadata {
    provider: &'static str,
    model: String,
}

impl AdapterMetadata {
    /// Creates metadata for the supplied provider and model identifier.
    #[must_use]
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Returns the provider identifier (e.g., "openai", "mistral").
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Display for AdapterMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Roles supported in chat-style prompts.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System messages steer the assistant behaviour.
    System,
    /// User-authored content.
    User,
    /// Assistant (model) responses.
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        })
    }
}

/// Represents an instruction or message in a chat-style prompt.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PromptMessage {
    role: MessageRole,
    content: String,
}

impl PromptMessage {
    /// Creates a new prompt message.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Returns the message role.
    #[must_use]
    pub const fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the message content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Request submitted to a model adapter.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct InferenceRequest {
    /// Optional system prompt that guides model behavior.
    /// Adapters will transform this to provider-specific formats:
    /// - OpenAI-compatible: prepended as `{"role": "system", "content": "..."}`
    /// - Gemini: transformed to `systemInstruction`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    system_prompt: Option<String>,
    /// Conversation messages.
    messages: Vec<PromptMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(default)]
    json_mode: bool,
}

impl InferenceRequest {
    /// Creates a request with the supplied messages.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidRequest`] if the message list is empty.
    pub fn new(messages: Vec<PromptMessage>) -> AdapterResult<Self> {
        if messages.is_empty() {
            return Err(AdapterError::invalid_request(
                "inference request requires at least one message",
            ));
        }

        Ok(Self {
            system_prompt: None,
            messages,
            max_output_tokens: None,
            temperature: None,
            top_p: None,
            json_mode: false,
        })
    }

    /// Creates a single-turn request from a system and a user prompt.
    #[must_use]
    pub fn chat(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system_prompt: Some(system.into()),
            messages: vec![PromptMessage::new(MessageRole::User, user)],
            max_output_tokens: None,
            temperature: None,
            top_p: None,
            json_mode: false,
        }
    }

    /// Sets the system prompt that guides model behavior.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the maximum output token budget.
    #[must_use]
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets nucleus sampling.
    #[must_use]
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Asks the provider to return a JSON object.
    #[must_use]
    pub fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    /// Returns the system prompt if configured.
    #[must_use]
    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// Returns the prompt messages.
    #[must_use]
    pub fn messages(&self) -> &[PromptMessage] {
        &self.messages
    }

    /// Returns the configured maximum output tokens.
    #[must_use]
    pub const fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }

    /// Returns the configured sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    /// Returns the configured nucleus sampling value.
    #[must_use]
    pub const fn top_p(&self) -> Option<f32> {
        self.top_p
    }

    /// Returns `true` if JSON output was requested.
    #[must_use]
    pub const fn json_mode(&self) -> bool {
        self.json_mode
    }
}

/// Streaming chunk returned by the adapter.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct InferenceChunk {
    /// Partial token delta emitted by the provider.
    pub delta: String,
    /// Whether the generation is complete.
    pub done: bool,
}

impl InferenceChunk {
    /// Creates a new chunk.
    #[must_use]
    pub fn new(delta: impl Into<String>, done: bool) -> Self {
        Self {
            delta: delta.into(),
            done,
        }
    }
}

/// Trait implemented by all model adapters.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Returns basic metadata describing the adapter instance.
    fn metadata(&self) -> &AdapterMetadata;

    /// Executes the inference request, returning a streaming response.
    async fn infer(&self, request: InferenceRequest) -> AdapterResult<AdapterStream>;

    /// Executes the inference request and collects the streamed text.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by [`ModelAdapter::infer`] or the
    /// stream.
    async fn complete(&self, request: InferenceRequest) -> AdapterResult<String> {
        let mut stream = self.infer(request).await?;
        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            text.push_str(&chunk.delta);
            if chunk.done {
                break;
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;

    struct Chunked {
        metadata: AdapterMetadata,
    }

    #[async_trait]
    impl ModelAdapter for Chunked {
        fn metadata(&self) -> &AdapterMetadata {
            &self.metadata
        }

        async fn infer(&self, _request: InferenceRequest) -> AdapterResult<AdapterStream> {
            let chunks = vec![
                Ok(InferenceChunk::new("{\"a\":", false)),
                Ok(InferenceChunk::new(" 1}", true)),
                Ok(InferenceChunk::new("ignored", true)),
            ];
            Ok(Box::pin(stream::iter(chunks)))
        }
    }

    #[test]
    fn validates_request_messages() {
        let err = InferenceRequest::new(Vec::new()).expect_err("messages required");
        assert!(matches!(err, AdapterError::InvalidRequest { .. }));
    }

    #[test]
    fn builds_request() {
        let request = InferenceRequest::new(vec![PromptMessage::new(MessageRole::User, "ping")])
            .unwrap()
            .with_max_output_tokens(256)
            .with_temperature(0.7)
            .with_top_p(0.9)
            .with_json_mode(true);

        assert_eq!(request.messages().len(), 1);
        assert_eq!(request.max_output_tokens(), Some(256));
        assert_eq!(request.temperature(), Some(0.7));
        assert_eq!(request.top_p(), Some(0.9));
        assert!(request.json_mode());
    }

    #[test]
    fn chat_request_carries_both_prompts() {
        let request = InferenceRequest::chat("be terse", "hello");
        assert_eq!(request.system_prompt(), Some("be terse"));
        assert_eq!(request.messages()[0].role(), MessageRole::User);
        assert_eq!(request.messages()[0].content(), "hello");
    }

    #[tokio::test]
    async fn complete_collects_until_done() {
        let adapter = Chunked {
            metadata: AdapterMetadata::new("test", "chunked"),
        };
        let text = adapter
            .complete(InferenceRequest::chat("s", "u"))
            .await
            .expect("completes");
        assert_eq!(text, "{\"a\": 1}");
        assert_eq!(adapter.metadata().to_string(), "test/chunked");
    }
}
