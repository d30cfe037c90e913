//! Google Gemini `generateContent` adapter.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use futures::stream;
use hyper::Uri;
use hyper::header::HeaderName;
use serde::{Deserialize, Serialize};

use crate::http_client::{JsonTransport, sanitize_base_url};
use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, InferenceRequest,
    MessageRole, ModelAdapter, PromptMessage,
};

/// Default base URL of the Gemini API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-goog-api-key");

/// Configuration for the Gemini adapter.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
    default_temperature: Option<f32>,
}

impl GeminiConfig {
    /// Creates a configuration using the supplied model identifier.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_owned(),
            timeout: Duration::from_secs(60),
            default_temperature: None,
        }
    }

    /// Overrides the base URL used for API calls.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url("gemini", base_url.as_ref())?;
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

/// Google Gemini adapter that calls the official API over HTTPS.
pub struct GeminiAdapter {
    transport: JsonTransport,
    endpoint: Uri,
    metadata: AdapterMetadata,
    api_key: String,
    default_temperature: Option<f32>,
}

impl fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiAdapter {
    /// Constructs a new adapter with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the API key is missing or
    /// the endpoint is invalid.
    pub fn new(config: GeminiConfig) -> AdapterResult<Self> {
        let api_key = config
            .api_key
            .ok_or_else(|| AdapterError::configuration("Gemini adapter requires an API key"))?;

        let endpoint = format!(
            "{}v1beta/models/{}:generateContent",
            config.base_url, config.model
        )
        .parse::<Uri>()
        .map_err(|err| AdapterError::configuration(format!("invalid Gemini endpoint: {err}")))?;

        Ok(Self {
            transport: JsonTransport::new("gemini", config.timeout)?,
            endpoint,
            metadata: AdapterMetadata::new("gemini", config.model),
            api_key,
            default_temperature: config.default_temperature,
        })
    }

    fn build_request(&self, request: &InferenceRequest) -> GenerateContentRequest {
        // Gemini takes the system prompt as a separate parameter.
        let system_instruction = request.system_prompt().map(|prompt| SystemInstruction {
            parts: vec![Part {
                text: prompt.to_owned(),
            }],
        });

        let contents: Vec<Content> = request
            .messages()
            .iter()
            .filter(|msg| msg.role() != MessageRole::System)
            .map(map_prompt_message)
            .collect();

        let generation_config = GenerationConfig {
            temperature: request.temperature().or(self.default_temperature),
            max_output_tokens: request.max_output_tokens(),
            top_p: request.top_p(),
            response_mime_type: request.json_mode().then_some("application/json"),
        };

        GenerateContentRequest {
            system_instruction,
            contents,
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
        }
    }
}

#[async_trait]
impl ModelAdapter for GeminiAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn infer(&self, request: InferenceRequest) -> AdapterResult<AdapterStream> {
        let payload = self.build_request(&request);
        let headers = [(API_KEY_HEADER, self.api_key.clone())];

        let response: GenerateContentResponse = self
            .transport
            .post_json(self.endpoint.clone(), &headers, &payload)
            .await?;

        let content = response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .ok_or_else(|| AdapterError::response("Gemini returned no candidates"))?;

        let stream = stream::once(async move { Ok(InferenceChunk::new(content, true)) });
        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

impl GenerationConfig {
    const fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.max_output_tokens.is_none()
            && self.top_p.is_none()
            && self.response_mime_type.is_none()
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

fn map_prompt_message(message: &PromptMessage) -> Content {
    let role = match message.role() {
        MessageRole::Assistant => "model",
        MessageRole::User | MessageRole::System => "user",
    };

    Content {
        role: role.to_owned(),
        parts: vec![Part {
            text: message.content().to_owned(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> GeminiAdapter {
        GeminiAdapter::new(GeminiConfig::new("gemini-1.5-pro").with_api_key("test_key"))
            .expect("adapter")
    }

    #[test]
    fn base_url_requires_scheme() {
        let err = GeminiConfig::new("gemini-1.5-pro")
            .with_base_url("generativelanguage.googleapis.com")
            .expect_err("missing scheme should error");

        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn endpoint_names_the_model() {
        assert_eq!(
            adapter().endpoint.to_string(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn prompt_mapping_uses_model_role() {
        let message = PromptMessage::new(MessageRole::Assistant, "response");
        let mapped = map_prompt_message(&message);
        assert_eq!(mapped.role, "model");
        assert_eq!(mapped.parts[0].text, "response");
    }

    #[test]
    fn build_request_extracts_system_instruction() {
        let request = InferenceRequest::chat("You are helpful", "hello");
        let gen_req = adapter().build_request(&request);

        assert_eq!(
            gen_req.system_instruction.map(|s| s.parts[0].text.clone()),
            Some("You are helpful".to_owned())
        );
        assert_eq!(gen_req.contents.len(), 1);
        assert!(gen_req.generation_config.is_none());
    }

    #[test]
    fn json_mode_sets_mime_type() {
        let request = InferenceRequest::chat("s", "u")
            .with_json_mode(true)
            .with_max_output_tokens(1024);
        let body = serde_json::to_value(adapter().build_request(&request)).unwrap();

        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "s");
    }
}
