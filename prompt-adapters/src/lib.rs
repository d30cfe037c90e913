//! Model adapters used by the prompt evaluation harness.
//!
//! Each module exposes an implementation for a provider family while
//! sharing the trait-based interface defined in [`traits`]:
//! [`openai`] covers every OpenAI-compatible chat completion API (`OpenAI`,
//! Mistral, Cerebras) and [`gemini`] covers Google's `generateContent`.

#![warn(missing_docs, clippy::pedantic)]

pub mod gemini;
pub mod openai;
pub mod traits;

mod http_client;

pub use gemini::{GeminiAdapter, GeminiConfig};
pub use openai::{OpenAiAdapter, OpenAiConfig};
pub use traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, InferenceRequest,
    MessageRole, ModelAdapter, PromptMessage,
};
