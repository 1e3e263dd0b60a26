//! OpenAI-compatible embeddings and chat-completions clients.
//!
//! Both talk to `{base_url}/embeddings` and `{base_url}/chat/completions`
//! with bearer authentication. The API key is a [`SecretString`] and is only
//! exposed when building request headers.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use medibot_core::rag::ports::{ChatModel, Embedder};
use medibot_types::rag::{Message, RagError};

use super::http::{check_status, decode, request_failed};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Embeddings
// ---------------------------------------------------------------------------

/// Query embedder over the OpenAI embeddings endpoint.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    dimensions: Option<u32>,
}

impl OpenAiEmbedder {
    pub fn new(
        client: reqwest::Client,
        api_key: SecretString,
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimensions: Option<u32>,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimensions,
        }
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: text,
            dimensions: self.dimensions,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;

        let parsed: EmbeddingResponse = decode(check_status(response).await?).await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| RagError::Deserialization("embedding response has no data".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Chat completions
// ---------------------------------------------------------------------------

/// Chat model over the OpenAI chat-completions endpoint.
pub struct OpenAiChatModel {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiChatModel {
    pub fn new(
        client: reqwest::Client,
        api_key: SecretString,
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: Option<f32>,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature,
        }
    }
}

impl ChatModel for OpenAiChatModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[Message]) -> Result<Option<String>, RagError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;

        let parsed: ChatResponse = decode(check_status(response).await?).await?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content))
    }
}
