//! Clients for the external answering collaborators and the factory that
//! wires them into a [`RagChain`].

pub mod http;
pub mod openai;
pub mod pinecone;

use std::time::Duration;

use medibot_core::rag::chain::{RagChain, RetrievalSettings};
use medibot_types::config::RagConfig;
use medibot_types::rag::RagError;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::config::ApiCredentials;

use self::openai::{OpenAiChatModel, OpenAiEmbedder};
use self::pinecone::PineconeIndex;

/// The production retrieval chain.
pub type MedicalRagChain = RagChain<OpenAiEmbedder, PineconeIndex, OpenAiChatModel>;

/// Connect to the vector index and build the chain.
///
/// Succeeds only when the index exists and answered the control plane,
/// which is what readiness reports as "connected".
pub async fn build_rag_chain(
    config: &RagConfig,
    credentials: ApiCredentials,
) -> Result<MedicalRagChain, RagError> {
    let client = http::build_client(Duration::from_secs(config.request_timeout_secs))?;

    let index = PineconeIndex::connect(
        client.clone(),
        credentials.pinecone_api_key,
        &config.pinecone_control_url,
        &config.pinecone_api_version,
        &config.index_name,
    )
    .await?;

    if let (Some(index_dim), Some(embed_dim)) = (index.dimension(), config.embedding_dimensions) {
        if index_dim != embed_dim {
            warn!(
                index_dim,
                embed_dim, "embedding dimensions do not match the vector index"
            );
        }
    }

    let embedder = OpenAiEmbedder::new(
        client.clone(),
        SecretString::from(credentials.openai_api_key.expose_secret().to_string()),
        &config.openai_base_url,
        &config.embedding_model,
        config.embedding_dimensions,
    );
    let model = OpenAiChatModel::new(
        client,
        credentials.openai_api_key,
        &config.openai_base_url,
        &config.chat_model,
        config.temperature,
    );

    info!(
        index = %config.index_name,
        model = %config.chat_model,
        embedding_model = %config.embedding_model,
        "retrieval chain initialized"
    );

    Ok(RagChain::new(
        embedder,
        index,
        model,
        RetrievalSettings {
            top_k: config.top_k,
            fetch_k: config.fetch_k,
            lambda_mult: config.lambda_mult,
            text_key: config.text_key.clone(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medibot_core::rag::answer::AnswerService;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn credentials() -> ApiCredentials {
        ApiCredentials {
            pinecone_api_key: SecretString::from("pc-test"),
            openai_api_key: SecretString::from("sk-test"),
        }
    }

    fn config_for(server: &Server) -> RagConfig {
        RagConfig {
            pinecone_control_url: server.url(),
            openai_base_url: server.url(),
            embedding_dimensions: Some(2),
            ..RagConfig::default()
        }
    }

    #[tokio::test]
    async fn test_chain_answers_end_to_end() {
        let mut server = Server::new_async().await;
        let host = server.url();
        let _describe = server
            .mock("GET", "/indexes/medical-chatbot")
            .with_status(200)
            .with_body(json!({"name": "medical-chatbot", "dimension": 2, "host": host}).to_string())
            .create_async()
            .await;
        let _embed = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_body(r#"{"data":[{"embedding":[1.0,0.0]}]}"#)
            .create_async()
            .await;
        let _query = server
            .mock("POST", "/query")
            .with_status(200)
            .with_body(
                json!({"matches": [
                    {"id": "a", "score": 0.9, "values": [1.0, 0.0], "metadata": {"text": "Acne is a skin condition."}}
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        let chat = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::Regex("Acne is a skin condition".to_string()))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Acne affects the skin."}}]}"#)
            .create_async()
            .await;

        let chain = build_rag_chain(&config_for(&server), credentials())
            .await
            .unwrap();
        assert_eq!(AnswerService::name(&chain), "gpt-4o");

        let resp = chain.answer("What is acne?").await.unwrap();
        chat.assert_async().await;
        assert_eq!(resp.answer.as_deref(), Some("Acne affects the skin."));
        assert_eq!(resp.context.len(), 1);
    }

    #[tokio::test]
    async fn test_chain_fails_when_index_missing() {
        let mut server = Server::new_async().await;
        let _describe = server
            .mock("GET", "/indexes/medical-chatbot")
            .with_status(404)
            .create_async()
            .await;

        let err = build_rag_chain(&config_for(&server), credentials())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RagError::IndexNotFound(_)));
    }
}
