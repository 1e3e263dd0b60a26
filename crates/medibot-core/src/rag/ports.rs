//! Collaborator traits used by the retrieval chain.
//!
//! Implementations (OpenAI embeddings and chat, Pinecone index) live in
//! medibot-infra.

use medibot_types::rag::{IndexMatch, Message, RagError};

/// Converts a question into a query vector.
pub trait Embedder: Send + Sync {
    /// Embed a single query text.
    fn embed_query(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, RagError>> + Send;

    /// The model name used for embeddings (e.g., "text-embedding-3-small").
    fn model_name(&self) -> &str;
}

/// Similarity search over the pre-built medical corpus index.
pub trait VectorIndex: Send + Sync {
    /// Name of the index being queried.
    fn name(&self) -> &str;

    /// Return up to `top_k` nearest matches, including their stored vectors
    /// and metadata.
    fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<IndexMatch>, RagError>> + Send;
}

/// Generates an answer from a prepared conversation.
pub trait ChatModel: Send + Sync {
    fn model_name(&self) -> &str;

    /// Run one completion. `Ok(None)` means the model returned no content.
    fn complete(
        &self,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<Option<String>, RagError>> + Send;
}
