//! Retrieval chain: embed, search, diversify, stuff, generate.

use medibot_types::rag::{Document, RagError, RagResponse};
use tracing::{debug, warn};

use super::answer::AnswerService;
use super::mmr;
use super::ports::{ChatModel, Embedder, VectorIndex};
use super::prompt::build_messages;

/// Retrieval parameters for one chain.
#[derive(Debug, Clone)]
pub struct RetrievalSettings {
    /// Passages handed to the model.
    pub top_k: usize,
    /// Candidates fetched from the index before MMR.
    pub fetch_k: usize,
    pub lambda_mult: f32,
    /// Metadata key holding passage text.
    pub text_key: String,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 4,
            fetch_k: 10,
            lambda_mult: 0.7,
            text_key: "text".to_string(),
        }
    }
}

/// Answering service backed by an embedder, a vector index and a chat model.
pub struct RagChain<E: Embedder, V: VectorIndex, M: ChatModel> {
    embedder: E,
    index: V,
    model: M,
    settings: RetrievalSettings,
}

impl<E: Embedder, V: VectorIndex, M: ChatModel> RagChain<E, V, M> {
    pub fn new(embedder: E, index: V, model: M, settings: RetrievalSettings) -> Self {
        Self {
            embedder,
            index,
            model,
            settings,
        }
    }

    pub fn index(&self) -> &V {
        &self.index
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Fetch candidates and keep the `top_k` most relevant yet diverse ones.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<Document>, RagError> {
        let query = self.embedder.embed_query(question).await?;
        let matches = self.index.query(&query, self.settings.fetch_k).await?;

        let mut vectors = Vec::with_capacity(matches.len());
        let mut documents = Vec::with_capacity(matches.len());
        for m in matches {
            match Document::from_match(&m, &self.settings.text_key) {
                Some(doc) => {
                    vectors.push(m.values);
                    documents.push(doc);
                }
                None => warn!(id = %m.id, "index match has no passage text, skipping"),
            }
        }

        let picked = mmr::select(&query, &vectors, self.settings.top_k, self.settings.lambda_mult);
        debug!(
            candidates = documents.len(),
            selected = picked.len(),
            "retrieved passages"
        );
        Ok(picked.into_iter().map(|i| documents[i].clone()).collect())
    }
}

impl<E: Embedder, V: VectorIndex, M: ChatModel> AnswerService for RagChain<E, V, M> {
    fn name(&self) -> &str {
        self.model.model_name()
    }

    async fn answer(&self, question: &str) -> Result<RagResponse, RagError> {
        let context = self.retrieve(question).await?;
        let messages = build_messages(question, &context);
        let answer = self.model.complete(&messages).await?;
        Ok(RagResponse {
            input: question.to_string(),
            context,
            answer,
        })
    }
}
