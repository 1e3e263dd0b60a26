//! Answering service trait and its type-erased wrapper.
//!
//! Follows the same blanket-impl pattern as the other boxed ports:
//! 1. Define an object-safe `AnswerServiceDyn` trait with boxed futures
//! 2. Blanket-impl `AnswerServiceDyn` for all `T: AnswerService`
//! 3. `BoxAnswerService` wraps `Box<dyn AnswerServiceDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use medibot_types::rag::{RagError, RagResponse};

/// Answers a medical question from the indexed corpus.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait AnswerService: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Answer one (already validated and trimmed) question.
    fn answer(
        &self,
        question: &str,
    ) -> impl Future<Output = Result<RagResponse, RagError>> + Send;
}

/// Object-safe version of [`AnswerService`] with boxed futures.
pub trait AnswerServiceDyn: Send + Sync {
    fn name_dyn(&self) -> &str;

    fn answer_boxed<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RagResponse, RagError>> + Send + 'a>>;
}

impl<T: AnswerService> AnswerServiceDyn for T {
    fn name_dyn(&self) -> &str {
        AnswerService::name(self)
    }

    fn answer_boxed<'a>(
        &'a self,
        question: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RagResponse, RagError>> + Send + 'a>> {
        Box::pin(self.answer(question))
    }
}

/// Type-erased answering service.
///
/// Lets the application hold either a working retrieval chain or an
/// [`UnavailableAnswerService`] behind one concrete type.
pub struct BoxAnswerService {
    inner: Box<dyn AnswerServiceDyn + Send + Sync>,
}

impl BoxAnswerService {
    pub fn new<T: AnswerService + 'static>(service: T) -> Self {
        Self {
            inner: Box::new(service),
        }
    }
}

impl AnswerService for BoxAnswerService {
    fn name(&self) -> &str {
        self.inner.name_dyn()
    }

    async fn answer(&self, question: &str) -> Result<RagResponse, RagError> {
        self.inner.answer_boxed(question).await
    }
}

/// Stand-in used when the real service failed to initialize at boot.
///
/// Every call fails with the recorded initialization error.
pub struct UnavailableAnswerService {
    reason: String,
}

impl UnavailableAnswerService {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl AnswerService for UnavailableAnswerService {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn answer(&self, _question: &str) -> Result<RagResponse, RagError> {
        Err(RagError::Unavailable(self.reason.clone()))
    }
}
