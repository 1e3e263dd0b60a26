//! Retrieval-augmented answering for Medibot.
//!
//! - `AnswerService`: the port the chat pipeline calls
//! - `BoxAnswerService`: object-safe wrapper for runtime selection
//! - `RagChain`: embedder + vector index + chat model composed with MMR
//!   selection and the medical system prompt

pub mod answer;
pub mod chain;
pub mod mmr;
pub mod ports;
pub mod prompt;
