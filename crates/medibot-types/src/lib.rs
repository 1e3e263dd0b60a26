//! Shared domain types for Medibot.
//!
//! This crate contains the core domain types used across the Medibot service:
//! chat messages, sessions, feedback, retrieval results, rate-limit rules,
//! configuration and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod rag;
pub mod ratelimit;
