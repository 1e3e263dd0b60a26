//! Infrastructure layer for Medibot.
//!
//! Contains implementations of the port traits defined in `medibot-core`:
//! in-memory cache, rate limiter and session store (`DashMap`), SQLite
//! session storage, and the HTTP clients for the vector index and the
//! language model.

pub mod cache;
pub mod config;
pub mod rag;
pub mod ratelimit;
pub mod session;
pub mod sqlite;
