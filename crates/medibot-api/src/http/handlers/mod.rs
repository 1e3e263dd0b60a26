//! HTTP request handlers.

pub mod chat;
pub mod feedback;
pub mod health;
pub mod history;
pub mod index;
