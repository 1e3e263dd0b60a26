//! The chat request pipeline: validation, cache, answering service and
//! per-session history/feedback.

pub mod service;
pub mod validation;
