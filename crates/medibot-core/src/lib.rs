//! Chat pipeline and port trait definitions for Medibot.
//!
//! This crate defines the "ports" (cache, session, rate-limit and
//! answering-service traits) that the infrastructure layer implements,
//! plus the request pipeline built on top of them. It depends only on
//! `medibot-types` -- never on `medibot-infra` or any network/IO crate.

pub mod cache;
pub mod chat;
pub mod rag;
pub mod ratelimit;
pub mod session;
