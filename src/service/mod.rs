//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by meditriage:
//! - Chat services (the presentation layer, e.g. the console)
//! - LLM services (e.g., OpenAI-compatible endpoints)
//! - The triage assessment service built on top of the LLM
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod llm;
pub mod triage;
