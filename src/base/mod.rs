//! Core components, types, and utilities for meditriage.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The triage system directive sent to the LLM.
//! - Urgency levels and their extraction from free text.
//! - The in-memory conversation model and image attachments.
//! - Common types and result handling.

pub mod attachment;
pub mod config;
pub mod conversation;
pub mod prompts;
pub mod types;
pub mod urgency;
