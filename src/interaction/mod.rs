//! Session state and user interactions for meditriage.
//!
//! This module provides functionality for handling one interactive session:
//! - Owning the conversation and the pending image attachment
//! - Processing user actions from the presentation layer
//! - Coordinating turns between the triage service and the chat client

pub mod chat_event;
pub mod session;
