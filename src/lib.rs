//! Library root for `meditriage`.
//!
//! Meditriage is a console medical triage assistant designed to:
//! - Take a description of symptoms and, optionally, a photo
//! - Ask a hosted multimodal LLM for a cautious, non-diagnostic assessment
//! - Classify the assessment into an urgency level from 1 (critical) to 5 (routine)
//! - Keep the running conversation in memory for the length of a session
//!
//! The assistant talks to any OpenAI-compatible endpoint (OpenRouter by
//! default). The architecture is built around extensible traits for the LLM
//! and the presentation layer, so each can be swapped or mocked.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the meditriage runtime:
/// - Creates the runtime context with the LLM, triage and chat clients
/// - Runs one interactive session until the user quits
pub async fn start(config: Config) -> Void {
    info!("Starting meditriage ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
