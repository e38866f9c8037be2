pub mod openai;

use crate::base::types::{Res, TriageContext};
use async_trait::async_trait;
use std::ops::Deref;
use std::sync::Arc;

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the core functionality for interacting with large language models.
/// Implementing this trait allows different LLM providers to be used for triage.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Generate a triage assessment from the triage agent.
    ///
    /// The system directive is owned by the implementation. The context carries
    /// the user's text and, optionally, one inline image. The full text answer is
    /// returned unmodified.
    async fn get_triage_agent_response(&self, context: &TriageContext) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}
