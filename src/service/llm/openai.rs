//! OpenAI-compatible chat completions for the triage agent.
//!
//! Any endpoint speaking the OpenAI chat completions protocol works; the
//! default base URL points at OpenRouter.

use std::sync::Arc;
use std::time::Duration;

use crate::base::{
    config::Config,
    types::{Res, TriageContext},
};
use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage, ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage, ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse, ImageDetail, ImageUrl,
    },
};
use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_base(config.openai_api_base.clone()).with_api_key(config.openai_api_key.clone());

        Self {
            client: Client::with_config(cfg),
            config: config.clone(),
        }
    }

    /// Build the triage agent messages: the system directive, then one user message.
    #[instrument(name = "OpenAiLlmClient::build_triage_agent_messages", skip_all)]
    fn build_triage_agent_messages(&self, context: &TriageContext) -> Vec<ChatCompletionRequestMessage> {
        let mut parts = vec![ChatCompletionRequestUserMessageContentPart::Text(ChatCompletionRequestMessageContentPartText {
            text: context.user_message.clone(),
        })];

        if let Some(url) = &context.image_data_url {
            parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(ChatCompletionRequestMessageContentPartImage {
                image_url: ImageUrl {
                    url: url.clone(),
                    detail: Some(ImageDetail::Auto),
                },
            }));
        }

        vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(self.config.triage_agent_system_directive.clone()),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Array(parts),
                name: None,
            }),
        ]
    }

    /// Build the full, non-streaming triage request.
    fn build_triage_agent_request(&self, context: &TriageContext) -> Res<CreateChatCompletionRequest> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.openai_triage_agent_model)
            .messages(self.build_triage_agent_messages(context))
            .temperature(self.config.openai_triage_agent_temperature)
            .max_completion_tokens(self.config.openai_max_tokens)
            .stream(false)
            .build()?;

        Ok(request)
    }

    /// Helper function to make OpenAI API calls with retry logic and timeout handling.
    ///
    /// Only transport failures and timeouts are retried. API errors (bad key,
    /// quota, bad request) and malformed responses fail on the first attempt.
    async fn call_openai_api(&self, request: CreateChatCompletionRequest) -> Res<CreateChatCompletionResponse> {
        let max_retries = self.config.openai_max_retries;
        let request_timeout = Duration::from_secs(self.config.openai_request_timeout_secs);

        let mut retries = 0;

        loop {
            let result = timeout(request_timeout, self.client.chat().create(request.clone())).await;

            match result {
                Ok(Ok(response)) => {
                    info!("OpenAI API call succeeded after {} attempts", retries + 1);
                    return Ok(response);
                }
                Ok(Err(err)) => {
                    if !is_transient(&err) {
                        return Err(anyhow::anyhow!("OpenAI API call failed: {err}"));
                    }
                    if retries >= max_retries {
                        return Err(anyhow::anyhow!("OpenAI API call failed after {} attempts: {err}", retries + 1));
                    }
                    retries += 1;
                    warn!("OpenAI API call failed, retrying {retries}/{max_retries}: {err}");

                    tokio::time::sleep(retry_delay(retries)).await;
                }
                Err(_) => {
                    if retries >= max_retries {
                        return Err(anyhow::anyhow!("OpenAI API call timed out after {} attempts", retries + 1));
                    }
                    retries += 1;
                    warn!("OpenAI API call timed out, retrying {retries}/{max_retries}");

                    tokio::time::sleep(retry_delay(retries)).await;
                }
            }
        }
    }
}

/// Exponential backoff before the `retry`-th retry (1-based): 1s, 2s, 4s, ...
fn retry_delay(retry: u32) -> Duration {
    const RETRY_DELAY_MS: u64 = 1000;

    Duration::from_millis(RETRY_DELAY_MS.saturating_mul(2_u64.saturating_pow(retry.saturating_sub(1))))
}

/// Whether a failed call is worth repeating.
fn is_transient(err: &OpenAIError) -> bool {
    matches!(err, OpenAIError::Reqwest(_))
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::get_triage_agent_response", skip_all)]
    async fn get_triage_agent_response(&self, context: &TriageContext) -> Res<String> {
        debug!(
            "Requesting triage assessment ({} chars, image: {})",
            context.user_message.len(),
            context.image_data_url.is_some()
        );

        let request = self.build_triage_agent_request(context)?;
        let response = self.call_openai_api(request).await?;

        parse_openai_response(&response)
    }
}

/// Pull the assistant text out of a chat completion.
///
/// A response without choices or without text content is malformed.
pub fn parse_openai_response(response: &CreateChatCompletionResponse) -> Res<String> {
    let choice = response.choices.first().ok_or_else(|| anyhow::anyhow!("LLM response contained no choices."))?;

    if let Some(refusal) = &choice.message.refusal {
        return Err(anyhow::anyhow!("Request refused: {refusal}"));
    }

    match &choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content.clone()),
        _ => Err(anyhow::anyhow!("LLM response contained no text.")),
    }
}

// Tests.
