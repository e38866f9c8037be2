//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::{prompts, urgency::UrgencyLevel};

use super::types::Res;

/// Environment variable consulted when no API key is configured.
const OPENROUTER_API_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Upper bound for `openai_max_retries`.
pub const MAX_OPENAI_RETRIES: u32 = 10;

/// Default OpenAI-compatible endpoint (OpenRouter).
fn default_openai_api_base() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

/// Default multimodal triage agent model to use
fn default_openai_triage_agent_model() -> String {
    "google/gemma-3-27b-it".to_string()
}

/// Default sampling temperature for the triage agent
fn default_openai_triage_agent_temperature() -> f32 {
    0.2
}

/// Default max output tokens for the triage agent
fn default_openai_max_tokens() -> u32 {
    1024
}

/// Default per-attempt request timeout, in seconds
fn default_openai_request_timeout_secs() -> u64 {
    120
}

/// Default number of retries after a failed request
fn default_openai_max_retries() -> u32 {
    2
}

/// Default system directive for the triage agent.
fn default_triage_agent_system_directive() -> String {
    prompts::TRIAGE_AGENT_SYSTEM_DIRECTIVE.to_string()
}

/// Default level for assessments without a recognizable `LEVEL n` rating.
fn default_fallback_urgency_level() -> u8 {
    UrgencyLevel::Routine.value()
}

/// Configuration for the meditriage application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// API key for the inference backend (`OPENAI_API_KEY`, falls back to `OPENROUTER_API_KEY`).
    #[serde(default)]
    pub openai_api_key: String,
    /// Base URL of the OpenAI-compatible endpoint (`OPENAI_API_BASE`).
    #[serde(default = "default_openai_api_base")]
    pub openai_api_base: String,
    /// Multimodal model used for triage (`OPENAI_TRIAGE_AGENT_MODEL`).
    #[serde(default = "default_openai_triage_agent_model")]
    pub openai_triage_agent_model: String,
    /// Sampling temperature for the triage model (`OPENAI_TRIAGE_AGENT_TEMPERATURE`).
    /// Value between 0 and 2. Lower values keep the assessment focused and repeatable.
    #[serde(default = "default_openai_triage_agent_temperature")]
    pub openai_triage_agent_temperature: f32,
    /// Max output tokens for the triage model (`OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Timeout for a single request attempt, in seconds (`OPENAI_REQUEST_TIMEOUT_SECS`).
    #[serde(default = "default_openai_request_timeout_secs")]
    pub openai_request_timeout_secs: u64,
    /// Retries after a transport failure or timed out request (`OPENAI_MAX_RETRIES`).
    /// Value between 0 and 10.
    #[serde(default = "default_openai_max_retries")]
    pub openai_max_retries: u32,
    /// Optional custom system directive to override the default (`TRIAGE_AGENT_SYSTEM_DIRECTIVE`).
    #[serde(default = "default_triage_agent_system_directive")]
    pub triage_agent_system_directive: String,
    /// Level assigned when the answer carries no `LEVEL n` rating (`UNRECOGNIZED_URGENCY_LEVEL`).
    #[serde(default = "default_fallback_urgency_level")]
    pub unrecognized_urgency_level: u8,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_api_base: default_openai_api_base(),
            openai_triage_agent_model: default_openai_triage_agent_model(),
            openai_triage_agent_temperature: default_openai_triage_agent_temperature(),
            openai_max_tokens: default_openai_max_tokens(),
            openai_request_timeout_secs: default_openai_request_timeout_secs(),
            openai_max_retries: default_openai_max_retries(),
            triage_agent_system_directive: default_triage_agent_system_directive(),
            unrecognized_urgency_level: default_fallback_urgency_level(),
        }
    }
}

impl ConfigInner {
    /// The fallback level as a typed value.
    ///
    /// Only meaningful after [`ConfigInner::validate`] has accepted the config.
    pub fn fallback_urgency_level(&self) -> UrgencyLevel {
        UrgencyLevel::from_value(self.unrecognized_urgency_level).unwrap_or(UrgencyLevel::Routine)
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Res<()> {
        if self.openai_api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("Missing API key: set `MEDITRIAGE_OPENAI_API_KEY` or `{OPENROUTER_API_KEY_VAR}`, or add `openai_api_key` to the config file."));
        }

        if self.openai_api_base.trim().is_empty() {
            return Err(anyhow::anyhow!("OpenAI API base URL must not be empty."));
        }

        if self.openai_triage_agent_model.trim().is_empty() {
            return Err(anyhow::anyhow!("OpenAI triage agent model must not be empty."));
        }

        if self.openai_triage_agent_temperature < 0.0 || self.openai_triage_agent_temperature > 2.0 {
            return Err(anyhow::anyhow!("OpenAI triage agent temperature must be between 0 and 2."));
        }

        if self.openai_max_tokens < 1 || self.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 128000."));
        }

        if self.openai_request_timeout_secs < 1 {
            return Err(anyhow::anyhow!("OpenAI request timeout must be at least 1 second."));
        }

        if self.openai_max_retries > MAX_OPENAI_RETRIES {
            return Err(anyhow::anyhow!("OpenAI max retries must be between 0 and {MAX_OPENAI_RETRIES}."));
        }

        if UrgencyLevel::from_value(self.unrecognized_urgency_level).is_none() {
            return Err(anyhow::anyhow!("Unrecognized urgency level must be between 1 and 5."));
        }

        Ok(())
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("MEDITRIAGE"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let mut inner: ConfigInner = cfg.build()?.try_deserialize()?;

        if inner.openai_api_key.trim().is_empty()
            && let Ok(key) = std::env::var(OPENROUTER_API_KEY_VAR)
        {
            inner.openai_api_key = key;
        }

        Self::from_inner(inner)
    }

    /// Wrap and validate an already-built configuration.
    pub fn from_inner(inner: ConfigInner) -> Res<Self> {
        inner.validate()?;

        Ok(Config { inner: Arc::new(inner) })
    }
}

// Tests.
