//! The triage assessment service.
//!
//! Given one user turn (text plus an optional photo), ask the triage agent for
//! an assessment and classify it with [`extract_level_or`].

use tracing::{info, instrument};

use crate::{
    base::{
        attachment::Attachment,
        config::Config,
        types::{Res, TriageContext},
        urgency::{UrgencyLevel, extract_level_or},
    },
    service::llm::LlmClient,
};

/// The outcome of one assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// The model's answer, unmodified.
    pub text: String,
    /// The urgency level extracted from `text`.
    pub level: UrgencyLevel,
}

/// Stateless triage service.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct TriageService {
    llm: LlmClient,
    fallback_level: UrgencyLevel,
}

impl TriageService {
    pub fn new(config: &Config, llm: LlmClient) -> Self {
        Self {
            llm,
            fallback_level: config.fallback_urgency_level(),
        }
    }

    /// Assess one user turn.
    ///
    /// Each call is independent of any earlier turn. Errors from image
    /// re-encoding or from the backend are returned to the caller as-is.
    #[instrument(name = "TriageService::assess", skip_all)]
    pub async fn assess(&self, user_text: &str, image: Option<&Attachment>) -> Res<Assessment> {
        let image_data_url = image.map(Attachment::to_jpeg_data_url).transpose()?;

        let context = TriageContext {
            user_message: user_text.to_string(),
            image_data_url,
        };

        let text = self.llm.get_triage_agent_response(&context).await?;
        let level = extract_level_or(&text, self.fallback_level);

        info!("Assessment complete: {level}");

        Ok(Assessment { text, level })
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::base::{attachment::tests::png_bytes, config::ConfigInner};
    use crate::service::llm::GenericLlmClient;

    /// Records every context and answers with a canned response.
    struct CannedLlm {
        answer: Res<String>,
        seen: Mutex<Vec<TriageContext>>,
    }

    #[async_trait]
    impl GenericLlmClient for CannedLlm {
        async fn get_triage_agent_response(&self, context: &TriageContext) -> Res<String> {
            self.seen.lock().unwrap().push(context.clone());
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(err) => Err(anyhow::anyhow!("{err}")),
            }
        }
    }

    fn build_service(answer: Res<String>, fallback: u8) -> (TriageService, Arc<CannedLlm>) {
        let config = Config::from_inner(ConfigInner {
            openai_api_key: "sk-test".to_string(),
            unrecognized_urgency_level: fallback,
            ..Default::default()
        })
        .unwrap();

        let llm = Arc::new(CannedLlm { answer, seen: Mutex::new(Vec::new()) });
        (TriageService::new(&config, LlmClient::new(llm.clone())), llm)
    }

    #[tokio::test]
    async fn test_assess_returns_text_unmodified_with_level() {
        let answer = "**NOTICE: ...**\n**Urgency Rating**: [LEVEL 2: EMERGENT]\nGo to the ER.".to_string();
        let (service, llm) = build_service(Ok(answer.clone()), 5);

        let assessment = service.assess("I have a deep cut that won't stop bleeding", None).await.unwrap();

        assert_eq!(assessment.text, answer);
        assert_eq!(assessment.level, UrgencyLevel::Emergent);

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].user_message, "I have a deep cut that won't stop bleeding");
        assert!(seen[0].image_data_url.is_none());
    }

    #[tokio::test]
    async fn test_assess_embeds_image_as_jpeg_data_url() {
        let (service, llm) = build_service(Ok("LEVEL 4".to_string()), 5);
        let attachment = Attachment::from_bytes("rash.png", png_bytes());

        service.assess("itchy rash", Some(&attachment)).await.unwrap();

        let seen = llm.seen.lock().unwrap();
        let url = seen[0].image_data_url.as_deref().unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn test_assess_uses_fallback_level() {
        let (service, _) = build_service(Ok("I am not sure.".to_string()), 5);
        assert_eq!(service.assess("hello", None).await.unwrap().level, UrgencyLevel::Routine);

        let (service, _) = build_service(Ok("I am not sure.".to_string()), 2);
        assert_eq!(service.assess("hello", None).await.unwrap().level, UrgencyLevel::Emergent);
    }

    #[tokio::test]
    async fn test_assess_propagates_backend_errors() {
        let (service, _) = build_service(Err(anyhow::anyhow!("401 Unauthorized")), 5);

        let err = service.assess("hello", None).await.unwrap_err();

        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_assess_rejects_undecodable_image_before_calling_backend() {
        let (service, llm) = build_service(Ok("LEVEL 1".to_string()), 5);
        let attachment = Attachment::from_bytes("broken.jpg", vec![0, 1, 2, 3]);

        assert!(service.assess("look at this", Some(&attachment)).await.is_err());
        assert!(llm.seen.lock().unwrap().is_empty());
    }
}
