//! Runtime services and shared state for meditriage.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    interaction::{
        chat_event::{Flow, handle_chat_event},
        session::Session,
    },
    service::{chat::ChatClient, llm::LlmClient, triage::TriageService},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration and the service clients. It is designed
/// to be trivially cloneable, allowing it to be passed around without the need
/// for `Arc` or `Mutex`. Session state is not part of it.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The triage service instance.
    pub triage: TriageService,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        // Initialize the triage service.
        let triage = TriageService::new(&config, llm.clone());

        // Initialize the console chat client.
        let chat = ChatClient::console()?;

        Ok(Self { config, llm, triage, chat })
    }

    /// Run one interactive session until the user quits or presses Ctrl-C.
    pub async fn start(&self) -> Void {
        self.chat.start().await?;

        tokio::select! {
            result = self.run_session() => result?,
            _ = tokio::signal::ctrl_c() => info!("Interrupted, ending session."),
        }

        self.chat.stop().await
    }

    /// Drive a fresh session from chat events until the user quits.
    ///
    /// The session is created here and dropped on return, so nothing outlives it.
    #[instrument(skip_all)]
    pub async fn run_session(&self) -> Void {
        let mut session = Session::new();

        loop {
            let event = self.chat.next_event().await?;

            if handle_chat_event(event, &mut session, &self.triage, &self.chat).await? == Flow::Quit {
                break;
            }
        }

        info!("Session ended after {} turns.", session.conversation().len());

        Ok(())
    }
}
