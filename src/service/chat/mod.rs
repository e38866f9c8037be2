pub mod console;

use std::{ops::Deref, path::PathBuf, sync::Arc};

use async_trait::async_trait;

use crate::base::{
    conversation::Turn,
    types::{Res, Void},
};

// Types.

/// Something the user did in the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Submit a new user turn.
    Message(String),
    /// Attach an image to the next user turn.
    Attach(PathBuf),
    /// Drop the pending image.
    Detach,
    /// Clear the conversation and any pending image.
    Reset,
    /// Resubmit the last failed turn.
    Retry,
    /// End the session.
    Quit,
}

// Traits.

/// Generic "chat" trait that presentation layers must implement.
///
/// This trait is the seam between the triage session and whatever the user
/// is looking at. It reads user actions and renders turns and notices; it
/// holds no conversation state of its own.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Start the session, e.g. by greeting the user.
    async fn start(&self) -> Void;

    /// Wait for the next user action.
    ///
    /// Implementations return [`ChatEvent::Quit`] once input is exhausted.
    async fn next_event(&self) -> Res<ChatEvent>;

    /// Render one turn of the conversation.
    async fn render_turn(&self, turn: &Turn) -> Void;

    /// Render an informational notice (status, acknowledgement).
    async fn render_notice(&self, notice: &str) -> Void;

    /// Render a user-facing failure notice for the current turn.
    async fn render_failure(&self, notice: &str) -> Void;

    /// End the session, e.g. by printing the closing disclaimer.
    async fn stop(&self) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
