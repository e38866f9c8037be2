//! Per-session state: the conversation, the pending attachment, and the last
//! failed submission.

use crate::{
    base::{attachment::Attachment, conversation::Conversation, conversation::Turn},
    service::triage::Assessment,
};

/// One user submission as it was sent to the triage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub text: String,
    pub attachment: Option<Attachment>,
}

/// State owned by one interactive session.
///
/// Created when the session starts and dropped when it ends; nothing here is
/// shared with other sessions or persisted.
#[derive(Debug, Default)]
pub struct Session {
    conversation: Conversation,
    pending: Option<Attachment>,
    failed: Option<Submission>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The image waiting to go out with the next user turn.
    pub fn pending_attachment(&self) -> Option<&Attachment> {
        self.pending.as_ref()
    }

    /// The submission that failed most recently, if it has not been retried.
    pub fn failed_submission(&self) -> Option<&Submission> {
        self.failed.as_ref()
    }

    /// Attach an image to the next user turn, returning any image it replaces.
    pub fn attach(&mut self, attachment: Attachment) -> Option<Attachment> {
        self.pending.replace(attachment)
    }

    /// Drop the pending image.
    pub fn detach(&mut self) -> Option<Attachment> {
        self.pending.take()
    }

    /// Record a new user turn.
    ///
    /// The pending attachment is consumed, so the following turn carries no
    /// image unless a new one is attached. A new submission supersedes any
    /// earlier failed one.
    pub fn submit(&mut self, text: impl Into<String>) -> Submission {
        let text = text.into();
        let attachment = self.pending.take();

        self.failed = None;
        self.conversation.push_user(text.clone(), attachment.is_some());

        Submission { text, attachment }
    }

    /// Record the assistant turn for a successful assessment.
    pub fn record_assessment(&mut self, assessment: Assessment) -> &Turn {
        self.failed = None;
        self.conversation.push_assistant(assessment.text, assessment.level)
    }

    /// Keep a failed submission around so it can be retried.
    pub fn record_failure(&mut self, submission: Submission) {
        self.failed = Some(submission);
    }

    /// Take the failed submission for a retry.
    pub fn take_failed(&mut self) -> Option<Submission> {
        self.failed.take()
    }

    /// Start over: clear the conversation, the pending image and any failed submission.
    pub fn reset(&mut self) {
        self.conversation.clear();
        self.pending = None;
        self.failed = None;
    }
}

// Tests.
