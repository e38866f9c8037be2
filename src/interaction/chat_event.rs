//! Handles one user action against a triage session.

use tracing::{error, info, instrument, warn};

use crate::{
    base::{attachment::Attachment, types::Res},
    interaction::session::{Session, Submission},
    service::{
        chat::{ChatClient, ChatEvent},
        triage::TriageService,
    },
};

const ANALYZING_NOTICE: &str = "Analyzing clinical indicators...";
const FAILURE_NOTICE: &str = "We couldn't complete the assessment right now. Your conversation is intact; type /retry to try the same message again.";
const NOTHING_TO_RETRY_NOTICE: &str = "There is no failed message to retry.";
const UNREADABLE_IMAGE_NOTICE: &str = "That image could not be opened. Please attach a JPEG or PNG file.";

/// Whether the session should keep going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Handle one chat event.
///
/// Assessment failures are scoped to their turn: they are rendered as a
/// notice and never returned as errors. Only presentation failures are.
#[instrument(skip_all)]
pub async fn handle_chat_event(event: ChatEvent, session: &mut Session, triage: &TriageService, chat: &ChatClient) -> Res<Flow> {
    match event {
        ChatEvent::Message(text) => {
            info!("Received user message ...");

            let submission = session.submit(text);
            if let Some(turn) = session.conversation().last() {
                chat.render_turn(turn).await?;
            }

            handle_submission(submission, session, triage, chat).await?;
        }
        ChatEvent::Retry => match session.take_failed() {
            Some(submission) => {
                info!("Retrying failed submission ...");
                handle_submission(submission, session, triage, chat).await?;
            }
            None => chat.render_notice(NOTHING_TO_RETRY_NOTICE).await?,
        },
        ChatEvent::Attach(path) => match Attachment::from_path(&path).await {
            Ok(attachment) => {
                info!("Attached image ({} bytes)", attachment.len());

                let notice = format!("Photo `{}` will be sent with your next message.", attachment.name());
                session.attach(attachment);
                chat.render_notice(&notice).await?;
            }
            Err(err) => {
                warn!("Failed to attach image: {err:#}");
                chat.render_failure(UNREADABLE_IMAGE_NOTICE).await?;
            }
        },
        ChatEvent::Detach => {
            let notice = if session.detach().is_some() { "Photo removed." } else { "No photo is attached." };
            chat.render_notice(notice).await?;
        }
        ChatEvent::Reset => {
            info!("Resetting patient session ...");

            session.reset();
            chat.render_notice("Patient session reset.").await?;
        }
        ChatEvent::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// Send a submission to the triage service and record the outcome.
async fn handle_submission(submission: Submission, session: &mut Session, triage: &TriageService, chat: &ChatClient) -> Res<()> {
    chat.render_notice(ANALYZING_NOTICE).await?;

    match triage.assess(&submission.text, submission.attachment.as_ref()).await {
        Ok(assessment) => {
            let turn = session.record_assessment(assessment);
            chat.render_turn(turn).await?;
        }
        Err(err) => {
            error!("Assessment failed: {err:#}");

            session.record_failure(submission);
            chat.render_failure(FAILURE_NOTICE).await?;
        }
    }

    Ok(())
}
