//! Console presentation for triage sessions.
//!
//! Reads one line per action from stdin and renders turns to stdout.
//! Lines starting with `/` are commands:
//! - `/attach <path>`: attach a JPEG/PNG to the next message
//! - `/detach`: drop the pending image
//! - `/reset`: start a new patient session
//! - `/retry`: resend the last failed message
//! - `/quit` (or `exit` / `quit`): leave
//!
//! Anything else is a message describing symptoms.
//!
//! Input is read on a dedicated OS thread and handed over through a channel.
//! A read that is still blocked when the session ends (Ctrl-C at the prompt)
//! then never holds up the shutdown of the tokio runtime.

use std::{
    io::{self, BufRead},
    path::PathBuf,
    sync::Arc,
    thread,
};

use async_trait::async_trait;
use tokio::{
    io::{AsyncWriteExt, Stdout},
    sync::{Mutex, mpsc},
};
use tracing::{debug, instrument};

use crate::base::{
    conversation::{Role, Turn},
    prompts::SCREENING_FOOTER,
    types::{Res, Void},
    urgency::UrgencyLevel,
};

use super::{ChatClient, ChatEvent, GenericChatClient};

// Extra methods on `ChatClient` applied by the console implementation.

impl ChatClient {
    /// Creates a new stdin/stdout chat client.
    pub fn console() -> Res<Self> {
        let client = ConsoleChatClient::new(io::BufReader::new(io::stdin()))?;

        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// Console chat client implementation.
struct ConsoleChatClient {
    input: Mutex<mpsc::Receiver<io::Result<String>>>,
    output: Mutex<Stdout>,
}

impl ConsoleChatClient {
    fn new<R: BufRead + Send + 'static>(reader: R) -> Res<Self> {
        Ok(Self {
            input: Mutex::new(spawn_line_reader(reader)?),
            output: Mutex::new(tokio::io::stdout()),
        })
    }

    async fn write(&self, text: &str) -> Void {
        let mut output = self.output.lock().await;
        output.write_all(text.as_bytes()).await?;
        output.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl GenericChatClient for ConsoleChatClient {
    async fn start(&self) -> Void {
        self.write(&format!("{}\n", banner())).await
    }

    #[instrument(skip_all)]
    async fn next_event(&self) -> Res<ChatEvent> {
        loop {
            self.write("\n> ").await?;

            let line = self.input.lock().await.recv().await.transpose()?;

            let Some(line) = line else {
                debug!("Console input closed.");
                return Ok(ChatEvent::Quit);
            };

            match parse_line(&line) {
                Ok(Some(event)) => return Ok(event),
                Ok(None) => continue,
                Err(usage) => self.write(&format!("{usage}\n")).await?,
            }
        }
    }

    async fn render_turn(&self, turn: &Turn) -> Void {
        self.write(&format!("\n{}\n", format_turn(turn))).await
    }

    async fn render_notice(&self, notice: &str) -> Void {
        self.write(&format!("· {notice}\n")).await
    }

    async fn render_failure(&self, notice: &str) -> Void {
        self.write(&format!("\n⚠ {notice}\n")).await
    }

    async fn stop(&self) -> Void {
        self.write(&format!("\n{SCREENING_FOOTER}\n")).await
    }
}

// Helpers.

/// Read lines from `reader` on a detached thread.
///
/// The channel closes at end of input, or after the first read error is delivered.
fn spawn_line_reader<R: BufRead + Send + 'static>(reader: R) -> Res<mpsc::Receiver<io::Result<String>>> {
    let (tx, rx) = mpsc::channel(16);

    thread::Builder::new().name("console-input".to_string()).spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
    })?;

    Ok(rx)
}

fn banner() -> String {
    [
        "MediTriage: AI screening for immediate clinical guidance",
        "Describe your symptoms. Commands: /attach <path>, /detach, /reset, /retry, /quit",
    ]
    .join("\n")
}

/// Parse one console line.
///
/// Returns `Ok(None)` for blank lines and `Err(usage)` for malformed commands.
pub(crate) fn parse_line(line: &str) -> Result<Option<ChatEvent>, String> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(None);
    }

    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Ok(Some(ChatEvent::Quit));
    }

    let Some(command) = line.strip_prefix('/') else {
        return Ok(Some(ChatEvent::Message(line.to_string())));
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };

    match (name.to_ascii_lowercase().as_str(), argument) {
        ("attach", "") => Err("Usage: /attach <path to a JPEG or PNG image>".to_string()),
        ("attach", path) => Ok(Some(ChatEvent::Attach(PathBuf::from(path)))),
        ("detach", _) => Ok(Some(ChatEvent::Detach)),
        ("reset", _) => Ok(Some(ChatEvent::Reset)),
        ("retry", _) => Ok(Some(ChatEvent::Retry)),
        ("quit" | "exit", _) => Ok(Some(ChatEvent::Quit)),
        _ => Err(format!("Unknown command `/{name}`. Commands: /attach <path>, /detach, /reset, /retry, /quit")),
    }
}

/// A text urgency gauge, e.g. `[■■■□□] LEVEL 3 · URGENT`.
pub(crate) fn format_gauge(level: UrgencyLevel) -> String {
    let filled = usize::from(level.fill_percent() / 20);
    format!("[{}{}] {level}", "■".repeat(filled), "□".repeat(5 - filled))
}

/// Render a turn for the console.
pub(crate) fn format_turn(turn: &Turn) -> String {
    let time = turn.created_at().format("%H:%M");

    match (turn.role(), turn.urgency_level()) {
        (Role::Assistant, Some(level)) => format!("triage [{time}] {}\n{}", format_gauge(level), turn.content()),
        (Role::Assistant, None) => format!("triage [{time}]\n{}", turn.content()),
        (Role::User, _) if turn.had_attachment() => format!("you [{time}] (photo attached)\n{}", turn.content()),
        (Role::User, _) => format!("you [{time}]\n{}", turn.content()),
    }
}

// Tests.
