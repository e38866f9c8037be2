//! The in-memory conversation for one triage session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::base::urgency::UrgencyLevel;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message unit in a conversation.
///
/// Turns are immutable once created. An assistant turn always carries an
/// urgency level; a user turn never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
    urgency_level: Option<UrgencyLevel>,
    had_attachment: bool,
    created_at: DateTime<Utc>,
}

impl Turn {
    /// A user turn. `had_attachment` records whether a photo went out with it.
    pub fn user(content: impl Into<String>, had_attachment: bool) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            urgency_level: None,
            had_attachment,
            created_at: Utc::now(),
        }
    }

    /// An assistant turn with its extracted urgency level.
    pub fn assistant(content: impl Into<String>, urgency_level: UrgencyLevel) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            urgency_level: Some(urgency_level),
            had_attachment: false,
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn urgency_level(&self) -> Option<UrgencyLevel> {
        self.urgency_level
    }

    pub fn had_attachment(&self) -> bool {
        self.had_attachment
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered sequence of turns, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user turn and return it.
    pub fn push_user(&mut self, content: impl Into<String>, had_attachment: bool) -> &Turn {
        self.push(Turn::user(content, had_attachment))
    }

    /// Append an assistant turn and return it.
    pub fn push_assistant(&mut self, content: impl Into<String>, urgency_level: UrgencyLevel) -> &Turn {
        self.push(Turn::assistant(content, urgency_level))
    }

    fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop every turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

// Tests.
