//! Urgency levels and their extraction from free-text assessments.
//!
//! Levels follow the Emergency Severity Index: `1` is the most urgent and `5`
//! the least. The LLM is asked to state its rating as `LEVEL n`, and
//! [`extract_level`] pulls the first such rating out of the answer.

use std::{fmt, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Triage urgency, ordered from most (`Critical`) to least (`Routine`) urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UrgencyLevel {
    Critical = 1,
    Emergent = 2,
    Urgent = 3,
    NonUrgent = 4,
    Routine = 5,
}

impl UrgencyLevel {
    /// All levels, most urgent first.
    pub const ALL: [UrgencyLevel; 5] = [Self::Critical, Self::Emergent, Self::Urgent, Self::NonUrgent, Self::Routine];

    /// Build a level from its numeric value; `None` outside `1..=5`.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Critical),
            2 => Some(Self::Emergent),
            3 => Some(Self::Urgent),
            4 => Some(Self::NonUrgent),
            5 => Some(Self::Routine),
            _ => None,
        }
    }

    /// The numeric value, `1..=5`.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// The literal label used on the triage scale.
    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Emergent => "EMERGENT",
            Self::Urgent => "URGENT",
            Self::NonUrgent => "NON-URGENT",
            Self::Routine => "ROUTINE",
        }
    }

    /// How full the urgency gauge is drawn: 100% for level 1, 20% for level 5.
    pub fn fill_percent(self) -> u8 {
        (6 - self.value()) * 20
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LEVEL {} · {}", self.value(), self.label())
    }
}

// Statics.

static LEVEL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// `LEVEL`, optional whitespace, then a single digit in `1..=5` not followed by another digit.
///
/// A missing separator still counts, so `LEVEL3` rates as 3.
fn level_pattern() -> &'static Regex {
    LEVEL_PATTERN.get_or_init(|| Regex::new(r"LEVEL\s*([1-5])(?:[^0-9]|$)").expect("level pattern is a valid regex"))
}

/// Extract the urgency level from an assessment, defaulting to [`UrgencyLevel::Routine`].
///
/// The search is case-insensitive and returns the *first* `LEVEL n` rating
/// found. This function is total: it always yields a level.
pub fn extract_level(text: &str) -> UrgencyLevel {
    extract_level_or(text, UrgencyLevel::Routine)
}

/// Same as [`extract_level`], with an explicit level for unrecognized text.
pub fn extract_level_or(text: &str, fallback: UrgencyLevel) -> UrgencyLevel {
    let upper = text.to_uppercase();

    level_pattern()
        .captures(&upper)
        .and_then(|captures| captures.get(1))
        .and_then(|digit| digit.as_str().parse::<u8>().ok())
        .and_then(UrgencyLevel::from_value)
        .unwrap_or(fallback)
}

// Tests.
