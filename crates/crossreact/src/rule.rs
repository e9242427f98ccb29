use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CrossReactError;

/// How well established a cross-reaction is. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = CrossReactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            _ => Err(CrossReactError::UnknownConfidence(s.to_string())),
        }
    }
}

/// A known cross-reaction: an allergy to `source` may extend to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReactivityRule {
    pub source: String,
    pub target: String,
    pub confidence: Confidence,
    #[serde(default)]
    pub notes: String,
}

impl CrossReactivityRule {
    /// Human-readable warning line, followed by the notes when present.
    pub fn warning(&self) -> String {
        let mut line = format!(
            "May cross-react with {} (confidence: {})",
            self.target, self.confidence
        );
        if !self.notes.is_empty() {
            line.push_str("\n   Note: ");
            line.push_str(&self.notes);
        }
        line
    }
}

impl fmt::Display for CrossReactivityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (confidence: {})",
            self.source, self.target, self.confidence
        )
    }
}
