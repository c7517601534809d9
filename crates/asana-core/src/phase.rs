//! Session phases

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of a guided session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Waiting for start
    #[default]
    NotStarted,
    /// Guiding through the sequence
    InProgress,
    /// Every posture passed (terminal until stop)
    Completed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::NotStarted => "not-started",
            SessionPhase::InProgress => "in-progress",
            SessionPhase::Completed => "completed",
        };
        f.write_str(name)
    }
}
