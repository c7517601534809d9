//! Per-frame report for renderers

use std::collections::BTreeMap;

use asana_core::{FrameTime, Landmark, SessionPhase};
use asana_pose::EvaluationResult;
use asana_session::{HoldProgress, SessionState, TickOutcome};
use serde::Serialize;

/// The posture currently on screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostureBanner {
    pub name: String,
    pub display_name: String,
    /// 1-based position in the sequence
    pub number: usize,
    pub total: usize,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub time: FrameTime,
    pub state: SessionState,
    /// Current posture, after this frame's transitions
    pub posture: Option<PostureBanner>,
    pub person_detected: bool,
    /// Verdicts for the posture that was judged this frame
    pub evaluation: Option<EvaluationResult>,
    pub outcome: Option<TickOutcome>,
    pub hold: Option<HoldProgress>,
}

impl FrameReport {
    /// Vertex landmark -> correct, for joint colour coding
    pub fn joint_feedback(&self) -> BTreeMap<Landmark, bool> {
        self.evaluation
            .as_ref()
            .map(EvaluationResult::joint_feedback)
            .unwrap_or_default()
    }

    /// One-line status for text front ends
    pub fn status_line(&self) -> String {
        match self.state.phase {
            SessionPhase::NotStarted => "Waiting to start".to_string(),
            SessionPhase::Completed => "Session complete".to_string(),
            SessionPhase::InProgress => {
                let heading = match &self.posture {
                    Some(b) => format!("Posture {}/{} {}", b.number, b.total, b.display_name),
                    None => "Posture".to_string(),
                };
                match (&self.hold, self.person_detected) {
                    (Some(hold), _) => format!(
                        "{heading} | hold {}s / {}s",
                        hold.display_seconds,
                        hold.threshold.as_secs()
                    ),
                    (None, false) => format!("{heading} | no person detected"),
                    (None, true) => format!("{heading} | align your body with the posture"),
                }
            }
        }
    }
}
