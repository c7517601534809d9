//! Error types for Asana
//!
//! Only configuration mistakes, illegal session transitions and I/O are
//! errors. Low-confidence points, coincident points and frames without a
//! person are ordinary per-frame outcomes and never surface here.

use thiserror::Error;

use crate::{AngleId, SessionPhase};

/// Core Asana errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AsanaError {
    // Configuration errors
    #[error("Posture {posture} references unknown angle {angle}")]
    UnknownAngle { posture: String, angle: AngleId },

    #[error("Posture {0} has no target angles")]
    EmptyPosture(String),

    #[error("Posture {posture} has invalid tolerance {tolerance}")]
    InvalidTolerance { posture: String, tolerance: f64 },

    #[error("Posture {posture}: target {target} for {angle} is outside 0..=180")]
    TargetOutOfRange {
        posture: String,
        angle: AngleId,
        target: f64,
    },

    #[error("Duplicate posture: {0}")]
    DuplicatePosture(String),

    #[error("Unknown posture: {0}")]
    UnknownPosture(String),

    #[error("Posture sequence is empty")]
    EmptySequence,

    #[error("Duplicate angle definition: {0}")]
    DuplicateAngle(AngleId),

    #[error("Angle {0} uses its vertex as an endpoint")]
    DegenerateAngle(AngleId),

    #[error("Confidence threshold {0} is outside 0..=1")]
    InvalidConfidence(f32),

    #[error("Invalid hold threshold: {0}")]
    InvalidHoldThreshold(String),

    #[error("Unknown sequence preset: {0}")]
    UnknownPreset(String),

    // Session errors
    #[error("Cannot {operation} while session is {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: SessionPhase,
    },

    // I/O errors
    #[error("Config I/O error: {0}")]
    ConfigIo(String),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Pose source error: {0}")]
    SourceIo(String),
}

impl AsanaError {
    /// Is this a load-time configuration error?
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            AsanaError::InvalidTransition { .. } | AsanaError::SourceIo(_)
        )
    }
}

/// Result type for Asana operations
pub type AsanaResult<T> = Result<T, AsanaError>;
