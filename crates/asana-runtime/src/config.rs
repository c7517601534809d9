//! Instructor configuration
//!
//! Loaded once at startup. `build` performs every configuration check, so a
//! bad catalog or sequence is reported before the first frame is judged.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use asana_core::{AsanaError, AsanaResult};
use asana_pose::{AngleCalculator, PostureCatalog, MIN_CONFIDENCE};
use asana_session::{PostureSequence, SessionController};
use serde::{Deserialize, Serialize};

/// Which postures a session walks through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SequenceConfig {
    /// Named preset (`classic`, `full`)
    Preset(String),
    /// Explicit posture names, in order
    Postures(Vec<String>),
}

impl Default for SequenceConfig {
    fn default() -> Self {
        SequenceConfig::Preset("classic".to_string())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Tracing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorConfig {
    /// Contiguous hold needed to pass a posture (humantime, e.g. "3s", "2500ms")
    #[serde(default = "default_hold_threshold")]
    pub hold_threshold: String,
    /// Points below this confidence are ignored
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    #[serde(default)]
    pub sequence: SequenceConfig,
    /// JSON catalog replacing the built-in yoga postures
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_hold_threshold() -> String {
    "3s".to_string()
}

fn default_min_confidence() -> f32 {
    MIN_CONFIDENCE
}

impl Default for InstructorConfig {
    fn default() -> Self {
        InstructorConfig {
            hold_threshold: default_hold_threshold(),
            min_confidence: default_min_confidence(),
            sequence: SequenceConfig::default(),
            catalog_path: None,
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Everything a session needs, fully validated
#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub catalog: PostureCatalog,
    pub sequence: PostureSequence,
    pub hold_threshold: Duration,
    pub calculator: AngleCalculator,
}

impl SessionPlan {
    pub fn controller(&self) -> AsanaResult<SessionController> {
        SessionController::with_hold_threshold(self.sequence.clone(), self.hold_threshold)
    }
}

impl InstructorConfig {
    pub fn from_json(text: &str) -> AsanaResult<Self> {
        serde_json::from_str(text).map_err(|e| AsanaError::ConfigParse(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> AsanaResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| AsanaError::ConfigIo(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Defaults when the file does not exist; any other failure is an error
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> AsanaResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn hold_threshold(&self) -> AsanaResult<Duration> {
        let hold = humantime::parse_duration(&self.hold_threshold)
            .map_err(|e| AsanaError::InvalidHoldThreshold(format!("{}: {}", self.hold_threshold, e)))?;
        if hold.is_zero() {
            return Err(AsanaError::InvalidHoldThreshold(format!(
                "{}: must be positive",
                self.hold_threshold
            )));
        }
        Ok(hold)
    }

    /// Validate the whole configuration and resolve the session plan
    pub fn build(&self) -> AsanaResult<SessionPlan> {
        let hold_threshold = self.hold_threshold()?;
        let calculator = AngleCalculator::with_min_confidence(self.min_confidence)?;

        let catalog = match &self.catalog_path {
            Some(path) => PostureCatalog::load(path)?,
            None => PostureCatalog::yoga(),
        };

        let sequence = match &self.sequence {
            SequenceConfig::Preset(name) => PostureSequence::preset(&catalog, name)?,
            SequenceConfig::Postures(names) => PostureSequence::new(&catalog, &names[..])?,
        };

        tracing::info!(
            postures = sequence.len(),
            hold = %humantime::format_duration(hold_threshold),
            min_confidence = self.min_confidence,
            "session plan ready"
        );

        Ok(SessionPlan {
            catalog,
            sequence,
            hold_threshold,
            calculator,
        })
    }
}
