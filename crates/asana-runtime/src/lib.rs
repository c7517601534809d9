//! Asana Runtime - Guided posture session driver
//!
//! This crate wires the evaluation engine and the session controller into a
//! frame loop, and defines the seams to everything outside the core:
//! - Pose sources (camera + pose estimator, or a recording)
//! - Feedback sinks (renderers)
//! - Control events (start, skip, stop, quit)
//! - Configuration and tracing setup

pub mod config;
pub mod control;
pub mod instructor;
pub mod report;
pub mod source;
pub mod telemetry;

pub use config::*;
pub use control::*;
pub use instructor::*;
pub use report::*;
pub use source::*;
pub use telemetry::*;
