//! Asana Session - Guided posture progression
//!
//! This crate turns per-frame judgments into progress:
//! - Posture sequences: the ordered, validated list a session walks through
//! - Session controller: hold timer, advancement, skip and completion
//! - Frame clocks: one monotonic timestamp per frame

pub mod clock;
pub mod controller;
pub mod sequence;

pub use clock::*;
pub use controller::*;
pub use sequence::*;
