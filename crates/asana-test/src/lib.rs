//! Asana Test Harness - Synthetic performers and session simulation
//!
//! This crate provides:
//! - Synthetic skeletons that strike any posture of the standard topology
//! - Tracking noise (jitter, dropped points) with seeded randomness
//! - A frame-accurate session simulator that drives the instructor
//! - Recordings in replay format

pub mod session_sim;
pub mod simulator;

pub use session_sim::*;
pub use simulator::*;
