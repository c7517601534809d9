//! Asana Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every stage of the posture pipeline:
//! - Identifiers (Landmark, AngleId)
//! - Body points and skeletons (BodyPoint, Skeleton)
//! - Frame time (FrameTime)
//! - Session phases
//! - The error taxonomy

pub mod error;
pub mod id;
pub mod phase;
pub mod point;
pub mod time;

pub use error::*;
pub use id::*;
pub use phase::*;
pub use point::*;
pub use time::*;
