//! Asana Pose - Posture evaluation engine
//!
//! Turns one skeleton into one pass/fail judgment against a target posture:
//! - Angle topology: which three landmarks define each joint angle
//! - Angle calculator: the 2D angle at a vertex, gated on confidence
//! - Posture catalog: target angles plus a shared tolerance per posture
//! - Posture evaluator: per-angle verdicts and the all-correct aggregate
//!
//! Everything here is pure computation over in-memory values. Nothing is
//! retained between frames.

pub mod angle;
pub mod catalog;
pub mod evaluator;
pub mod topology;
pub mod yoga;

pub use angle::*;
pub use catalog::*;
pub use evaluator::*;
pub use topology::*;
pub use yoga::*;
