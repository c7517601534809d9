//! Frame clocks
//!
//! The frame loop reads its clock exactly once per frame.
//! INVARIANT: successive readings never decrease

use std::time::{Duration, Instant};

use asana_core::FrameTime;

/// Source of per-frame timestamps
pub trait FrameClock {
    /// Current time; never earlier than the previous reading
    fn now(&mut self) -> FrameTime;
}

/// Wall clock backed by `Instant`
pub struct MonotonicClock {
    origin: Instant,
    last: FrameTime,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
            last: FrameTime::ZERO,
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MonotonicClock {
    fn now(&mut self) -> FrameTime {
        let elapsed = self.origin.elapsed();
        let t = FrameTime::from_micros(elapsed.as_micros() as u64);
        self.last = self.last.max(t);
        self.last
    }
}

/// Hand-driven clock for replays, simulations and tests
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: FrameTime,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(t: FrameTime) -> Self {
        ManualClock { now: t }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now + dt;
    }

    /// Move to `t`; earlier times are ignored
    pub fn set(&mut self, t: FrameTime) {
        self.now = self.now.max(t);
    }

    pub fn peek(&self) -> FrameTime {
        self.now
    }
}

impl FrameClock for ManualClock {
    fn now(&mut self) -> FrameTime {
        self.now
    }
}
