//! Session controller - hold timer and posture progression
//!
//! ```text
//! NotStarted --start--> InProgress(index, hold) --last posture passed--> Completed
//!      ^                        |                                          |
//!      +-------------------stop-+------------------------------------stop--+
//! ```
//!
//! A posture passes when every target angle stays within tolerance for
//! longer than the hold threshold without a single failed frame in
//! between. A failed frame restarts the hold from zero.

use std::time::Duration;

use asana_core::{AsanaError, AsanaResult, FrameTime, SessionPhase};
use asana_pose::{EvaluationResult, PostureDefinition};
use serde::Serialize;

use crate::PostureSequence;

/// Contiguous hold needed to pass a posture
pub const DEFAULT_HOLD_THRESHOLD: Duration = Duration::from_secs(3);

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// Index into the sequence; equals its length only when completed
    pub posture_index: usize,
    /// When the current unbroken hold began
    pub hold_start: Option<FrameTime>,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickOutcome {
    /// Frame not aligned; any hold was reset
    Misaligned,
    /// Aligned, hold running but not yet long enough
    Holding { held: Duration },
    /// Posture passed, next one is current
    Advanced { from: usize, to: usize },
    /// Last posture passed, session completed
    Completed { from: usize },
}

/// Hold progress for a progress bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoldProgress {
    pub held: Duration,
    pub threshold: Duration,
    /// held / threshold, clamped to 0..=1
    pub fraction: f64,
    /// Whole seconds shown to the user, counting from 1
    pub display_seconds: u64,
}

impl HoldProgress {
    fn new(held: Duration, threshold: Duration) -> Self {
        let fraction = if threshold.is_zero() {
            1.0
        } else {
            (held.as_secs_f64() / threshold.as_secs_f64()).clamp(0.0, 1.0)
        };
        HoldProgress {
            held,
            threshold,
            fraction,
            display_seconds: held.as_secs() + 1,
        }
    }
}

/// Drives a session over a fixed posture sequence
#[derive(Debug, Clone)]
pub struct SessionController {
    sequence: PostureSequence,
    hold_threshold: Duration,
    state: SessionState,
}

impl SessionController {
    /// Controller with the default 3 second hold
    pub fn new(sequence: PostureSequence) -> Self {
        SessionController {
            sequence,
            hold_threshold: DEFAULT_HOLD_THRESHOLD,
            state: SessionState::default(),
        }
    }

    /// Controller with a custom hold; a zero hold is rejected
    pub fn with_hold_threshold(
        sequence: PostureSequence,
        hold_threshold: Duration,
    ) -> AsanaResult<Self> {
        if hold_threshold.is_zero() {
            return Err(AsanaError::InvalidHoldThreshold(
                "hold threshold must be positive".to_string(),
            ));
        }
        Ok(SessionController {
            hold_threshold,
            ..Self::new(sequence)
        })
    }

    /// Begin at the first posture. Only valid before the session has started.
    pub fn start(&mut self) -> AsanaResult<()> {
        self.require_phase(SessionPhase::NotStarted, "start")?;
        self.state = SessionState {
            phase: SessionPhase::InProgress,
            posture_index: 0,
            hold_start: None,
        };
        tracing::info!(
            postures = self.sequence.len(),
            first = %self.sequence.get(0).map(|p| p.name.as_str()).unwrap_or_default(),
            "session started"
        );
        Ok(())
    }

    /// Feed one frame's evaluation
    ///
    /// `now` must be the single timestamp of this frame and must not be
    /// earlier than the previous tick's.
    pub fn tick(&mut self, result: &EvaluationResult, now: FrameTime) -> AsanaResult<TickOutcome> {
        self.tick_aligned(result.all_correct, now)
    }

    /// Feed one frame's aggregate verdict
    pub fn tick_aligned(&mut self, all_correct: bool, now: FrameTime) -> AsanaResult<TickOutcome> {
        self.require_phase(SessionPhase::InProgress, "tick")?;

        if !all_correct {
            if self.state.hold_start.take().is_some() {
                tracing::debug!(index = self.state.posture_index, "hold broken");
            }
            return Ok(TickOutcome::Misaligned);
        }

        let hold_start = match self.state.hold_start {
            Some(t) => t,
            None => {
                tracing::debug!(index = self.state.posture_index, ?now, "hold started");
                self.state.hold_start = Some(now);
                now
            }
        };

        let held = now.saturating_since(hold_start);
        if held > self.hold_threshold {
            Ok(self.advance("held"))
        } else {
            Ok(TickOutcome::Holding { held })
        }
    }

    /// Pass the current posture without holding it
    pub fn skip(&mut self) -> AsanaResult<TickOutcome> {
        self.require_phase(SessionPhase::InProgress, "skip")?;
        Ok(self.advance("skipped"))
    }

    /// Reset to NotStarted from any phase
    pub fn stop(&mut self) {
        if self.state.phase != SessionPhase::NotStarted {
            tracing::info!(
                phase = %self.state.phase,
                index = self.state.posture_index,
                "session stopped"
            );
        }
        self.state = SessionState::default();
    }

    fn advance(&mut self, reason: &'static str) -> TickOutcome {
        let from = self.state.posture_index;
        let to = from + 1;
        self.state.posture_index = to;
        self.state.hold_start = None;

        let name = self
            .sequence
            .get(from)
            .map(|p| p.name.as_str())
            .unwrap_or_default();

        if to >= self.sequence.len() {
            self.state.phase = SessionPhase::Completed;
            tracing::info!(posture = %name, reason, "final posture passed, session completed");
            TickOutcome::Completed { from }
        } else {
            tracing::info!(
                posture = %name,
                reason,
                next = %self.sequence.get(to).map(|p| p.name.as_str()).unwrap_or_default(),
                "posture passed"
            );
            TickOutcome::Advanced { from, to }
        }
    }

    fn require_phase(&self, expected: SessionPhase, operation: &'static str) -> AsanaResult<()> {
        if self.state.phase == expected {
            Ok(())
        } else {
            Err(AsanaError::InvalidTransition {
                operation,
                phase: self.state.phase,
            })
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn posture_index(&self) -> usize {
        self.state.posture_index
    }

    /// Current posture while in progress
    pub fn current_posture(&self) -> Option<&PostureDefinition> {
        match self.state.phase {
            SessionPhase::InProgress => self.sequence.get(self.state.posture_index),
            _ => None,
        }
    }

    /// Postures passed so far in this session
    pub fn completed_count(&self) -> usize {
        match self.state.phase {
            SessionPhase::NotStarted => 0,
            _ => self.state.posture_index,
        }
    }

    /// Progress of the running hold, if any
    pub fn hold_progress(&self, now: FrameTime) -> Option<HoldProgress> {
        self.state
            .hold_start
            .map(|start| HoldProgress::new(now.saturating_since(start), self.hold_threshold))
    }

    pub fn hold_threshold(&self) -> Duration {
        self.hold_threshold
    }

    pub fn sequence(&self) -> &PostureSequence {
        &self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asana_pose::PostureCatalog;
    use proptest::prelude::*;

    fn controller(names: &[&str]) -> SessionController {
        let catalog = PostureCatalog::yoga();
        SessionController::new(PostureSequence::new(&catalog, names).unwrap())
    }

    fn ms(millis: u64) -> FrameTime {
        FrameTime::from_millis(millis)
    }

    fn assert_invariants(c: &SessionController) {
        let s = c.state();
        assert!(s.posture_index <= c.sequence().len());
        assert_eq!(
            s.posture_index == c.sequence().len(),
            s.phase == SessionPhase::Completed
        );
        if s.hold_start.is_some() {
            assert_eq!(s.phase, SessionPhase::InProgress);
        }
    }

    #[test]
    fn test_initial_state() {
        let c = controller(&["TREE"]);
        assert_eq!(c.state(), SessionState::default());
        assert_eq!(c.phase(), SessionPhase::NotStarted);
        assert!(c.current_posture().is_none());
        assert_eq!(c.hold_threshold(), DEFAULT_HOLD_THRESHOLD);
    }

    #[test]
    fn test_start() {
        let mut c = controller(&["TREE", "BOAT"]);
        c.start().unwrap();
        assert_eq!(c.phase(), SessionPhase::InProgress);
        assert_eq!(c.posture_index(), 0);
        assert_eq!(c.current_posture().unwrap().name, "TREE");
        assert_eq!(c.state().hold_start, None);
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut c = controller(&["TREE"]);
        c.start().unwrap();
        assert_eq!(
            c.start().unwrap_err(),
            AsanaError::InvalidTransition {
                operation: "start",
                phase: SessionPhase::InProgress,
            }
        );
    }

    #[test]
    fn test_tick_and_skip_require_progress() {
        let mut c = controller(&["TREE"]);
        assert!(c.tick_aligned(true, ms(0)).is_err());
        assert!(c.skip().is_err());
        assert_eq!(c.state(), SessionState::default());
    }

    #[test]
    fn test_hold_below_threshold_does_not_advance() {
        let mut c = controller(&["TREE", "BOAT"]);
        c.start().unwrap();

        for t in (0..=3000).step_by(100) {
            let outcome = c.tick_aligned(true, ms(t)).unwrap();
            assert_eq!(
                outcome,
                TickOutcome::Holding {
                    held: Duration::from_millis(t)
                }
            );
        }
        // Exactly at the threshold is not enough
        assert_eq!(c.posture_index(), 0);
        assert_eq!(c.state().hold_start, Some(ms(0)));
    }

    #[test]
    fn test_hold_past_threshold_advances_once() {
        let mut c = controller(&["TREE", "BOAT"]);
        c.start().unwrap();

        c.tick_aligned(true, ms(1000)).unwrap();
        c.tick_aligned(true, ms(3000)).unwrap();
        let outcome = c.tick_aligned(true, ms(4001)).unwrap();
        assert_eq!(outcome, TickOutcome::Advanced { from: 0, to: 1 });
        assert_eq!(c.posture_index(), 1);
        assert_eq!(c.state().hold_start, None);
        assert_eq!(c.current_posture().unwrap().name, "BOAT");

        // Next aligned frame begins a fresh hold
        assert_eq!(
            c.tick_aligned(true, ms(4100)).unwrap(),
            TickOutcome::Holding {
                held: Duration::ZERO
            }
        );
        assert_eq!(c.state().hold_start, Some(ms(4100)));
    }

    #[test]
    fn test_interruption_resets_hold() {
        let mut c = controller(&["TREE", "BOAT"]);
        c.start().unwrap();

        c.tick_aligned(true, ms(0)).unwrap();
        c.tick_aligned(true, ms(2500)).unwrap();
        assert_eq!(c.tick_aligned(false, ms(2600)).unwrap(), TickOutcome::Misaligned);
        assert_eq!(c.state().hold_start, None);

        // 4.5s of wall time since the first aligned frame, but only 1.9s contiguous
        let outcome = c.tick_aligned(true, ms(2700)).unwrap();
        assert_eq!(outcome, TickOutcome::Holding { held: Duration::ZERO });
        let outcome = c.tick_aligned(true, ms(4600)).unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Holding {
                held: Duration::from_millis(1900)
            }
        );
        assert_eq!(c.posture_index(), 0);

        let outcome = c.tick_aligned(true, ms(5701)).unwrap();
        assert_eq!(outcome, TickOutcome::Advanced { from: 0, to: 1 });
    }

    #[test]
    fn test_tick_with_evaluation_result() {
        let mut c = controller(&["TREE"]);
        c.start().unwrap();
        let aligned = EvaluationResult {
            verdicts: Vec::new(),
            all_correct: true,
        };
        c.tick(&aligned, ms(0)).unwrap();
        assert_eq!(c.state().hold_start, Some(ms(0)));
        c.tick(&EvaluationResult::absent(), ms(10)).unwrap();
        assert_eq!(c.state().hold_start, None);
    }

    #[test]
    fn test_skip_advances_and_clears_hold() {
        let mut c = controller(&["TREE", "BOAT", "TABLE"]);
        c.start().unwrap();
        c.tick_aligned(true, ms(0)).unwrap();
        c.tick_aligned(true, ms(2000)).unwrap();

        assert_eq!(c.skip().unwrap(), TickOutcome::Advanced { from: 0, to: 1 });
        assert_eq!(c.posture_index(), 1);
        assert_eq!(c.state().hold_start, None);

        assert_eq!(c.skip().unwrap(), TickOutcome::Advanced { from: 1, to: 2 });
        assert_eq!(c.skip().unwrap(), TickOutcome::Completed { from: 2 });
        assert_eq!(c.phase(), SessionPhase::Completed);
        assert_eq!(c.posture_index(), 3);
        assert_invariants(&c);
    }

    #[test]
    fn test_completion_is_terminal_until_stop() {
        let mut c = controller(&["TREE"]);
        c.start().unwrap();
        c.tick_aligned(true, ms(0)).unwrap();
        assert_eq!(
            c.tick_aligned(true, ms(3001)).unwrap(),
            TickOutcome::Completed { from: 0 }
        );
        assert_eq!(c.phase(), SessionPhase::Completed);
        assert_eq!(c.completed_count(), 1);
        assert!(c.current_posture().is_none());

        assert!(c.tick_aligned(true, ms(4000)).is_err());
        assert!(c.skip().is_err());
        assert!(c.start().is_err());
        assert_eq!(c.phase(), SessionPhase::Completed);

        c.stop();
        assert_eq!(c.state(), SessionState::default());
        c.start().unwrap();
        assert_eq!(c.posture_index(), 0);
    }

    #[test]
    fn test_stop_discards_progress() {
        let mut c = controller(&["TREE", "BOAT"]);
        c.start().unwrap();
        c.skip().unwrap();
        c.tick_aligned(true, ms(100)).unwrap();
        c.stop();
        assert_eq!(c.state(), SessionState::default());
        assert_eq!(c.completed_count(), 0);

        // Stopping an idle session is harmless
        c.stop();
        assert_eq!(c.phase(), SessionPhase::NotStarted);
    }

    #[test]
    fn test_hold_progress() {
        let mut c = controller(&["TREE", "BOAT"]);
        c.start().unwrap();
        assert!(c.hold_progress(ms(0)).is_none());

        c.tick_aligned(true, ms(1000)).unwrap();
        let progress = c.hold_progress(ms(2500)).unwrap();
        assert_eq!(progress.held, Duration::from_millis(1500));
        assert!((progress.fraction - 0.5).abs() < 1e-9);
        assert_eq!(progress.display_seconds, 2);

        let progress = c.hold_progress(ms(9000)).unwrap();
        assert_eq!(progress.fraction, 1.0);
    }

    #[test]
    fn test_non_monotonic_now_saturates() {
        let mut c = controller(&["TREE"]);
        c.start().unwrap();
        c.tick_aligned(true, ms(500)).unwrap();
        assert_eq!(
            c.tick_aligned(true, ms(100)).unwrap(),
            TickOutcome::Holding {
                held: Duration::ZERO
            }
        );
    }

    #[test]
    fn test_custom_hold_threshold() {
        let catalog = PostureCatalog::yoga();
        let seq = PostureSequence::new(&catalog, &["TREE", "BOAT"]).unwrap();
        let mut c = SessionController::with_hold_threshold(seq.clone(), Duration::from_millis(500))
            .unwrap();
        c.start().unwrap();
        c.tick_aligned(true, ms(0)).unwrap();
        assert_eq!(
            c.tick_aligned(true, ms(501)).unwrap(),
            TickOutcome::Advanced { from: 0, to: 1 }
        );

        assert!(SessionController::with_hold_threshold(seq, Duration::ZERO).is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Start,
        Stop,
        Skip,
        Tick { aligned: bool, dt_ms: u64 },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            1 => Just(Op::Start),
            1 => Just(Op::Stop),
            2 => Just(Op::Skip),
            12 => (any::<bool>(), 0u64..2000).prop_map(|(aligned, dt_ms)| Op::Tick { aligned, dt_ms }),
        ]
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(ops in proptest::collection::vec(op(), 0..200)) {
            let mut c = controller(&["TREE", "BOAT", "TABLE"]);
            let mut now = 0u64;
            for op in ops {
                match op {
                    Op::Start => { let _ = c.start(); }
                    Op::Stop => c.stop(),
                    Op::Skip => { let _ = c.skip(); }
                    Op::Tick { aligned, dt_ms } => {
                        now += dt_ms;
                        let before = c.state();
                        match c.tick_aligned(aligned, ms(now)) {
                            Ok(TickOutcome::Advanced { from, to }) => {
                                prop_assert_eq!(from, before.posture_index);
                                prop_assert_eq!(to, from + 1);
                            }
                            Ok(TickOutcome::Misaligned) => {
                                prop_assert_eq!(c.state().hold_start, None);
                            }
                            Ok(_) => {}
                            Err(_) => {
                                prop_assert_ne!(before.phase, SessionPhase::InProgress);
                            }
                        }
                    }
                }
                let s = c.state();
                prop_assert!(s.posture_index <= 3);
                prop_assert_eq!(s.posture_index == 3, s.phase == SessionPhase::Completed);
                if s.hold_start.is_some() {
                    prop_assert_eq!(s.phase, SessionPhase::InProgress);
                }
            }
        }
    }
}
