//! Instructor - the per-frame loop
//!
//! Each frame:
//! 1. Apply queued control events
//! 2. Evaluate the current posture (if in progress and a person is visible)
//! 3. Tick the session with the frame's single timestamp
//! 4. Build the report for the renderer

use asana_core::{AsanaResult, FrameTime, SessionPhase};
use asana_pose::{EvaluationResult, PostureEvaluator};
use asana_session::{FrameClock, SessionController, TickOutcome};

use crate::{
    ControlEvent, ControlQueue, FeedbackSink, FrameReport, PoseSource, PostureBanner,
    SessionPlan, SourceFrame,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstructorStats {
    pub frames: u64,
    pub frames_without_person: u64,
    pub aligned_frames: u64,
    pub postures_held: u64,
    pub postures_skipped: u64,
    pub sessions_completed: u64,
    pub controls_ignored: u64,
}

/// Why `run` returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    SourceEnded,
    Quit,
    /// The source failed; the loop ends like a closed camera
    SourceError(String),
}

/// Drives evaluation and session progression frame by frame
pub struct Instructor {
    evaluator: PostureEvaluator,
    session: SessionController,
    controls: ControlQueue,
    stats: InstructorStats,
    quit: bool,
}

impl Instructor {
    pub fn new(plan: &SessionPlan) -> AsanaResult<Self> {
        let evaluator =
            PostureEvaluator::with_calculator(plan.catalog.topology().clone(), plan.calculator);
        Ok(Self::from_parts(evaluator, plan.controller()?))
    }

    pub fn from_parts(evaluator: PostureEvaluator, session: SessionController) -> Self {
        Instructor {
            evaluator,
            session,
            controls: ControlQueue::new(),
            stats: InstructorStats::default(),
            quit: false,
        }
    }

    /// Handle for posting control events from elsewhere
    pub fn controls(&self) -> ControlQueue {
        self.controls.clone()
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn stats(&self) -> &InstructorStats {
        &self.stats
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Process one frame at one instant
    pub fn step(&mut self, frame: &SourceFrame, now: FrameTime) -> AsanaResult<FrameReport> {
        for event in self.controls.drain() {
            self.apply_control(event);
        }

        self.stats.frames += 1;
        if frame.skeleton.is_none() {
            self.stats.frames_without_person += 1;
        }

        let (evaluation, outcome) = if self.session.phase() == SessionPhase::InProgress {
            let evaluation = match (&frame.skeleton, self.session.current_posture()) {
                (Some(skeleton), Some(posture)) => self.evaluator.evaluate(skeleton, posture)?,
                _ => EvaluationResult::absent(),
            };
            if evaluation.all_correct {
                self.stats.aligned_frames += 1;
            }
            let outcome = self.session.tick(&evaluation, now)?;
            self.record(outcome, false);
            (Some(evaluation), Some(outcome))
        } else {
            (None, None)
        };

        Ok(FrameReport {
            time: now,
            state: self.session.state(),
            posture: self.banner(),
            person_detected: frame.skeleton.is_some(),
            evaluation,
            outcome,
            hold: self.session.hold_progress(now),
        })
    }

    /// Run until the source ends or a quit event arrives
    pub fn run<S, K, C>(&mut self, source: &mut S, sink: &mut K, clock: &mut C) -> AsanaResult<StopReason>
    where
        S: PoseSource,
        K: FeedbackSink,
        C: FrameClock,
    {
        loop {
            if self.quit {
                return Ok(StopReason::Quit);
            }
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => return Ok(StopReason::SourceEnded),
                Err(e) => {
                    tracing::warn!("pose source failed: {}", e);
                    return Ok(StopReason::SourceError(e.to_string()));
                }
            };
            let now = clock.now();
            let report = self.step(&frame, now)?;
            sink.present(&report);
        }
    }

    fn apply_control(&mut self, event: ControlEvent) {
        let applied = match event {
            ControlEvent::Start => self.session.start().map(|_| ()),
            ControlEvent::Skip => self.session.skip().map(|outcome| self.record(outcome, true)),
            ControlEvent::Stop => {
                self.session.stop();
                Ok(())
            }
            ControlEvent::Quit => {
                tracing::info!("quit requested");
                self.quit = true;
                Ok(())
            }
        };
        if let Err(e) = applied {
            tracing::debug!(?event, "control ignored: {}", e);
            self.stats.controls_ignored += 1;
        }
    }

    fn record(&mut self, outcome: TickOutcome, skipped: bool) {
        let passed = matches!(
            outcome,
            TickOutcome::Advanced { .. } | TickOutcome::Completed { .. }
        );
        if passed {
            if skipped {
                self.stats.postures_skipped += 1;
            } else {
                self.stats.postures_held += 1;
            }
        }
        if matches!(outcome, TickOutcome::Completed { .. }) {
            self.stats.sessions_completed += 1;
        }
    }

    fn banner(&self) -> Option<PostureBanner> {
        let posture = self.session.current_posture()?;
        Some(PostureBanner {
            name: posture.name.clone(),
            display_name: posture.display_name(),
            number: self.session.posture_index() + 1,
            total: self.session.sequence().len(),
        })
    }
}
