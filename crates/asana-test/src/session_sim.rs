//! Session simulator - drives an instructor with synthetic frames
//!
//! Frames are spaced at a whole number of milliseconds on a manual clock,
//! so a scenario always produces the same outcomes and its recording
//! replays exactly.

use std::collections::BTreeMap;
use std::mem;
use std::time::Duration;

use asana_core::{AsanaResult, BodyPoint, FrameTime, Landmark, SessionPhase, Skeleton};
use asana_runtime::{
    ControlEvent, FrameReport, Instructor, InstructorStats, RecordedFrame, SessionPlan,
    SourceFrame,
};
use asana_session::{FrameClock, ManualClock};

use crate::SyntheticPerformer;

/// What the simulated person does in front of the camera
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behavior {
    /// Strike the current posture
    Perform,
    /// Strike the current posture off by the given degrees
    Miss(f64),
    /// Leave the frame
    Absent,
}

/// Outcome of a simulated run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationSummary {
    pub frames: u64,
    pub postures_held: u64,
    pub postures_skipped: u64,
    pub completed: bool,
    pub elapsed: Duration,
}

/// Runs an instructor against a synthetic performer
pub struct SessionSimulator {
    instructor: Instructor,
    performer: SyntheticPerformer,
    clock: ManualClock,
    frame_interval: Duration,
    recording: Vec<RecordedFrame>,
    pending_controls: Vec<ControlEvent>,
    last_report: Option<FrameReport>,
}

impl SessionSimulator {
    /// `fps` is rounded to a whole-millisecond frame interval
    pub fn new(plan: &SessionPlan, performer: SyntheticPerformer, fps: u32) -> AsanaResult<Self> {
        let interval_ms = (1000 / fps.clamp(1, 1000)) as u64;
        Ok(SessionSimulator {
            instructor: Instructor::new(plan)?,
            performer,
            clock: ManualClock::new(),
            frame_interval: Duration::from_millis(interval_ms),
            recording: Vec::new(),
            pending_controls: Vec::new(),
            last_report: None,
        })
    }

    pub fn instructor(&self) -> &Instructor {
        &self.instructor
    }

    pub fn stats(&self) -> &InstructorStats {
        self.instructor.stats()
    }

    pub fn phase(&self) -> SessionPhase {
        self.instructor.session().phase()
    }

    pub fn posture_index(&self) -> usize {
        self.instructor.session().posture_index()
    }

    pub fn now(&self) -> FrameTime {
        self.clock.peek()
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn last_report(&self) -> Option<&FrameReport> {
        self.last_report.as_ref()
    }

    /// Every frame fed to the instructor, in replay format
    pub fn recording(&self) -> &[RecordedFrame] {
        &self.recording
    }

    /// Issue a control; it takes effect on the next frame
    pub fn control(&mut self, event: ControlEvent) {
        self.instructor.controls().push(event);
        self.pending_controls.push(event);
    }

    /// Feed one frame and advance the clock by one interval
    pub fn frame(&mut self, behavior: Behavior) -> AsanaResult<&FrameReport> {
        let skeleton = match behavior {
            Behavior::Absent => None,
            Behavior::Perform | Behavior::Miss(_) => {
                let posture = self.instructor.session().current_posture();
                Some(match (posture, behavior) {
                    (Some(p), Behavior::Miss(offset)) => self.performer.miss(p, offset),
                    (Some(p), _) => self.performer.perform(p),
                    (None, _) => self.performer.pose(&BTreeMap::new()),
                })
            }
        };

        let now = self.clock.now();
        self.recording.push(RecordedFrame {
            t_ms: Some(now.as_millis()),
            points: skeleton.as_ref().map(indexed_points),
            controls: mem::take(&mut self.pending_controls),
        });

        let source_frame = match skeleton {
            Some(skeleton) => SourceFrame::person(skeleton),
            None => SourceFrame::empty(),
        };
        let report = self.instructor.step(&source_frame, now)?;
        self.clock.advance(self.frame_interval);
        Ok(&*self.last_report.insert(report))
    }

    /// Keep the same behavior for `duration` (at least one frame)
    pub fn act(&mut self, behavior: Behavior, duration: Duration) -> AsanaResult<u64> {
        let interval = self.frame_interval.as_micros().max(1);
        let frames = duration.as_micros().div_ceil(interval).max(1) as u64;
        for _ in 0..frames {
            self.frame(behavior)?;
        }
        Ok(frames)
    }

    /// Start the session and perform each posture until it is held
    ///
    /// Gives up when a posture has not advanced within `patience`.
    pub fn perform_session(&mut self, patience: Duration) -> AsanaResult<SimulationSummary> {
        let started_at = self.now();
        let frames_before = self.stats().frames;

        self.control(ControlEvent::Start);
        self.frame(Behavior::Perform)?;
        while self.phase() == SessionPhase::InProgress {
            let index = self.posture_index();
            let deadline = self.now() + patience;
            while self.phase() == SessionPhase::InProgress
                && self.posture_index() == index
                && self.now() < deadline
            {
                self.frame(Behavior::Perform)?;
            }
            if self.phase() == SessionPhase::InProgress && self.posture_index() == index {
                break;
            }
        }

        let stats = self.stats();
        let summary = SimulationSummary {
            frames: stats.frames - frames_before,
            postures_held: stats.postures_held,
            postures_skipped: stats.postures_skipped,
            completed: self.phase() == SessionPhase::Completed,
            elapsed: self.now() - started_at,
        };
        tracing::debug!(
            frames = summary.frames,
            held = summary.postures_held,
            completed = summary.completed,
            "simulated session"
        );
        Ok(summary)
    }
}

/// Points in model output order; missing landmarks get zero confidence
pub fn indexed_points(skeleton: &Skeleton) -> Vec<BodyPoint> {
    Landmark::ALL
        .iter()
        .map(|&landmark| skeleton.get(landmark).copied().unwrap_or_default())
        .collect()
}
