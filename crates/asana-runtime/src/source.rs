//! Collaborator seams: pose sources in, feedback sinks out
//!
//! Camera capture, pose estimation and drawing all live behind these
//! traits. The instructor only sees skeletons and emits reports.

use std::collections::VecDeque;
use std::io::BufRead;

use asana_core::{AsanaError, AsanaResult, BodyPoint, FrameTime, Skeleton};
use serde::{Deserialize, Serialize};

use crate::{ControlEvent, ControlQueue, FrameReport};

/// One frame from the pose source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFrame {
    /// `None` when no person was detected
    pub skeleton: Option<Skeleton>,
}

impl SourceFrame {
    pub fn person(skeleton: Skeleton) -> Self {
        SourceFrame {
            skeleton: Some(skeleton),
        }
    }

    pub fn empty() -> Self {
        SourceFrame { skeleton: None }
    }
}

/// Supplies one frame per call
pub trait PoseSource {
    /// `Ok(None)` when the source has ended
    fn next_frame(&mut self) -> AsanaResult<Option<SourceFrame>>;
}

/// Consumes one report per frame
pub trait FeedbackSink {
    fn present(&mut self, report: &FrameReport);
}

/// Pre-built frames, served in order
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    frames: VecDeque<SourceFrame>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = SourceFrame>) -> Self {
        ScriptedSource {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl PoseSource for ScriptedSource {
    fn next_frame(&mut self) -> AsanaResult<Option<SourceFrame>> {
        Ok(self.frames.pop_front())
    }
}

/// Keeps every report it is given
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub reports: Vec<FrameReport>,
}

impl FeedbackSink for RecordingSink {
    fn present(&mut self, report: &FrameReport) {
        self.reports.push(report.clone());
    }
}

/// One line of a recorded session (JSON Lines)
///
/// ```json
/// {"t_ms": 0, "controls": ["start"], "points": null}
/// {"t_ms": 33, "points": [{"x": 0.51, "y": 0.12, "confidence": 0.98}, ...]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Capture time in milliseconds
    #[serde(default)]
    pub t_ms: Option<u64>,
    /// Points in model output order; `null` when nobody was detected
    #[serde(default)]
    pub points: Option<Vec<BodyPoint>>,
    /// Control events issued just before this frame
    #[serde(default)]
    pub controls: Vec<ControlEvent>,
}

impl RecordedFrame {
    pub fn timestamp(&self) -> Option<FrameTime> {
        self.t_ms.map(FrameTime::from_millis)
    }

    pub fn to_source_frame(&self) -> SourceFrame {
        SourceFrame {
            skeleton: self.points.as_deref().map(Skeleton::from_indexed),
        }
    }
}

/// Reads recorded frames from JSON Lines
///
/// Blank lines are skipped. When a control queue is attached, each frame's
/// control events are posted to it as the frame is read.
pub struct ReplaySource<R> {
    reader: R,
    line: usize,
    controls: Option<ControlQueue>,
    last_timestamp: Option<FrameTime>,
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        ReplaySource {
            reader,
            line: 0,
            controls: None,
            last_timestamp: None,
        }
    }

    pub fn with_controls(mut self, controls: ControlQueue) -> Self {
        self.controls = Some(controls);
        self
    }

    /// Timestamp of the most recently read frame
    pub fn last_timestamp(&self) -> Option<FrameTime> {
        self.last_timestamp
    }

    /// Next record, `Ok(None)` at end of input
    pub fn next_record(&mut self) -> AsanaResult<Option<RecordedFrame>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            let read = self
                .reader
                .read_line(&mut buf)
                .map_err(|e| AsanaError::SourceIo(e.to_string()))?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;
            if buf.trim().is_empty() {
                continue;
            }
            let record: RecordedFrame = serde_json::from_str(buf.trim())
                .map_err(|e| AsanaError::SourceIo(format!("line {}: {}", self.line, e)))?;
            if let Some(t_ms) = record.t_ms {
                let t = FrameTime::checked_from_millis(t_ms).ok_or_else(|| {
                    AsanaError::SourceIo(format!("line {}: timestamp out of range", self.line))
                })?;
                self.last_timestamp = Some(t);
            }
            return Ok(Some(record));
        }
    }
}

impl<R: BufRead> PoseSource for ReplaySource<R> {
    fn next_frame(&mut self) -> AsanaResult<Option<SourceFrame>> {
        let Some(record) = self.next_record()? else {
            return Ok(None);
        };
        if let Some(queue) = &self.controls {
            for event in &record.controls {
                queue.push(*event);
            }
        }
        Ok(Some(record.to_source_frame()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asana_core::Landmark;
    use std::io::Cursor;

    #[test]
    fn test_scripted_source() {
        let mut source = ScriptedSource::new(vec![SourceFrame::empty(), SourceFrame::empty()]);
        assert_eq!(source.remaining(), 2);
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_replay_source() {
        let input = concat!(
            "{\"t_ms\": 0, \"controls\": [\"start\"], \"points\": null}\n",
            "\n",
            "{\"t_ms\": 40, \"points\": [{\"x\": 0.5, \"y\": 0.1, \"confidence\": 0.9}]}\n",
        );
        let queue = ControlQueue::new();
        let mut source = ReplaySource::new(Cursor::new(input)).with_controls(queue.clone());

        let first = source.next_frame().unwrap().unwrap();
        assert!(first.skeleton.is_none());
        assert_eq!(queue.drain(), vec![ControlEvent::Start]);
        assert_eq!(source.last_timestamp(), Some(FrameTime::ZERO));

        let second = source.next_frame().unwrap().unwrap();
        let skeleton = second.skeleton.unwrap();
        assert_eq!(skeleton.len(), 1);
        assert_eq!(skeleton.get(Landmark::Nose).unwrap().confidence, 0.9);
        assert_eq!(source.last_timestamp(), Some(FrameTime::from_millis(40)));

        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_replay_source_bad_line() {
        let mut source = ReplaySource::new(Cursor::new("{\"t_ms\": 0}\nnot json\n"));
        assert!(source.next_frame().unwrap().is_some());
        let err = source.next_frame().unwrap_err();
        assert!(matches!(err, AsanaError::SourceIo(ref msg) if msg.starts_with("line 2")));
    }

    #[test]
    fn test_replay_source_timestamp_out_of_range() {
        let input = format!(
            "{{\"t_ms\": 40, \"points\": null}}\n{{\"t_ms\": {}, \"points\": null}}\n",
            u64::MAX
        );
        let mut source = ReplaySource::new(Cursor::new(input));
        assert!(source.next_frame().unwrap().is_some());
        assert_eq!(source.last_timestamp(), Some(FrameTime::from_millis(40)));

        let err = source.next_frame().unwrap_err();
        assert_eq!(
            err,
            AsanaError::SourceIo("line 2: timestamp out of range".to_string())
        );
        assert_eq!(source.last_timestamp(), Some(FrameTime::from_millis(40)));
    }
}
