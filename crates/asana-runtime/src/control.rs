//! Control events
//!
//! Input handling lives outside the core. Whatever thread reads the keyboard
//! or remote posts events here; the instructor applies them at the start of
//! its next frame.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Discrete control signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlEvent {
    /// Begin the session
    Start,
    /// Pass the current posture without holding it
    Skip,
    /// Abandon the session and reset
    Stop,
    /// Leave the frame loop
    Quit,
}

/// Shared FIFO of control events
#[derive(Debug, Clone, Default)]
pub struct ControlQueue {
    inner: Arc<Mutex<VecDeque<ControlEvent>>>,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: ControlEvent) {
        self.inner.lock().push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&self) -> Vec<ControlEvent> {
        self.inner.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
