//! Body points and skeletons
//!
//! A skeleton is one tracked person in one frame. It is produced by the pose
//! source, read by the evaluator, and dropped at the end of the frame.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Landmark;

/// Single tracked landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPoint {
    /// Normalized X (0.0 - 1.0, may overshoot at frame edges)
    pub x: f32,
    /// Normalized Y (0.0 - 1.0, grows downward)
    pub y: f32,
    /// Detection confidence (0.0 - 1.0)
    #[serde(alias = "visibility")]
    pub confidence: f32,
}

impl BodyPoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// Is the point confident enough to use?
    #[inline]
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

impl Default for BodyPoint {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            confidence: 0.0,
        }
    }
}

/// All body points of one person in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    points: HashMap<Landmark, BodyPoint>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from points in model output order (index i is `Landmark::from_index(i)`)
    /// Extra trailing points are ignored.
    pub fn from_indexed(points: &[BodyPoint]) -> Self {
        let points = points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| Landmark::from_index(i).map(|l| (l, *p)))
            .collect();
        Skeleton { points }
    }

    pub fn get(&self, landmark: Landmark) -> Option<&BodyPoint> {
        self.points.get(&landmark)
    }

    pub fn insert(&mut self, landmark: Landmark, point: BodyPoint) {
        self.points.insert(landmark, point);
    }

    pub fn with(mut self, landmark: Landmark, point: BodyPoint) -> Self {
        self.insert(landmark, point);
        self
    }

    pub fn remove(&mut self, landmark: Landmark) -> Option<BodyPoint> {
        self.points.remove(&landmark)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Landmark, &BodyPoint)> {
        self.points.iter().map(|(l, p)| (*l, p))
    }
}

impl FromIterator<(Landmark, BodyPoint)> for Skeleton {
    fn from_iter<I: IntoIterator<Item = (Landmark, BodyPoint)>>(iter: I) -> Self {
        Skeleton {
            points: iter.into_iter().collect(),
        }
    }
}
