//! Angle calculator - the 2D angle at a vertex
//!
//! Runs once per joint per frame, so it never fails loudly: every
//! unusable input (low confidence, coincident points, non-finite
//! coordinates) comes back as `None`.

use asana_core::{AsanaError, AsanaResult, BodyPoint, Skeleton};

use crate::AngleDefinition;

/// Confidence below which a point is not trusted
pub const MIN_CONFIDENCE: f32 = 0.5;

/// Angle at `vertex` in degrees (0..=180), using the default confidence floor
#[inline]
pub fn compute_angle(a: &BodyPoint, vertex: &BodyPoint, c: &BodyPoint) -> Option<f64> {
    AngleCalculator::new().angle(a, vertex, c)
}

/// Angle calculator with a configurable confidence floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleCalculator {
    min_confidence: f32,
}

impl AngleCalculator {
    pub fn new() -> Self {
        AngleCalculator {
            min_confidence: MIN_CONFIDENCE,
        }
    }

    /// Threshold must lie in 0..=1
    pub fn with_min_confidence(min_confidence: f32) -> AsanaResult<Self> {
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(AsanaError::InvalidConfidence(min_confidence));
        }
        Ok(AngleCalculator { min_confidence })
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    /// Angle between BA and BC, where B is the vertex
    pub fn angle(&self, a: &BodyPoint, vertex: &BodyPoint, c: &BodyPoint) -> Option<f64> {
        if !a.is_confident(self.min_confidence)
            || !vertex.is_confident(self.min_confidence)
            || !c.is_confident(self.min_confidence)
        {
            return None;
        }

        let (bax, bay) = delta(a, vertex);
        let (bcx, bcy) = delta(c, vertex);

        let mag_ba = bax.hypot(bay);
        let mag_bc = bcx.hypot(bcy);
        if !is_usable_magnitude(mag_ba) || !is_usable_magnitude(mag_bc) {
            return None;
        }

        let dot = bax * bcx + bay * bcy;
        // Rounding can push the cosine just past ±1
        let cos_theta = (dot / (mag_ba * mag_bc)).clamp(-1.0, 1.0);
        Some(cos_theta.acos().to_degrees())
    }

    /// Resolve the definition's three landmarks and measure the angle
    /// A missing landmark counts the same as a low-confidence one.
    pub fn measure(&self, skeleton: &Skeleton, def: &AngleDefinition) -> Option<f64> {
        let a = skeleton.get(def.endpoint_a)?;
        let vertex = skeleton.get(def.vertex)?;
        let c = skeleton.get(def.endpoint_c)?;
        self.angle(a, vertex, c)
    }
}

impl Default for AngleCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn delta(p: &BodyPoint, origin: &BodyPoint) -> (f64, f64) {
    (
        p.x as f64 - origin.x as f64,
        p.y as f64 - origin.y as f64,
    )
}

#[inline]
fn is_usable_magnitude(m: f64) -> bool {
    m > 0.0 && m.is_finite()
}
