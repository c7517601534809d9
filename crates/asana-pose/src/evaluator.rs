//! Posture evaluator - one skeleton against one posture
//!
//! Pure function of its inputs. A frame is correct only when every target
//! angle was measured and lies within tolerance; there is no partial credit
//! and no weighting between joints.

use std::collections::BTreeMap;

use asana_core::{AngleId, AsanaError, AsanaResult, Landmark, Skeleton};
use serde::Serialize;

use crate::{AngleCalculator, AngleTopology, PostureCatalog, PostureDefinition};

/// Judgment for a single target angle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleVerdict {
    pub angle: AngleId,
    /// Vertex landmark, where a renderer draws the joint marker
    pub vertex: Landmark,
    pub target: f64,
    /// `None` when a point was missing, unconfident or degenerate
    pub measured: Option<f64>,
    pub within_tolerance: bool,
}

impl AngleVerdict {
    /// Absolute deviation from target, if measured
    pub fn deviation(&self) -> Option<f64> {
        self.measured.map(|m| (m - self.target).abs())
    }
}

/// Per-frame evaluation of one posture
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EvaluationResult {
    pub verdicts: Vec<AngleVerdict>,
    pub all_correct: bool,
}

impl EvaluationResult {
    /// Frame with no detected person
    pub fn absent() -> Self {
        EvaluationResult {
            verdicts: Vec::new(),
            all_correct: false,
        }
    }

    /// Correctness per vertex landmark, for joint colour coding
    /// A vertex shared by several angles is correct only if all of them are.
    pub fn joint_feedback(&self) -> BTreeMap<Landmark, bool> {
        let mut joints = BTreeMap::new();
        for verdict in &self.verdicts {
            joints
                .entry(verdict.vertex)
                .and_modify(|ok: &mut bool| *ok &= verdict.within_tolerance)
                .or_insert(verdict.within_tolerance);
        }
        joints
    }

    /// Verdicts that failed
    pub fn misaligned(&self) -> impl Iterator<Item = &AngleVerdict> {
        self.verdicts.iter().filter(|v| !v.within_tolerance)
    }

    pub fn measured_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.measured.is_some()).count()
    }
}

/// Inclusive tolerance check: `|measured - target| <= tolerance`
#[inline]
pub fn within_tolerance(measured: f64, target: f64, tolerance: f64) -> bool {
    (measured - target).abs() <= tolerance
}

/// Evaluates skeletons against postures of a fixed topology
#[derive(Debug, Clone)]
pub struct PostureEvaluator {
    topology: AngleTopology,
    calculator: AngleCalculator,
}

impl PostureEvaluator {
    pub fn new(topology: AngleTopology) -> Self {
        Self::with_calculator(topology, AngleCalculator::new())
    }

    pub fn with_calculator(topology: AngleTopology, calculator: AngleCalculator) -> Self {
        PostureEvaluator {
            topology,
            calculator,
        }
    }

    /// Evaluator over the catalog's topology
    pub fn for_catalog(catalog: &PostureCatalog) -> Self {
        Self::new(catalog.topology().clone())
    }

    pub fn topology(&self) -> &AngleTopology {
        &self.topology
    }

    pub fn calculator(&self) -> &AngleCalculator {
        &self.calculator
    }

    /// Judge one skeleton against one posture
    ///
    /// Fails only if the posture names an angle outside the topology, which a
    /// validated catalog rules out. Missing evidence is never an error.
    pub fn evaluate(
        &self,
        skeleton: &Skeleton,
        posture: &PostureDefinition,
    ) -> AsanaResult<EvaluationResult> {
        let mut verdicts = Vec::with_capacity(posture.targets.len());

        for (angle, &target) in &posture.targets {
            let def = self
                .topology
                .get(angle)
                .ok_or_else(|| AsanaError::UnknownAngle {
                    posture: posture.name.clone(),
                    angle: angle.clone(),
                })?;

            let measured = self.calculator.measure(skeleton, def);
            let within = measured.is_some_and(|m| within_tolerance(m, target, posture.tolerance));

            verdicts.push(AngleVerdict {
                angle: angle.clone(),
                vertex: def.vertex,
                target,
                measured,
                within_tolerance: within,
            });
        }

        // An empty target set is never vacuously correct
        let all_correct = !verdicts.is_empty() && verdicts.iter().all(|v| v.within_tolerance);

        Ok(EvaluationResult {
            verdicts,
            all_correct,
        })
    }
}
