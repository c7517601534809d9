//! Synthetic performer - skeletons that strike a posture on demand
//!
//! Each side of the body is built as two chains (shoulder, elbow, wrist and
//! hip, knee, ankle) hanging off a vertical torso. Every segment is rotated
//! away from the previous one by the target joint angle, so with no jitter
//! the measured angles equal the targets up to float precision.
//!
//! Only the standard angle ids (`{left,right}_{elbow,shoulder,hip,knee}`)
//! are understood. Other ids in a posture are ignored.

use std::collections::BTreeMap;

use asana_core::{AngleId, BodyPoint, Landmark, Skeleton};
use asana_pose::PostureDefinition;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Angle used for joints the posture does not constrain
pub const RELAXED_ANGLE: f64 = 170.0;

const HIP_Y: f64 = 0.6;

/// Performer configuration
#[derive(Clone, Debug)]
pub struct PerformerConfig {
    /// Max coordinate noise per point (normalized units)
    pub jitter: f64,
    /// Probability that a point is reported below the confidence threshold
    pub dropout: f64,
    /// Relative variation of segment lengths (body proportions)
    pub proportion_spread: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for PerformerConfig {
    fn default() -> Self {
        Self {
            jitter: 0.0,
            dropout: 0.0,
            proportion_spread: 0.1,
            seed: 0x5EED,
        }
    }
}

impl PerformerConfig {
    /// Exact angles, every point confident
    pub fn perfect(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Noisy tracking with occasional lost points
    pub fn shaky(seed: u64) -> Self {
        Self {
            jitter: 0.004,
            dropout: 0.02,
            proportion_spread: 0.15,
            seed,
        }
    }
}

/// Segment lengths in normalized units
#[derive(Clone, Copy, Debug)]
struct Proportions {
    torso: f64,
    upper_arm: f64,
    forearm: f64,
    thigh: f64,
    shin: f64,
}

#[derive(Clone, Copy, Debug)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn prefix(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    fn hip_x(self) -> f64 {
        match self {
            Side::Left => 0.54,
            Side::Right => 0.46,
        }
    }

    /// Rotation direction, mirrored between sides
    fn turn(self) -> f64 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    /// Hip, shoulder, elbow, wrist, knee, ankle
    fn landmarks(self) -> [Landmark; 6] {
        use Landmark::*;
        match self {
            Side::Left => [LeftHip, LeftShoulder, LeftElbow, LeftWrist, LeftKnee, LeftAnkle],
            Side::Right => [
                RightHip,
                RightShoulder,
                RightElbow,
                RightWrist,
                RightKnee,
                RightAnkle,
            ],
        }
    }
}

type Point = (f64, f64);

/// Place the next joint `length` away from `vertex`, at `degrees` from the
/// direction towards `from`.
fn step(vertex: Point, from: Point, degrees: f64, length: f64, turn: f64) -> Point {
    let (dx, dy) = (from.0 - vertex.0, from.1 - vertex.1);
    let norm = dx.hypot(dy);
    let (ux, uy) = (dx / norm, dy / norm);
    let (sin, cos) = (turn * degrees.to_radians()).sin_cos();
    (
        vertex.0 + (ux * cos - uy * sin) * length,
        vertex.1 + (ux * sin + uy * cos) * length,
    )
}

fn vary(rng: &mut StdRng, base: f64, spread: f64) -> f64 {
    if spread > 0.0 {
        base * (1.0 + rng.gen_range(-spread..=spread))
    } else {
        base
    }
}

/// Produces skeletons for target angle sets
pub struct SyntheticPerformer {
    config: PerformerConfig,
    proportions: Proportions,
    rng: StdRng,
    frames: u64,
}

impl SyntheticPerformer {
    pub fn new(config: PerformerConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let spread = config.proportion_spread.clamp(0.0, 0.5);
        let proportions = Proportions {
            torso: vary(&mut rng, 0.25, spread),
            upper_arm: vary(&mut rng, 0.15, spread),
            forearm: vary(&mut rng, 0.13, spread),
            thigh: vary(&mut rng, 0.2, spread),
            shin: vary(&mut rng, 0.19, spread),
        };

        SyntheticPerformer {
            config,
            proportions,
            rng,
            frames: 0,
        }
    }

    pub fn config(&self) -> &PerformerConfig {
        &self.config
    }

    /// Skeletons produced so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Strike the given joint angles
    pub fn pose(&mut self, targets: &BTreeMap<AngleId, f64>) -> Skeleton {
        let mut skeleton = Skeleton::new();
        for side in [Side::Left, Side::Right] {
            self.build_side(side, targets, &mut skeleton);
        }
        self.frames += 1;
        skeleton
    }

    /// Strike the posture
    pub fn perform(&mut self, posture: &PostureDefinition) -> Skeleton {
        self.pose(&posture.targets)
    }

    /// Strike the posture with every target pushed `offset` degrees away.
    /// Offsets up to 90 always keep the shifted angle inside 0..=180.
    pub fn miss(&mut self, posture: &PostureDefinition, offset: f64) -> Skeleton {
        let shifted = posture
            .targets
            .iter()
            .map(|(angle, &target)| {
                let degrees = if target + offset <= 180.0 {
                    target + offset
                } else {
                    target - offset
                };
                (angle.clone(), degrees.clamp(0.0, 180.0))
            })
            .collect();
        self.pose(&shifted)
    }

    fn build_side(
        &mut self,
        side: Side,
        targets: &BTreeMap<AngleId, f64>,
        skeleton: &mut Skeleton,
    ) {
        let angle = |joint: &str| {
            targets
                .get(&AngleId::new(format!("{}_{}", side.prefix(), joint)))
                .copied()
                .unwrap_or(RELAXED_ANGLE)
        };
        let p = self.proportions;
        let turn = side.turn();

        let hip = (side.hip_x(), HIP_Y);
        let shoulder = (hip.0, hip.1 - p.torso);
        let elbow = step(shoulder, hip, angle("shoulder"), p.upper_arm, turn);
        let wrist = step(elbow, shoulder, angle("elbow"), p.forearm, -turn);
        let knee = step(hip, shoulder, angle("hip"), p.thigh, turn);
        let ankle = step(knee, hip, angle("knee"), p.shin, -turn);

        let positions = [hip, shoulder, elbow, wrist, knee, ankle];
        for (landmark, position) in side.landmarks().into_iter().zip(positions) {
            let point = self.observe(position);
            skeleton.insert(landmark, point);
        }
    }

    /// Apply tracking noise to an exact position
    fn observe(&mut self, (x, y): Point) -> BodyPoint {
        let jitter = self.config.jitter;
        let (x, y) = if jitter > 0.0 {
            (
                x + self.rng.gen_range(-jitter..=jitter),
                y + self.rng.gen_range(-jitter..=jitter),
            )
        } else {
            (x, y)
        };

        let dropout = self.config.dropout.clamp(0.0, 1.0);
        let confidence = if dropout > 0.0 && self.rng.gen_bool(dropout) {
            self.rng.gen_range(0.0f32..0.3)
        } else {
            self.rng.gen_range(0.85f32..=1.0)
        };

        BodyPoint::new(x as f32, y as f32, confidence)
    }
}
