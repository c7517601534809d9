//! Built-in yoga postures and sequence presets
//!
//! Asymmetric postures list only the side the reference instructor checks
//! (usually the left). That is catalog content, not an engine rule.

use crate::PostureDefinition;

/// Tolerance used by every built-in posture
pub const YOGA_TOLERANCE: f64 = 40.0;

/// Short session: 13 postures
pub const CLASSIC_SEQUENCE: &[&str] = &[
    "EASY_POSE",
    "TABLE",
    "DOWNWARD_DOG",
    "SEATED_FORWARD_BEND",
    "SQUAT",
    "SIDE_PLANK",
    "TREE",
    "WARRIOR_1",
    "WARRIOR_2",
    "WARRIOR_3",
    "WARRIOR_4",
    "EXTENDED_TRIANGLE",
    "BOAT",
];

/// Full session: every built-in posture
pub const FULL_SEQUENCE: &[&str] = &[
    "EASY_POSE",
    "TABLE",
    "DOWNWARD_DOG",
    "UPWARD_DOG",
    "STANDING_FORWARD_BEND",
    "SEATED_FORWARD_BEND",
    "SQUAT",
    "PUSH_UP",
    "SIDE_PLANK",
    "TREE",
    "WARRIOR_1",
    "WARRIOR_2",
    "WARRIOR_3",
    "WARRIOR_4",
    "EXTENDED_TRIANGLE",
    "BOAT",
];

/// Look up a sequence preset by name
pub fn preset(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "classic" => Some(CLASSIC_SEQUENCE),
        "full" => Some(FULL_SEQUENCE),
        _ => None,
    }
}

fn posture(name: &str, targets: &[(&str, f64)]) -> PostureDefinition {
    targets
        .iter()
        .fold(PostureDefinition::new(name, YOGA_TOLERANCE), |p, &(angle, deg)| {
            p.target(angle, deg)
        })
}

/// The built-in postures
pub fn yoga_postures() -> Vec<PostureDefinition> {
    vec![
        posture(
            "PUSH_UP",
            &[
                ("left_elbow", 170.0),
                ("left_shoulder", 80.0),
                ("left_hip", 175.0),
                ("left_knee", 175.0),
            ],
        ),
        posture(
            "WARRIOR_4",
            &[
                ("left_elbow", 170.0),
                ("left_shoulder", 170.0),
                ("left_hip", 130.0),
                ("left_knee", 100.0),
                ("right_knee", 175.0),
            ],
        ),
        posture(
            "DOWNWARD_DOG",
            &[
                ("left_elbow", 175.0),
                ("left_shoulder", 170.0),
                ("left_hip", 90.0),
                ("left_knee", 175.0),
            ],
        ),
        posture(
            "UPWARD_DOG",
            &[
                ("left_elbow", 170.0),
                ("left_shoulder", 90.0),
                ("left_hip", 175.0),
                ("left_knee", 175.0),
            ],
        ),
        posture(
            "STANDING_FORWARD_BEND",
            &[
                ("left_hip", 20.0),
                ("left_knee", 175.0),
                ("right_hip", 20.0),
                ("right_knee", 175.0),
            ],
        ),
        posture(
            "SEATED_FORWARD_BEND",
            &[("left_hip", 45.0), ("left_knee", 175.0)],
        ),
        posture(
            "TREE",
            &[
                ("left_elbow", 40.0),
                ("right_elbow", 40.0),
                ("left_hip", 100.0),
                ("right_hip", 175.0),
                ("left_knee", 45.0),
                ("right_knee", 175.0),
            ],
        ),
        posture(
            "EASY_POSE",
            &[
                ("left_hip", 100.0),
                ("left_knee", 45.0),
                ("left_elbow", 160.0),
                ("right_hip", 100.0),
                ("right_knee", 45.0),
                ("right_elbow", 160.0),
            ],
        ),
        posture(
            "EXTENDED_TRIANGLE",
            &[
                ("left_elbow", 175.0),
                ("right_elbow", 175.0),
                ("left_shoulder", 90.0),
                ("right_shoulder", 90.0),
                ("left_knee", 175.0),
                ("right_knee", 175.0),
            ],
        ),
        posture(
            "BOAT",
            &[
                ("left_hip", 90.0),
                ("left_knee", 90.0),
                ("left_elbow", 170.0),
            ],
        ),
        posture(
            "SQUAT",
            &[
                ("left_elbow", 40.0),
                ("right_elbow", 40.0),
                ("left_hip", 45.0),
                ("right_hip", 45.0),
                ("left_knee", 45.0),
                ("right_knee", 45.0),
            ],
        ),
        posture(
            "WARRIOR_2",
            &[
                ("left_elbow", 175.0),
                ("right_elbow", 175.0),
                ("left_shoulder", 90.0),
                ("right_shoulder", 90.0),
                ("left_knee", 90.0),
                ("right_knee", 175.0),
            ],
        ),
        posture(
            "SIDE_PLANK",
            &[
                ("left_elbow", 175.0),
                ("right_elbow", 175.0),
                ("right_shoulder", 90.0),
                ("left_hip", 175.0),
                ("left_knee", 175.0),
            ],
        ),
        posture(
            "WARRIOR_3",
            &[
                ("left_elbow", 175.0),
                ("left_knee", 175.0),
                ("right_knee", 175.0),
                ("left_hip", 90.0),
                ("right_hip", 175.0),
            ],
        ),
        posture(
            "WARRIOR_1",
            &[
                ("left_elbow", 160.0),
                ("right_elbow", 160.0),
                ("left_shoulder", 170.0),
                ("right_shoulder", 170.0),
                ("left_knee", 100.0),
                ("right_knee", 175.0),
            ],
        ),
        posture(
            "TABLE",
            &[
                ("left_elbow", 170.0),
                ("left_shoulder", 90.0),
                ("left_hip", 90.0),
                ("left_knee", 90.0),
            ],
        ),
    ]
}
