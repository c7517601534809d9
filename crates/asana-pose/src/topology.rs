//! Angle topology - joint angle id to (endpoint A, vertex, endpoint C)

use std::collections::BTreeMap;

use asana_core::{AngleId, AsanaError, AsanaResult, Landmark};
use serde::{Deserialize, Serialize};

/// One joint angle: the angle at `vertex` between the rays to A and C
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AngleDefinition {
    pub id: AngleId,
    pub endpoint_a: Landmark,
    pub vertex: Landmark,
    pub endpoint_c: Landmark,
}

impl AngleDefinition {
    pub fn new(
        id: impl Into<AngleId>,
        endpoint_a: Landmark,
        vertex: Landmark,
        endpoint_c: Landmark,
    ) -> Self {
        Self {
            id: id.into(),
            endpoint_a,
            vertex,
            endpoint_c,
        }
    }

    /// The three landmarks in (A, vertex, C) order
    pub fn landmarks(&self) -> [Landmark; 3] {
        [self.endpoint_a, self.vertex, self.endpoint_c]
    }
}

/// Immutable set of angle definitions, keyed by id
#[derive(Debug, Clone, PartialEq)]
pub struct AngleTopology {
    angles: BTreeMap<AngleId, AngleDefinition>,
}

impl AngleTopology {
    /// Build a topology, rejecting duplicate ids and vertex-as-endpoint definitions
    pub fn new(definitions: impl IntoIterator<Item = AngleDefinition>) -> AsanaResult<Self> {
        let mut angles = BTreeMap::new();
        for def in definitions {
            if def.vertex == def.endpoint_a || def.vertex == def.endpoint_c {
                return Err(AsanaError::DegenerateAngle(def.id));
            }
            if angles.contains_key(&def.id) {
                return Err(AsanaError::DuplicateAngle(def.id));
            }
            angles.insert(def.id.clone(), def);
        }
        Ok(AngleTopology { angles })
    }

    /// Elbows, shoulders, hips and knees on both sides
    pub fn standard() -> Self {
        let angles = standard_definitions()
            .into_iter()
            .map(|def| (def.id.clone(), def))
            .collect();
        AngleTopology { angles }
    }

    pub fn get(&self, id: &AngleId) -> Option<&AngleDefinition> {
        self.angles.get(id)
    }

    pub fn contains(&self, id: &AngleId) -> bool {
        self.angles.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AngleDefinition> {
        self.angles.values()
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }
}

impl Default for AngleTopology {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_definitions() -> Vec<AngleDefinition> {
    use Landmark::*;

    vec![
        AngleDefinition::new("left_elbow", LeftShoulder, LeftElbow, LeftWrist),
        AngleDefinition::new("right_elbow", RightShoulder, RightElbow, RightWrist),
        AngleDefinition::new("left_shoulder", LeftElbow, LeftShoulder, LeftHip),
        AngleDefinition::new("right_shoulder", RightElbow, RightShoulder, RightHip),
        AngleDefinition::new("left_hip", LeftShoulder, LeftHip, LeftKnee),
        AngleDefinition::new("right_hip", RightShoulder, RightHip, RightKnee),
        AngleDefinition::new("left_knee", LeftHip, LeftKnee, LeftAnkle),
        AngleDefinition::new("right_knee", RightHip, RightKnee, RightAnkle),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_topology() {
        let topology = AngleTopology::standard();
        assert_eq!(topology.len(), 8);

        let knee = topology.get(&AngleId::from("left_knee")).unwrap();
        assert_eq!(
            knee.landmarks(),
            [Landmark::LeftHip, Landmark::LeftKnee, Landmark::LeftAnkle]
        );

        let shoulder = topology.get(&AngleId::from("right_shoulder")).unwrap();
        assert_eq!(shoulder.vertex, Landmark::RightShoulder);
        assert!(!topology.contains(&AngleId::from("left_wrist")));
    }

    #[test]
    fn test_standard_passes_validation() {
        let checked = AngleTopology::new(standard_definitions()).unwrap();
        assert_eq!(checked, AngleTopology::standard());
    }

    #[test]
    fn test_duplicate_angle_rejected() {
        let defs = vec![
            AngleDefinition::new("neck", Landmark::Nose, Landmark::LeftShoulder, Landmark::LeftHip),
            AngleDefinition::new("neck", Landmark::Nose, Landmark::RightShoulder, Landmark::RightHip),
        ];
        assert_eq!(
            AngleTopology::new(defs),
            Err(AsanaError::DuplicateAngle(AngleId::from("neck")))
        );
    }

    #[test]
    fn test_vertex_as_endpoint_rejected() {
        let defs = vec![AngleDefinition::new(
            "broken",
            Landmark::LeftKnee,
            Landmark::LeftKnee,
            Landmark::LeftAnkle,
        )];
        assert_eq!(
            AngleTopology::new(defs),
            Err(AsanaError::DegenerateAngle(AngleId::from("broken")))
        );
    }
}
