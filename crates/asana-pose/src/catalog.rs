//! Posture catalog - named target-angle sets with a shared tolerance
//!
//! The catalog is configuration data. It is validated once, when it is
//! built, so that a posture naming an unknown angle can never reach the
//! per-frame path.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use asana_core::{AngleId, AsanaError, AsanaResult};
use serde::{Deserialize, Serialize};

use crate::{yoga_postures, AngleDefinition, AngleTopology};

/// Target posture: angle targets in degrees plus one tolerance for all of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureDefinition {
    pub name: String,
    pub targets: BTreeMap<AngleId, f64>,
    /// Allowed deviation in degrees, inclusive, shared by every target
    pub tolerance: f64,
}

impl PostureDefinition {
    pub fn new(name: impl Into<String>, tolerance: f64) -> Self {
        PostureDefinition {
            name: name.into(),
            targets: BTreeMap::new(),
            tolerance,
        }
    }

    /// Builder: add a target angle
    pub fn target(mut self, angle: impl Into<AngleId>, degrees: f64) -> Self {
        self.targets.insert(angle.into(), degrees);
        self
    }

    /// Human-readable name (`WARRIOR_1` -> `WARRIOR 1`)
    pub fn display_name(&self) -> String {
        self.name.replace('_', " ")
    }

    fn validate(&self, topology: &AngleTopology) -> AsanaResult<()> {
        if self.targets.is_empty() {
            return Err(AsanaError::EmptyPosture(self.name.clone()));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(AsanaError::InvalidTolerance {
                posture: self.name.clone(),
                tolerance: self.tolerance,
            });
        }
        for (angle, &target) in &self.targets {
            if !topology.contains(angle) {
                return Err(AsanaError::UnknownAngle {
                    posture: self.name.clone(),
                    angle: angle.clone(),
                });
            }
            if !(0.0..=180.0).contains(&target) {
                return Err(AsanaError::TargetOutOfRange {
                    posture: self.name.clone(),
                    angle: angle.clone(),
                    target,
                });
            }
        }
        Ok(())
    }
}

/// On-disk catalog document
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    /// Replaces the standard topology when present
    #[serde(default)]
    angles: Option<Vec<AngleDefinition>>,
    postures: Vec<PostureDefinition>,
}

/// Validated, immutable posture catalog
#[derive(Debug, Clone)]
pub struct PostureCatalog {
    topology: AngleTopology,
    postures: Vec<PostureDefinition>,
    index: HashMap<String, usize>,
}

impl PostureCatalog {
    /// Validate every posture against the topology
    pub fn new(topology: AngleTopology, postures: Vec<PostureDefinition>) -> AsanaResult<Self> {
        let mut index = HashMap::with_capacity(postures.len());
        for (i, posture) in postures.iter().enumerate() {
            posture.validate(&topology)?;
            if index.insert(posture.name.clone(), i).is_some() {
                return Err(AsanaError::DuplicatePosture(posture.name.clone()));
            }
        }

        tracing::debug!(
            postures = postures.len(),
            angles = topology.len(),
            "posture catalog validated"
        );

        Ok(PostureCatalog {
            topology,
            postures,
            index,
        })
    }

    /// Built-in yoga catalog over the standard topology
    pub fn yoga() -> Self {
        let postures = yoga_postures();
        let index = postures
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        PostureCatalog {
            topology: AngleTopology::standard(),
            postures,
            index,
        }
    }

    /// Parse a JSON catalog document
    ///
    /// ```json
    /// { "postures": [ { "name": "TABLE", "targets": { "left_knee": 90 }, "tolerance": 40 } ] }
    /// ```
    pub fn from_json(text: &str) -> AsanaResult<Self> {
        let doc: CatalogDocument =
            serde_json::from_str(text).map_err(|e| AsanaError::ConfigParse(e.to_string()))?;
        let topology = match doc.angles {
            Some(angles) => AngleTopology::new(angles)?,
            None => AngleTopology::standard(),
        };
        Self::new(topology, doc.postures)
    }

    /// Load a JSON catalog from disk
    pub fn load<P: AsRef<Path>>(path: P) -> AsanaResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| AsanaError::ConfigIo(format!("{}: {}", path.display(), e)))?;
        let catalog = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), postures = catalog.len(), "loaded posture catalog");
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&PostureDefinition> {
        self.index.get(name).map(|&i| &self.postures[i])
    }

    /// Like `get`, but a missing posture is a configuration error
    pub fn require(&self, name: &str) -> AsanaResult<&PostureDefinition> {
        self.get(name)
            .ok_or_else(|| AsanaError::UnknownPosture(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Posture names in catalog order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.postures.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostureDefinition> {
        self.postures.iter()
    }

    pub fn topology(&self) -> &AngleTopology {
        &self.topology
    }

    pub fn len(&self) -> usize {
        self.postures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postures.is_empty()
    }
}

impl Default for PostureCatalog {
    fn default() -> Self {
        Self::yoga()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asana_core::Landmark;

    #[test]
    fn test_yoga_catalog_is_valid() {
        let checked = PostureCatalog::new(AngleTopology::standard(), yoga_postures()).unwrap();
        assert_eq!(checked.len(), 16);
        assert_eq!(PostureCatalog::yoga().len(), 16);
    }

    #[test]
    fn test_lookup() {
        let catalog = PostureCatalog::yoga();
        let tree = catalog.get("TREE").unwrap();
        assert_eq!(tree.tolerance, 40.0);
        assert_eq!(tree.targets[&AngleId::from("left_knee")], 45.0);
        assert!(catalog.get("LOTUS").is_none());
        assert_eq!(
            catalog.require("LOTUS").unwrap_err(),
            AsanaError::UnknownPosture("LOTUS".to_string())
        );
    }

    #[test]
    fn test_display_name() {
        let p = PostureDefinition::new("EXTENDED_TRIANGLE", 40.0);
        assert_eq!(p.display_name(), "EXTENDED TRIANGLE");
    }

    #[test]
    fn test_unknown_angle_rejected_at_load() {
        let postures = vec![PostureDefinition::new("BAD", 30.0).target("left_wrist", 90.0)];
        let err = PostureCatalog::new(AngleTopology::standard(), postures).unwrap_err();
        assert_eq!(
            err,
            AsanaError::UnknownAngle {
                posture: "BAD".to_string(),
                angle: AngleId::from("left_wrist"),
            }
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_empty_targets_rejected() {
        let postures = vec![PostureDefinition::new("NOTHING", 30.0)];
        assert_eq!(
            PostureCatalog::new(AngleTopology::standard(), postures).unwrap_err(),
            AsanaError::EmptyPosture("NOTHING".to_string())
        );
    }

    #[test]
    fn test_bad_tolerance_rejected() {
        for tolerance in [-1.0, f64::NAN, f64::INFINITY] {
            let postures = vec![PostureDefinition::new("P", tolerance).target("left_knee", 90.0)];
            let err = PostureCatalog::new(AngleTopology::standard(), postures).unwrap_err();
            assert!(matches!(err, AsanaError::InvalidTolerance { .. }));
        }
    }

    #[test]
    fn test_target_out_of_range_rejected() {
        let postures = vec![PostureDefinition::new("P", 10.0).target("left_knee", 200.0)];
        let err = PostureCatalog::new(AngleTopology::standard(), postures).unwrap_err();
        assert!(matches!(err, AsanaError::TargetOutOfRange { target, .. } if target == 200.0));
    }

    #[test]
    fn test_duplicate_posture_rejected() {
        let postures = vec![
            PostureDefinition::new("P", 10.0).target("left_knee", 90.0),
            PostureDefinition::new("P", 10.0).target("right_knee", 90.0),
        ];
        assert_eq!(
            PostureCatalog::new(AngleTopology::standard(), postures).unwrap_err(),
            AsanaError::DuplicatePosture("P".to_string())
        );
    }

    #[test]
    fn test_from_json() {
        let catalog = PostureCatalog::from_json(
            r#"{
                "postures": [
                    { "name": "TABLE", "targets": { "left_knee": 90, "left_hip": 90 }, "tolerance": 25 }
                ]
            }"#,
        )
        .unwrap();
        let table = catalog.get("TABLE").unwrap();
        assert_eq!(table.targets.len(), 2);
        assert_eq!(table.tolerance, 25.0);
        assert_eq!(catalog.topology().len(), 8);
    }

    #[test]
    fn test_from_json_custom_topology() {
        let catalog = PostureCatalog::from_json(
            r#"{
                "angles": [
                    { "id": "neck", "endpoint_a": "nose", "vertex": "left_shoulder", "endpoint_c": "left_hip" }
                ],
                "postures": [
                    { "name": "UPRIGHT", "targets": { "neck": 170 }, "tolerance": 15 }
                ]
            }"#,
        )
        .unwrap();
        let neck = catalog.topology().get(&AngleId::from("neck")).unwrap();
        assert_eq!(neck.vertex, Landmark::LeftShoulder);
    }

    #[test]
    fn test_from_json_unknown_angle() {
        let err = PostureCatalog::from_json(
            r#"{ "postures": [ { "name": "X", "targets": { "tail": 10 }, "tolerance": 5 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, AsanaError::UnknownAngle { .. }));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = PostureCatalog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AsanaError::ConfigParse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PostureCatalog::load("/nonexistent/asana/catalog.json").unwrap_err();
        assert!(matches!(err, AsanaError::ConfigIo(_)));
    }
}
