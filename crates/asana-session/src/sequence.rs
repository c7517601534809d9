//! Posture sequences

use asana_core::{AsanaError, AsanaResult};
use asana_pose::{preset, PostureCatalog, PostureDefinition};

/// Ordered, non-empty list of postures, fixed for the life of a session
#[derive(Debug, Clone, PartialEq)]
pub struct PostureSequence {
    postures: Vec<PostureDefinition>,
}

impl PostureSequence {
    /// Resolve names against the catalog
    pub fn new<S: AsRef<str>>(catalog: &PostureCatalog, names: &[S]) -> AsanaResult<Self> {
        if names.is_empty() {
            return Err(AsanaError::EmptySequence);
        }
        let postures = names
            .iter()
            .map(|name| catalog.require(name.as_ref()).cloned())
            .collect::<AsanaResult<Vec<_>>>()?;
        Ok(PostureSequence { postures })
    }

    /// Named preset (`classic`, `full`)
    pub fn preset(catalog: &PostureCatalog, name: &str) -> AsanaResult<Self> {
        let names = preset(name).ok_or_else(|| AsanaError::UnknownPreset(name.to_string()))?;
        Self::new(catalog, names)
    }

    /// Every posture of the catalog, in catalog order
    pub fn all(catalog: &PostureCatalog) -> AsanaResult<Self> {
        let names: Vec<&str> = catalog.names().collect();
        Self::new(catalog, &names[..])
    }

    pub fn get(&self, index: usize) -> Option<&PostureDefinition> {
        self.postures.get(index)
    }

    pub fn len(&self) -> usize {
        self.postures.len()
    }

    /// Always false for a constructed sequence
    pub fn is_empty(&self) -> bool {
        self.postures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostureDefinition> {
        self.postures.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.postures.iter().map(|p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asana_pose::{CLASSIC_SEQUENCE, FULL_SEQUENCE};

    #[test]
    fn test_presets() {
        let catalog = PostureCatalog::yoga();
        let classic = PostureSequence::preset(&catalog, "classic").unwrap();
        assert_eq!(classic.len(), CLASSIC_SEQUENCE.len());
        assert_eq!(classic.get(0).unwrap().name, "EASY_POSE");
        assert_eq!(classic.names().last(), Some("BOAT"));

        let full = PostureSequence::preset(&catalog, "full").unwrap();
        assert_eq!(full.len(), FULL_SEQUENCE.len());
    }

    #[test]
    fn test_unknown_preset() {
        let catalog = PostureCatalog::yoga();
        assert_eq!(
            PostureSequence::preset(&catalog, "power").unwrap_err(),
            AsanaError::UnknownPreset("power".to_string())
        );
    }

    #[test]
    fn test_explicit_names() {
        let catalog = PostureCatalog::yoga();
        let seq = PostureSequence::new(&catalog, &["TREE", "BOAT", "TREE"]).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.names().collect::<Vec<_>>(), vec!["TREE", "BOAT", "TREE"]);
    }

    #[test]
    fn test_unknown_posture_rejected() {
        let catalog = PostureCatalog::yoga();
        assert_eq!(
            PostureSequence::new(&catalog, &["TREE", "HEADSTAND"]).unwrap_err(),
            AsanaError::UnknownPosture("HEADSTAND".to_string())
        );
    }

    #[test]
    fn test_empty_rejected() {
        let catalog = PostureCatalog::yoga();
        let names: [&str; 0] = [];
        assert_eq!(
            PostureSequence::new(&catalog, &names).unwrap_err(),
            AsanaError::EmptySequence
        );
    }

    #[test]
    fn test_all() {
        let catalog = PostureCatalog::yoga();
        let seq = PostureSequence::all(&catalog).unwrap();
        assert_eq!(seq.len(), catalog.len());
    }
}
