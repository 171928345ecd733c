//! Registry of recurring characters, keyed by their cameo identifier.

use serde::{Deserialize, Serialize};

/// A saved cameo. `id` is the identifier itself and is unique in a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCameo {
    pub id: String,
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age: String,
}

impl SavedCameo {
    /// Build an entry whose id is the trimmed identifier.
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        gender: impl Into<String>,
        age: impl Into<String>,
    ) -> Self {
        let identifier = identifier.into().trim().to_string();
        Self {
            id: identifier.clone(),
            identifier,
            name: name.into(),
            gender: gender.into(),
            age: age.into(),
        }
    }
}

/// Insertion-ordered, grow-only list of saved cameos.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameoRegistry {
    entries: Vec<SavedCameo>,
}

impl CameoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` unless its identifier is blank or its id is taken.
    pub fn add(&mut self, entry: SavedCameo) -> bool {
        if entry.identifier.trim().is_empty() || self.contains(&entry.id) {
            tracing::debug!(id = %entry.id, "Cameo rejected");
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn find(&self, id: &str) -> Option<&SavedCameo> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedCameo> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<SavedCameo> for CameoRegistry {
    fn from_iter<I: IntoIterator<Item = SavedCameo>>(iter: I) -> Self {
        let mut registry = CameoRegistry::new();
        for entry in iter {
            registry.add(entry);
        }
        registry
    }
}
