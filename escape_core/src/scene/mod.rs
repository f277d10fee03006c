//! Scene definitions: the set of interactive elements in a level, as data.

mod prefabs;

pub use prefabs::*;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SceneError;
use crate::rules::InteractionElement;

/// Every interactive element of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneDefinition {
    #[serde(default)]
    pub elements: Vec<InteractionElement>,
}

impl SceneDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(mut self, element: InteractionElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Parse a scene from TOML. Elements without an `id` get a fresh one.
    pub fn from_toml_str(text: &str) -> Result<Self, SceneError> {
        let scene: SceneDefinition = toml::from_str(text)?;
        scene.check_unique_ids()?;
        Ok(scene)
    }

    fn check_unique_ids(&self) -> Result<(), SceneError> {
        let mut seen = HashSet::new();
        for element in &self.elements {
            if !seen.insert(element.id) {
                return Err(SceneError::DuplicateElement(element.id));
            }
        }
        Ok(())
    }

    pub fn element_named(&self, name: &str) -> Option<&InteractionElement> {
        self.elements.iter().find(|element| element.name == name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
