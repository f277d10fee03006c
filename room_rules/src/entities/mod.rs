//! Identifiers and authored data for the things a room contains.

mod document;
mod story;

pub use document::*;
pub use story::*;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A trimmed, case-insensitive name.
///
/// Flags, inventory items and documents are all addressed by names typed by
/// scene authors, so `"Key"`, `" key "` and `"KEY"` must resolve to the same
/// entry. The first spelling seen is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NameKey {
    display: String,
    folded: String,
}

impl NameKey {
    /// Parse a raw name. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let display = raw.trim();
        if display.is_empty() {
            return None;
        }
        Some(Self {
            display: display.to_string(),
            folded: display.to_lowercase(),
        })
    }

    /// The name as it was first written (trimmed).
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Whether `raw` names the same entry as this key.
    pub fn matches(&self, raw: &str) -> bool {
        raw.trim().to_lowercase() == self.folded
    }
}

impl PartialEq for NameKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for NameKey {}

impl Hash for NameKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl PartialOrd for NameKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NameKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl TryFrom<String> for NameKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NameKey::parse(&value).ok_or_else(|| "name must not be blank".to_string())
    }
}

impl From<NameKey> for String {
    fn from(key: NameKey) -> Self {
        key.display
    }
}

impl std::fmt::Display for NameKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// Name of a boolean world flag.
pub type FlagName = NameKey;

/// Name of an inventory item.
pub type ItemId = NameKey;

/// Name of a readable document.
pub type DocumentId = NameKey;

/// Unique identifier for interactive elements registered with the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub Uuid);

impl ElementId {
    /// Create a new random element ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a nil element ID (useful for ad-hoc action runs).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scene path of a world object, e.g. `PatientRoom/DoorPivot`.
///
/// Paths are case-sensitive; only surrounding whitespace is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ObjectPath(String);

impl ObjectPath {
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(path.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last path segment, e.g. `Button_Red` for `TreatmentRoom/Button_Red`.
    pub fn leaf(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl From<String> for ObjectPath {
    fn from(value: String) -> Self {
        ObjectPath::new(value)
    }
}

impl From<&str> for ObjectPath {
    fn from(value: &str) -> Self {
        ObjectPath::new(value)
    }
}

impl From<ObjectPath> for String {
    fn from(path: ObjectPath) -> Self {
        path.0
    }
}

impl std::fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
