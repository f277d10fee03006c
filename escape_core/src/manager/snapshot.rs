//! Read-only view of everything the renderer draws.

use serde::Serialize;

use crate::story::StoryView;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    pub item: String,
    pub has_document: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickupButton {
    pub item: String,
    /// "Pick up", or "Picked" once the item is held.
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentView {
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub pickup: Option<PickupButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeypadView {
    pub input: String,
}

/// One frame of presentation state, polled after [`GameManager::tick`].
///
/// [`GameManager::tick`]: super::GameManager::tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationSnapshot {
    pub now: f64,
    pub hint: Option<String>,
    pub toast: Option<String>,
    /// Game time the toast disappears at.
    pub toast_expires_at: Option<f64>,
    pub inventory_open: bool,
    pub inventory: Vec<InventoryRow>,
    pub document: Option<DocumentView>,
    pub keypad: Option<KeypadView>,
    pub questionnaire_seconds_left: Option<f64>,
    pub story: Option<StoryView>,
    pub chase_seconds_left: Option<f64>,
    pub scream_seconds_left: Option<f64>,
    pub ending: Option<String>,
    pub blocking: bool,
}

impl PresentationSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
