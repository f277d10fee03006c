//! Error types for rule execution and scene loading.

use room_rules::ElementId;
use thiserror::Error;

/// Why a single action could not be carried out.
///
/// Action errors are diagnostics: the rule engine records them in an
/// [`ActionReport`](crate::rules::ActionReport) and keeps running the rest of
/// the list. None of them is a gameplay failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    /// The action is wired without something it needs (object, item, lines).
    #[error("missing target: {0}")]
    MissingTarget(String),

    /// The world collaborator doesn't know the requested object.
    #[error("unknown world object: {0}")]
    UnknownObject(String),

    /// The request is not valid right now, e.g. a modal of that kind is already open.
    #[error("rejected: {0}")]
    Rejected(&'static str),

    /// A callback referred to an element that is not registered.
    #[error("unknown element: {0}")]
    UnknownElement(ElementId),
}

impl ActionError {
    /// Rejections come from duplicate input, not broken wiring.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ActionError::Rejected(_))
    }
}

/// Errors raised while loading a scene definition.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to parse scene: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("element {0} is registered twice")]
    DuplicateElement(ElementId),
}
