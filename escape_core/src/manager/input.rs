//! Per-frame input as seen by the game manager.

use room_rules::ElementId;

use crate::modal::QuestionnaireForm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeypadInput {
    Submit(String),
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionnaireInput {
    Submit(QuestionnaireForm),
    /// Closed without submitting.
    Close,
}

/// Everything the input adapter and picker report for one frame.
///
/// Edge-triggered fields (`advance_story`, `interact`, ...) should be true
/// only on the frame the key went down.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Space/Enter on the story overlay.
    pub advance_story: bool,
    /// Click inside the story text box.
    pub story_clicked: bool,
    pub skip_story: bool,

    pub toggle_inventory: bool,
    pub close_document: bool,
    pub pick_up_document: bool,
    /// "View" on an inventory row.
    pub view_item: Option<String>,

    pub keypad: Option<KeypadInput>,
    pub questionnaire: Option<QuestionnaireInput>,

    pub restart: bool,

    /// Element under the crosshair, from the picking collaborator.
    pub focused: Option<ElementId>,
    pub interact: bool,
}

impl FrameInput {
    /// A frame with no input at all.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Looking at `element` with no key pressed.
    pub fn looking_at(element: ElementId) -> Self {
        Self {
            focused: Some(element),
            ..Self::default()
        }
    }

    /// Pressing interact while looking at `element`.
    pub fn interact_with(element: ElementId) -> Self {
        Self {
            focused: Some(element),
            interact: true,
            ..Self::default()
        }
    }

    pub fn keypad_submit(code: impl Into<String>) -> Self {
        Self {
            keypad: Some(KeypadInput::Submit(code.into())),
            ..Self::default()
        }
    }

    pub fn advance_story() -> Self {
        Self {
            advance_story: true,
            ..Self::default()
        }
    }
}
