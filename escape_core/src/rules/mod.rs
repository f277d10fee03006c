//! Declarative rules: conditions that gate action lists on interactive elements.
//!
//! A scene object is an [`InteractionElement`] built entirely from data. Its
//! conditions are pure predicates over [`GameState`] (plus read-only world
//! queries); its actions are the only place state changes happen.

mod action;
mod element;

pub use action::*;
pub use element::*;

use room_rules::{GameState, ObjectPath};
use serde::{Deserialize, Serialize};

use crate::collaborators::WorldObjects;

fn default_true() -> bool {
    true
}

/// A side-effect-free predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    Always,

    /// `flag == expected`, then optionally inverted.
    Flag {
        flag: String,
        #[serde(default = "default_true")]
        expected: bool,
        #[serde(default)]
        invert: bool,
    },

    /// Holding (or not holding) an item. A blank item always passes.
    HasItem {
        item: String,
        #[serde(default = "default_true")]
        should_have: bool,
    },

    /// The last keypad entry matches `password`, or the configured door
    /// password when none is given.
    KeypadPassword {
        #[serde(default)]
        password: Option<String>,
    },

    HasReadDocument {
        document: String,
        #[serde(default = "default_true")]
        expected: bool,
    },

    /// Open state of a drawer in the world. Unknown drawers fail.
    DrawerOpen {
        drawer: ObjectPath,
        #[serde(default = "default_true")]
        expected_open: bool,
    },
}

impl Condition {
    /// `flag` must equal `expected`.
    pub fn flag(flag: impl AsRef<str>, expected: bool) -> Self {
        Condition::Flag {
            flag: flag.as_ref().to_string(),
            expected,
            invert: false,
        }
    }

    pub fn has_item(item: impl Into<String>, should_have: bool) -> Self {
        Condition::HasItem {
            item: item.into(),
            should_have,
        }
    }

    pub fn keypad_password(password: Option<&str>) -> Self {
        Condition::KeypadPassword {
            password: password.map(str::to_string),
        }
    }

    pub fn has_read(document: impl Into<String>, expected: bool) -> Self {
        Condition::HasReadDocument {
            document: document.into(),
            expected,
        }
    }

    pub fn drawer_open(drawer: impl Into<ObjectPath>, expected_open: bool) -> Self {
        Condition::DrawerOpen {
            drawer: drawer.into(),
            expected_open,
        }
    }

    pub fn check(&self, ctx: &ConditionContext<'_>) -> bool {
        match self {
            Condition::Always => true,
            Condition::Flag {
                flag,
                expected,
                invert,
            } => (ctx.state.flag(flag) == *expected) != *invert,
            Condition::HasItem { item, should_have } => {
                if item.trim().is_empty() {
                    return true;
                }
                ctx.state.has_item(item) == *should_have
            }
            Condition::KeypadPassword { password } => {
                let expected = password.as_deref().unwrap_or(ctx.door_password).trim();
                let entry = ctx.state.last_keypad_entry().trim();
                !expected.is_empty() && entry == expected
            }
            Condition::HasReadDocument { document, expected } => {
                ctx.state.has_read(document) == *expected
            }
            Condition::DrawerOpen {
                drawer,
                expected_open,
            } => ctx
                .world
                .is_open(drawer)
                .is_some_and(|open| open == *expected_open),
        }
    }
}

/// Read-only view the conditions are evaluated against.
#[derive(Clone, Copy)]
pub struct ConditionContext<'a> {
    pub state: &'a GameState,
    pub door_password: &'a str,
    pub world: &'a dyn WorldObjects,
}

/// Combine a condition list: AND when `require_all`, OR otherwise.
/// An empty list passes either way.
pub fn evaluate(conditions: &[Condition], require_all: bool, ctx: &ConditionContext<'_>) -> bool {
    if conditions.is_empty() {
        return true;
    }
    if require_all {
        conditions.iter().all(|condition| condition.check(ctx))
    } else {
        conditions.iter().any(|condition| condition.check(ctx))
    }
}
