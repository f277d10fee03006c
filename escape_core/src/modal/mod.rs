//! Modal UI arbitration.
//!
//! The [`ModalStack`] decides whether world interaction and player movement
//! are live. Request-style modals (keypad, documents, questionnaire, story)
//! nest, so they are counted with [`ModalStack::push`]/[`ModalStack::pop`];
//! single-instance surfaces (inventory, ending) are plain switches.

mod document;
mod keypad;
mod questionnaire;

pub use document::*;
pub use keypad::*;
pub use questionnaire::*;

use serde::{Deserialize, Serialize};

use crate::collaborators::InputAdapter;

/// Named, non-nestable UI surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    Inventory,
    Ending,
}

/// Counts open modal surfaces and keeps the player's controls in sync.
///
/// Invariant: `is_blocking() == block_count > 0 || any surface is open`.
/// Every push must be paired with exactly one pop, otherwise blocking leaks
/// past the surface that caused it.
pub struct ModalStack {
    block_count: u32,
    inventory_open: bool,
    ending_open: bool,
    input: Box<dyn InputAdapter>,
}

impl ModalStack {
    pub fn new(input: Box<dyn InputAdapter>) -> Self {
        Self {
            block_count: 0,
            inventory_open: false,
            ending_open: false,
            input,
        }
    }

    /// Open a nested block. Freezes the player and releases the pointer immediately.
    pub fn push(&mut self) {
        self.block_count += 1;
        tracing::debug!(block_count = self.block_count, "modal block pushed");
        self.input.set_frozen(true);
        self.input.set_pointer_captured(false);
    }

    /// Close a nested block. Extra pops are ignored.
    pub fn pop(&mut self) {
        if self.block_count == 0 {
            tracing::warn!("modal pop without matching push");
        }
        self.block_count = self.block_count.saturating_sub(1);
        tracing::debug!(block_count = self.block_count, "modal block popped");
        self.apply();
    }

    pub fn set_surface(&mut self, surface: Surface, open: bool) {
        match surface {
            Surface::Inventory => self.inventory_open = open,
            Surface::Ending => self.ending_open = open,
        }
        tracing::debug!(?surface, open, "modal surface changed");
        self.apply();
    }

    pub fn surface(&self, surface: Surface) -> bool {
        match surface {
            Surface::Inventory => self.inventory_open,
            Surface::Ending => self.ending_open,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.block_count > 0 || self.inventory_open || self.ending_open
    }

    pub fn block_count(&self) -> u32 {
        self.block_count
    }

    /// Re-send the current frozen state to the input adapter.
    pub fn apply(&mut self) {
        let blocking = self.is_blocking();
        self.input.set_frozen(blocking);
        self.input.set_pointer_captured(!blocking);
    }

    /// Close everything at once (restart).
    pub fn reset(&mut self) {
        self.block_count = 0;
        self.inventory_open = false;
        self.ending_open = false;
        self.apply();
    }
}

impl std::fmt::Debug for ModalStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalStack")
            .field("block_count", &self.block_count)
            .field("inventory_open", &self.inventory_open)
            .field("ending_open", &self.ending_open)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder {
        frozen: Rc<RefCell<Vec<bool>>>,
        captured: Rc<RefCell<Vec<bool>>>,
    }

    impl InputAdapter for Recorder {
        fn set_frozen(&mut self, frozen: bool) {
            self.frozen.borrow_mut().push(frozen);
        }

        fn set_pointer_captured(&mut self, captured: bool) {
            self.captured.borrow_mut().push(captured);
        }
    }

    fn stack() -> (ModalStack, Recorder) {
        let recorder = Recorder::default();
        (ModalStack::new(Box::new(recorder.clone())), recorder)
    }

    #[test]
    fn test_push_freezes_immediately() {
        let (mut modal, recorder) = stack();
        modal.push();

        assert!(modal.is_blocking());
        assert_eq!(recorder.frozen.borrow().last(), Some(&true));
        assert_eq!(recorder.captured.borrow().last(), Some(&false));
    }

    #[test]
    fn test_nested_blocks() {
        let (mut modal, recorder) = stack();
        modal.push();
        modal.push();
        modal.pop();
        assert!(modal.is_blocking());
        assert_eq!(recorder.frozen.borrow().last(), Some(&true));

        modal.pop();
        assert!(!modal.is_blocking());
        assert_eq!(recorder.frozen.borrow().last(), Some(&false));
        assert_eq!(recorder.captured.borrow().last(), Some(&true));
    }

    #[test]
    fn test_pop_floors_at_zero() {
        let (mut modal, _) = stack();
        modal.pop();
        modal.pop();
        assert_eq!(modal.block_count(), 0);

        modal.push();
        assert_eq!(modal.block_count(), 1);
    }

    #[test]
    fn test_surface_blocks_without_count() {
        let (mut modal, recorder) = stack();
        modal.set_surface(Surface::Inventory, true);
        assert_eq!(modal.block_count(), 0);
        assert!(modal.is_blocking());

        modal.push();
        modal.pop();
        assert!(modal.is_blocking());
        assert_eq!(recorder.frozen.borrow().last(), Some(&true));

        modal.set_surface(Surface::Inventory, false);
        assert!(!modal.is_blocking());
    }

    #[test]
    fn test_reset_unblocks() {
        let (mut modal, recorder) = stack();
        modal.push();
        modal.push();
        modal.set_surface(Surface::Ending, true);

        modal.reset();
        assert!(!modal.is_blocking());
        assert_eq!(modal.block_count(), 0);
        assert!(!modal.surface(Surface::Ending));
        assert_eq!(recorder.frozen.borrow().last(), Some(&false));
    }

    proptest! {
        #[test]
        fn prop_balanced_push_pop_is_neutral(
            start_blocked: bool,
            pushes_first in proptest::collection::vec(any::<bool>(), 0..24),
        ) {
            let (mut modal, _) = stack();
            if start_blocked {
                modal.push();
            }
            let before = modal.is_blocking();

            // Interleave: every `true` is a push; pops follow in a valid order.
            let mut open = 0u32;
            for push in &pushes_first {
                if *push {
                    modal.push();
                    open += 1;
                } else if open > 0 {
                    modal.pop();
                    open -= 1;
                }
            }
            for _ in 0..open {
                modal.pop();
            }

            prop_assert_eq!(modal.is_blocking(), before);
        }
    }
}
