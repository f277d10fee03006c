//! Narrow interfaces to the systems the core drives but does not own:
//! player movement, the physical world and the input device.
//!
//! Every request is fire-and-forget. The core never waits for an animation
//! to finish; a door opening is purely cosmetic from the rules' point of view.

use room_rules::{ObjectPath, Pose};

/// Player controls: movement freeze and pointer capture.
pub trait InputAdapter {
    /// Freeze or unfreeze player movement and look.
    fn set_frozen(&mut self, frozen: bool);

    /// Capture the pointer for mouse-look, or release it so UI can be clicked.
    fn set_pointer_captured(&mut self, captured: bool);
}

/// The player's body in the world.
pub trait PlayerBody {
    fn teleport(&mut self, pose: Pose);
}

/// Doors, drawers, panels and other scene objects.
///
/// Mutating requests return `false` when the object is unknown.
pub trait WorldObjects {
    fn open(&mut self, object: &ObjectPath) -> bool;

    fn toggle(&mut self, object: &ObjectPath) -> bool;

    fn set_active(&mut self, object: &ObjectPath, active: bool) -> bool;

    fn destroy(&mut self, object: &ObjectPath) -> bool;

    /// Open state of a door/drawer-like object. `None` if unknown.
    fn is_open(&self, object: &ObjectPath) -> Option<bool>;
}

/// Collaborator that accepts every request and reports nothing.
///
/// Useful for headless sessions where only the rules matter.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl InputAdapter for Detached {
    fn set_frozen(&mut self, _frozen: bool) {}

    fn set_pointer_captured(&mut self, _captured: bool) {}
}

impl PlayerBody for Detached {
    fn teleport(&mut self, _pose: Pose) {}
}

impl WorldObjects for Detached {
    fn open(&mut self, _object: &ObjectPath) -> bool {
        true
    }

    fn toggle(&mut self, _object: &ObjectPath) -> bool {
        true
    }

    fn set_active(&mut self, _object: &ObjectPath, _active: bool) -> bool {
        true
    }

    fn destroy(&mut self, _object: &ObjectPath) -> bool {
        true
    }

    fn is_open(&self, _object: &ObjectPath) -> Option<bool> {
        None
    }
}

/// Everything the game manager talks to, handed over once at construction.
pub struct Collaborators {
    pub input: Box<dyn InputAdapter>,
    pub player: Box<dyn PlayerBody>,
    pub world: Box<dyn WorldObjects>,
}

impl Collaborators {
    pub fn new(
        input: impl InputAdapter + 'static,
        player: impl PlayerBody + 'static,
        world: impl WorldObjects + 'static,
    ) -> Self {
        Self {
            input: Box::new(input),
            player: Box::new(player),
            world: Box::new(world),
        }
    }

    /// No-op collaborators for every role.
    pub fn detached() -> Self {
        Self::new(Detached, Detached, Detached)
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
