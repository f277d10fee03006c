//! # Escape Core
//!
//! The engine of the Ward Escape game. This crate drives `room_rules` state:
//! it evaluates declarative element rules, arbitrates modal UI and runs the
//! timed state machines, all behind a single [`GameManager`] facade.
//!
//! ## Core Components
//!
//! - **rules**: Conditions, actions and data-driven interaction elements
//! - **modal**: Modal stack plus keypad, document and questionnaire sessions
//! - **timers**: Chase and scream deadlines, toasts
//! - **story**: Story overlay playback
//! - **manager**: The game manager, per-frame input and presentation snapshots
//! - **scene**: Scene definitions and the built-in hospital prefabs
//! - **collaborators**: Narrow traits for input, the player body and world objects
//!
//! ## Design Philosophy
//!
//! - **Tick-Driven**: One thread, one `tick` per frame; timers are deadlines polled against the clock
//! - **Data Over Types**: Every element is the same type, configured by conditions and actions
//! - **Recoverable**: Nothing is fatal; the worst case is a restart

pub mod collaborators;
pub mod error;
pub mod manager;
pub mod modal;
pub mod rules;
pub mod scene;
pub mod story;
pub mod timers;

pub use collaborators::*;
pub use error::*;
pub use manager::*;
pub use modal::*;
pub use rules::*;
pub use scene::*;
pub use story::*;
pub use timers::*;
