//! # Room Rules
//!
//! The "Room Bible" crate - flags, inventory, documents, story data and tuning
//! for the Ward Escape game. This crate is the single source of truth for game
//! state and contains no rule evaluation, UI arbitration or timing logic.

pub mod config;
pub mod entities;
pub mod mechanics;
pub mod world_state;

pub use config::*;
pub use entities::*;
pub use mechanics::*;
pub use world_state::*;
