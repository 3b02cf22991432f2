//! Input: raw key identifiers mapped to a closed set of car actions.
//!
//! # Invariants
//! - Motion logic consumes [`Action`]s, never raw key identifiers.
//! - Only the most recently pressed key is tracked; releasing any key
//!   clears the held flag.

pub mod action;
pub mod keymap;
pub mod state;

pub use action::{Action, ParseActionError};
pub use keymap::{KeyId, KeyMap};
pub use state::InputState;
