//! Reveal sequence state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
mod frame;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, Notification};
pub use event::Event;
pub use frame::Frame;
pub use state::{ErrorKind, Phase, SequenceContext, SequenceState};
pub use transition::{transition, TransitionError};
