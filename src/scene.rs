//! Scene data generation
//!
//! Synthesizes the knowledge nodes, connections and answer steps that the
//! sequencer reveals for a question.

mod content;
mod generator;
pub mod types;

#[cfg(test)]
mod proptests;

pub use generator::{generate_scene, revealed_connections};
pub use types::*;
