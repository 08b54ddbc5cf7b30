//! Trait abstractions for runtime I/O
//!
//! The scene source is the only external dependency of a sequence; tests swap
//! in the mocks from `runtime::testing`.

use crate::scene::{generate_scene, Scene};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors a scene source can report
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Scene source failed: {0}")]
    Source(String),
}

/// Produces the knowledge scene for a question
#[async_trait]
pub trait SceneSource: Send + Sync {
    async fn generate(&self, question: &str) -> Result<Scene, GenerationError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SceneSource + ?Sized> SceneSource for Arc<T> {
    async fn generate(&self, question: &str) -> Result<Scene, GenerationError> {
        (**self).generate(question).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Scene source backed by the random generator
///
/// Seeding makes the sequence of generated scenes reproducible across runs.
pub struct SimulatedSceneSource {
    rng: Mutex<StdRng>,
}

impl SimulatedSceneSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl SceneSource for SimulatedSceneSource {
    async fn generate(&self, question: &str) -> Result<Scene, GenerationError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| GenerationError::Source("scene generator poisoned".to_string()))?;
        let scene = generate_scene(question, &mut *rng);
        tracing::debug!(
            nodes = scene.node_count(),
            connections = scene.connections.len(),
            steps = scene.step_count(),
            "Generated simulated scene"
        );
        Ok(scene)
    }
}
