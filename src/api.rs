//! HTTP API for the thinking globe

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::config::Config;
use crate::runtime::{RuntimeManager, SceneSource, SimulatedSceneSource};
use crate::store::SessionStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeManager>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let source: Arc<dyn SceneSource> = Arc::new(SimulatedSceneSource::new(config.rng_seed));
        Self::with_source(source, config)
    }

    pub fn with_source(source: Arc<dyn SceneSource>, config: &Config) -> Self {
        Self {
            runtime: Arc::new(RuntimeManager::new(
                SessionStore::new(),
                source,
                config.sequencer,
            )),
        }
    }
}
