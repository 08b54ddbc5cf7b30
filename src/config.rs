//! Startup configuration read from the environment

use std::time::Duration;

/// Timing of the staged reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Pause before each node is revealed
    pub reveal_delay: Duration,
    /// Pause before each narration step
    pub narration_delay: Duration,
    /// How long the camera zooms before the globe starts "thinking"
    pub zoom_delay: Duration,
}

impl SequencerConfig {
    pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(300);
    pub const DEFAULT_NARRATION_DELAY: Duration = Duration::from_millis(500);
    pub const DEFAULT_ZOOM_DELAY: Duration = Duration::from_millis(500);

    pub fn from_env() -> Self {
        Self {
            reveal_delay: millis_from_env("GLOBE_REVEAL_DELAY_MS")
                .unwrap_or(Self::DEFAULT_REVEAL_DELAY),
            narration_delay: millis_from_env("GLOBE_NARRATION_DELAY_MS")
                .unwrap_or(Self::DEFAULT_NARRATION_DELAY),
            zoom_delay: millis_from_env("GLOBE_ZOOM_DELAY_MS").unwrap_or(Self::DEFAULT_ZOOM_DELAY),
        }
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Self::DEFAULT_REVEAL_DELAY,
            narration_delay: Self::DEFAULT_NARRATION_DELAY,
            zoom_delay: Self::DEFAULT_ZOOM_DELAY,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Fixed seed for scene generation; random when unset
    pub rng_seed: Option<u64>,
    pub sequencer: SequencerConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("GLOBE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            rng_seed: std::env::var("GLOBE_RNG_SEED")
                .ok()
                .and_then(|s| s.parse().ok()),
            sequencer: SequencerConfig::from_env(),
        }
    }
}

fn millis_from_env(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_millis)
}
