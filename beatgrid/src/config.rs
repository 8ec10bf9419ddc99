//! Engine configuration.
//!
//! Configuration is plain serde data validated at construction time; every
//! violation surfaces as a fatal config error before the tick loop starts.

use std::path::Path;

use crate::canvas::Canvas;
use crate::clock::{BeatClock, Tempo};
use crate::foundation::core::GridSize;
use crate::foundation::error::{BeatgridError, BeatgridResult};

/// Tempo section: how audio time maps to animation beats.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct TempoConfig {
    /// Beats per minute of the audio track.
    pub bpm: f64,
    /// Animation ticks per musical beat.
    pub subdivisions: u32,
    /// Initial sync correction in seconds.
    #[serde(default)]
    pub offset_secs: f64,
}

/// Grid section: canvas dimensions and layer count.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct GridConfig {
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
    /// Number of canvas layers.
    pub layers: usize,
}

/// Top-level engine configuration.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Tempo mapping.
    pub tempo: TempoConfig,
    /// Canvas grid.
    pub grid: GridConfig,
    /// Seed for deterministic effect randomness.
    #[serde(default)]
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tempo: TempoConfig {
                bpm: 120.0,
                subdivisions: 4,
                offset_secs: 0.0,
            },
            grid: GridConfig {
                width: 80,
                height: 24,
                layers: 5,
            },
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> BeatgridResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| BeatgridError::config(format!("invalid config JSON: {e}")))
    }

    /// Load a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> BeatgridResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            BeatgridError::config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Build the validated beat clock.
    pub fn beat_clock(&self) -> BeatgridResult<BeatClock> {
        let tempo = Tempo::new(self.tempo.bpm, self.tempo.subdivisions)?;
        BeatClock::new(tempo, self.tempo.offset_secs)
    }

    /// Build the validated canvas.
    pub fn canvas(&self) -> BeatgridResult<Canvas> {
        let size = GridSize::new(self.grid.width, self.grid.height)?;
        Canvas::new(size, self.grid.layers)
    }
}
