/// Convenience result type used across Beatgrid.
pub type BeatgridResult<T> = Result<T, BeatgridError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only [`BeatgridError::Config`] is allowed to abort startup; every per-tick
/// error is recovered inside [`crate::session::SceneManager::tick`] so a
/// single broken effect cannot stall the frame loop.
#[derive(thiserror::Error, Debug)]
pub enum BeatgridError {
    /// Invalid user-provided configuration (BPM, subdivisions, grid
    /// dimensions). Fatal before the loop starts.
    #[error("config error: {0}")]
    Config(String),

    /// Canvas write outside the configured layer stack.
    #[error("canvas error: {0}")]
    Canvas(String),

    /// A generator's update/render failed during a tick. Recovered by
    /// despawning the offending generator.
    #[error("generator fault: {0}")]
    Generator(String),

    /// A timeline event referenced a nonexistent scene or generator.
    /// Recovered by skipping the event.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BeatgridError {
    /// Build a [`BeatgridError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`BeatgridError::Canvas`] value.
    pub fn canvas(msg: impl Into<String>) -> Self {
        Self::Canvas(msg.into())
    }

    /// Build a [`BeatgridError::Generator`] value.
    pub fn generator(msg: impl Into<String>) -> Self {
        Self::Generator(msg.into())
    }

    /// Build a [`BeatgridError::Timeline`] value.
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }
}
