use crate::clock::{BeatTick, Tempo};
use crate::foundation::core::GridSize;
use crate::foundation::error::BeatgridResult;
use crate::render::frame::FrameGrid;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Grid dimensions of every frame that will be pushed.
    pub size: GridSize,
    /// Tempo driving the animation, for sinks that display timing.
    pub tempo: Tempo,
}

/// Sink contract for consuming composited frames.
///
/// `push_frame` is called once per tick while the manager is playing or
/// paused; beat ticks are monotonically non-decreasing between explicit
/// seeks.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> BeatgridResult<()>;
    /// Push one composited frame.
    fn push_frame(&mut self, tick: BeatTick, frame: &FrameGrid) -> BeatgridResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> BeatgridResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(BeatTick, FrameGrid)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(BeatTick, FrameGrid)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BeatgridResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, tick: BeatTick, frame: &FrameGrid) -> BeatgridResult<()> {
        self.frames.push((tick, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> BeatgridResult<()> {
        Ok(())
    }
}
