//! Beatgrid is a beat-synchronized terminal character-grid animation engine.
//!
//! The engine converts elapsed audio time into discrete, subdivided beat ticks
//! and drives a declarative scene/generator/event model against a multi-layer
//! character canvas. The public API is session-oriented:
//!
//! - Describe [`Scene`]s as ordered sets of [`GeneratorSpec`]s
//! - Schedule one-shot [`Event`]s on a beat-indexed [`Timeline`]
//! - Create a [`SceneManager`] and call [`SceneManager::tick`] from a
//!   fixed-rate loop; composited frames go to a [`FrameSink`]
//!
//! Terminal painting, keyboard capture, and audio decoding stay outside the
//! engine; they plug in through [`FrameSink`], [`Command`], and
//! [`AudioTransport`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Audio transport contract and built-in transports.
pub mod audio;
/// Multi-layer character canvas and compositing.
pub mod canvas;
/// Beat clock: elapsed seconds to subdivided beat ticks.
pub mod clock;
/// Engine configuration loading and validation.
pub mod config;
/// Reusable visual effect catalogue.
pub mod effects;
/// Composited frame type and frame sinks.
pub mod render;
/// Scenes, generators, and the generator arena.
pub mod scene;
/// Session-oriented playback orchestration.
pub mod session;
/// Beat-indexed one-shot event timeline.
pub mod timeline;

pub use crate::foundation::core::{BeatIndex, GridPos, GridSize};
pub use crate::foundation::error::{BeatgridError, BeatgridResult};
pub use crate::foundation::math::Rng64;

pub use crate::audio::{AudioTransport, ManualTransport, WallClockTransport};
pub use crate::canvas::{Canvas, Cell, CellStyle, Color, Intensity};
pub use crate::clock::{BeatClock, BeatTick, Tempo};
pub use crate::config::EngineConfig;
pub use crate::render::{FrameGrid, FrameSink, InMemorySink, SinkConfig};
pub use crate::scene::{
    Effect, GenData, Generator, GeneratorId, GeneratorSpec, Lifecycle, Predicate, Scene, TickCtx,
    Value,
};
pub use crate::session::{Command, DebugSnapshot, PlaybackState, SceneManager};
pub use crate::timeline::{Event, EventAction, Timeline};
