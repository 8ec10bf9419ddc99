//! Session-oriented playback orchestration.

mod debug;
mod manager;

pub use debug::DebugSnapshot;
pub use manager::{Command, PlaybackState, SceneManager};
