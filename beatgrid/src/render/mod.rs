//! Composited frame output and the sink contract.

mod frame;
mod sink;

pub use frame::FrameGrid;
pub use sink::{FrameSink, InMemorySink, SinkConfig};
