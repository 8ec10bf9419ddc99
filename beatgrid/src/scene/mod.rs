//! Scenes and generators.
//!
//! A [`Scene`] is a named, ordered collection of [`GeneratorSpec`]s that are
//! active together; the manager swaps scenes wholesale. Declared order is
//! tick-evaluation order; z-order comes from each generator's layer.

mod arena;
mod data;
mod generator;

pub use arena::GeneratorId;
pub use data::{GenData, Value};
pub use generator::{Effect, Generator, GeneratorSpec, Lifecycle, Predicate, TickCtx};

pub(crate) use arena::Arena;

/// A named, swappable set of generator specs.
///
/// Canonical generators are rebuilt fresh from these specs every time the
/// scene becomes active; data pushed into a previous activation does not
/// survive re-entry.
#[derive(Clone, Debug)]
pub struct Scene {
    name: String,
    specs: Vec<GeneratorSpec>,
}

impl Scene {
    /// Create a scene from its declared generators.
    pub fn new(name: impl Into<String>, specs: Vec<GeneratorSpec>) -> Self {
        Self {
            name: name.into(),
            specs,
        }
    }

    /// The scene's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared generator specs, in tick-evaluation order.
    pub fn specs(&self) -> &[GeneratorSpec] {
        &self.specs
    }
}
