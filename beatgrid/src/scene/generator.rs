use std::sync::Arc;

use crate::canvas::Canvas;
use crate::foundation::core::{BeatIndex, GridSize};
use crate::foundation::error::BeatgridResult;
use crate::foundation::math::Rng64;
use crate::scene::data::{GenData, Value};

/// Per-tick context handed to every effect operation.
#[derive(Clone, Copy, Debug)]
pub struct TickCtx {
    /// Scene-local beat: global beat minus the beat the scene was entered at.
    pub beat: u64,
    /// Absolute beat index.
    pub global: BeatIndex,
    /// Progress through the current beat, in `[0, 1)`.
    pub phase: f64,
    /// Canvas dimensions.
    pub grid: GridSize,
    pub(crate) seed: u64,
}

impl TickCtx {
    /// Deterministic random stream for this tick.
    ///
    /// `salt` distinguishes independent streams within a tick; effects that
    /// draw several times pass distinct salts or reuse one generator.
    pub fn rng(&self, salt: u64) -> Rng64 {
        Rng64::for_tick(self.seed, self.global.0, salt)
    }
}

/// When a generator fires relative to its scene-local beat.
///
/// Every variant is a pure function of the beat, so replaying a tick
/// reproduces the exact firing pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Fire on every tick.
    Always,
    /// Fire only on the scene's first tick.
    Once,
    /// Fire when `beat % n == phase`.
    EveryN {
        /// Period in beats (0 is treated as 1).
        n: u64,
        /// Phase offset within the period.
        phase: u64,
    },
    /// Fire strictly before beat `n`.
    Before(u64),
    /// Fire at beat `n` and after.
    After(u64),
    /// Fire only at beat `n`.
    At(u64),
    /// Fire between two beats, inclusive.
    Between(u64, u64),
    /// Fire for `on` beats, then skip `off` beats, repeating.
    OnOff {
        /// Beats on at the start of each period.
        on: u64,
        /// Beats off at the end of each period.
        off: u64,
    },
    /// Never fire (placeholder generators that only exist to despawn).
    Never,
}

impl Predicate {
    /// Evaluate against a scene-local beat.
    pub fn eval(&self, beat: u64) -> bool {
        match *self {
            Self::Always => true,
            Self::Once => beat == 0,
            Self::EveryN { n, phase } => {
                let n = n.max(1);
                beat % n == phase % n
            }
            Self::Before(n) => beat < n,
            Self::After(n) => beat >= n,
            Self::At(n) => beat == n,
            Self::Between(a, b) => beat >= a && beat <= b,
            Self::OnOff { on, off } => {
                let period = (on + off).max(1);
                beat % period < on
            }
            Self::Never => false,
        }
    }
}

/// Lifecycle request returned by [`Effect::request`] each tick.
pub enum Lifecycle {
    /// Keep ticking.
    Keep,
    /// Spawn a new generator into the scene's dynamic set; it starts ticking
    /// on the next tick, never the current one.
    Spawn(GeneratorSpec),
    /// Remove this generator after the current tick completes.
    Despawn,
}

/// A visual effect: the four operations a generator evaluates per tick.
///
/// `update` and `render` run only on ticks where the generator's predicate
/// holds; `request` runs every tick so despawn can happen at any time. An
/// error from `render` is a generator fault: the manager logs it and
/// despawns the generator without disturbing the rest of the frame.
pub trait Effect {
    /// One-time initialization, after the spec's seed data is applied.
    fn on_spawn(&mut self, data: &mut GenData) {
        let _ = data;
    }

    /// Advance the effect's state by one beat.
    fn update(&mut self, data: &mut GenData, ctx: &TickCtx) {
        let _ = (data, ctx);
    }

    /// Draw into the generator's declared canvas layer.
    fn render(
        &mut self,
        data: &GenData,
        ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> BeatgridResult<()>;

    /// Lifecycle decision for this tick.
    fn request(&self, data: &GenData, ctx: &TickCtx) -> Lifecycle {
        let _ = (data, ctx);
        Lifecycle::Keep
    }
}

/// A live generator: one effect plus its exclusively-owned data store.
pub struct Generator {
    pub(crate) layer: usize,
    pub(crate) predicate: Predicate,
    pub(crate) effect: Box<dyn Effect>,
    pub(crate) data: GenData,
}

impl Generator {
    /// The canvas layer this generator renders to.
    pub fn layer(&self) -> usize {
        self.layer
    }

    /// The firing predicate.
    pub fn predicate(&self) -> Predicate {
        self.predicate
    }

    /// Read access to the data store.
    pub fn data(&self) -> &GenData {
        &self.data
    }

    /// Write access to the data store (the manager routes event pushes here).
    pub fn data_mut(&mut self) -> &mut GenData {
        &mut self.data
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("layer", &self.layer)
            .field("predicate", &self.predicate)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// Buildable template for a generator.
///
/// Scenes hold specs, not live generators: canonical generators are rebuilt
/// fresh from their specs on every scene entry, and dynamically spawned ones
/// are built from the spec carried by [`Lifecycle::Spawn`].
#[derive(Clone)]
pub struct GeneratorSpec {
    pub(crate) layer: usize,
    pub(crate) predicate: Predicate,
    seed_data: Vec<(String, Value)>,
    make: Arc<dyn Fn() -> Box<dyn Effect> + Send + Sync>,
}

impl GeneratorSpec {
    /// Create a spec from a layer, a predicate, and an effect factory.
    pub fn new(
        layer: usize,
        predicate: Predicate,
        make: impl Fn() -> Box<dyn Effect> + Send + Sync + 'static,
    ) -> Self {
        Self {
            layer,
            predicate,
            seed_data: Vec::new(),
            make: Arc::new(make),
        }
    }

    /// Seed an initial data entry, applied before the effect's `on_spawn`.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.seed_data.push((key.into(), value.into()));
        self
    }

    /// Build a live generator: seed data, then `on_spawn`.
    pub fn build(&self) -> Generator {
        let mut data = GenData::new();
        for (key, value) in &self.seed_data {
            data.set(key.clone(), value.clone());
        }
        let mut effect = (self.make)();
        effect.on_spawn(&mut data);
        Generator {
            layer: self.layer,
            predicate: self.predicate,
            effect,
            data,
        }
    }
}

impl std::fmt::Debug for GeneratorSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorSpec")
            .field("layer", &self.layer)
            .field("predicate", &self.predicate)
            .finish_non_exhaustive()
    }
}
