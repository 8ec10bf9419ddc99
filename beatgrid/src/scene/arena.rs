use crate::scene::generator::{Generator, GeneratorSpec};

/// Stable identity of a live generator within one manager run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneratorId(pub(crate) u64);

impl std::fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

#[derive(Debug)]
pub(crate) struct ArenaEntry {
    pub(crate) id: GeneratorId,
    /// `Some(slot)` for canonically-declared generators, addressed by events;
    /// `None` for dynamically spawned ones.
    pub(crate) declared_slot: Option<usize>,
    pub(crate) generator: Generator,
    pub(crate) dead: bool,
}

/// Slot table owning the active scene's live generators.
///
/// Spawns requested mid-tick are queued and built at the tick boundary so the
/// iteration set never changes while generators are being evaluated; dead
/// entries are compacted at the same boundary.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    entries: Vec<ArenaEntry>,
    pending: Vec<GeneratorSpec>,
    next_id: u64,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Build the canonical generators of a scene, in declared order.
    pub(crate) fn populate(&mut self, specs: &[GeneratorSpec]) {
        self.entries.clear();
        self.pending.clear();
        for (slot, spec) in specs.iter().enumerate() {
            let id = self.alloc_id();
            self.entries.push(ArenaEntry {
                id,
                declared_slot: Some(slot),
                generator: spec.build(),
                dead: false,
            });
        }
    }

    fn alloc_id(&mut self) -> GeneratorId {
        let id = GeneratorId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Queue a dynamic spawn; the generator is built at the next tick
    /// boundary and starts ticking on the following tick.
    pub(crate) fn queue_spawn(&mut self, spec: GeneratorSpec) {
        self.pending.push(spec);
    }

    /// Live (non-dead) generator count.
    pub(crate) fn live_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.dead).count()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [ArenaEntry] {
        &mut self.entries
    }

    /// Find a canonical generator by declared slot.
    pub(crate) fn declared_mut(&mut self, slot: usize) -> Option<&mut ArenaEntry> {
        self.entries
            .iter_mut()
            .find(|e| !e.dead && e.declared_slot == Some(slot))
    }

    /// Compact dead entries and admit queued spawns.
    pub(crate) fn end_tick(&mut self) {
        self.entries.retain(|e| !e.dead);
        for spec in self.pending.drain(..) {
            let id = GeneratorId(self.next_id);
            self.next_id += 1;
            self.entries.push(ArenaEntry {
                id,
                declared_slot: None,
                generator: spec.build(),
                dead: false,
            });
        }
    }
}
