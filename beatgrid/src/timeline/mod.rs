//! Beat-indexed one-shot event timeline.
//!
//! Events fire exactly once per forward playback pass: an event is due when
//! the clock's beat index first reaches or passes its beat. Seeking re-arms
//! or pre-fires events so that forward seeks never replay side effects and
//! backward seeks restore the pre-fired state at the new position.

use smallvec::SmallVec;

use crate::foundation::core::BeatIndex;
use crate::scene::{GeneratorSpec, Value};

/// Mutation an event applies to the running system when its beat arrives.
///
/// The vocabulary is closed so the timeline can re-arm and pre-fire events
/// without executing them, and so a broken reference (missing scene or slot)
/// degrades to a logged skip instead of a crash.
#[derive(Clone, Debug)]
pub enum EventAction {
    /// Replace the active scene, rebuilding its canonical generators.
    SwapScene {
        /// Name of the scene to activate.
        scene: String,
    },
    /// Push data entries into a declared generator of the active scene.
    PushData {
        /// Scene that must currently be active.
        scene: String,
        /// Declared slot index within the scene.
        slot: usize,
        /// Entries written into the generator's data store.
        entries: Vec<(String, Value)>,
    },
    /// Spawn a dynamic generator into the active scene.
    SpawnGenerator {
        /// Spec built into a live generator at the tick boundary.
        spec: GeneratorSpec,
    },
    /// Remove a declared generator from the active scene.
    RemoveGenerator {
        /// Scene that must currently be active.
        scene: String,
        /// Declared slot index within the scene.
        slot: usize,
    },
    /// Replace the beat clock's sync offset.
    SetClockOffset {
        /// New offset in seconds.
        secs: f64,
    },
}

/// A one-shot (beat, action) pair.
#[derive(Clone, Debug)]
pub struct Event {
    /// Beat index at which the action fires.
    pub beat: BeatIndex,
    /// The mutation to apply.
    pub action: EventAction,
}

impl Event {
    /// Construct an event.
    pub fn new(beat: u64, action: EventAction) -> Self {
        Self {
            beat: BeatIndex(beat),
            action,
        }
    }

    /// Convenience: swap to `scene` at `beat`.
    pub fn swap_scene(beat: u64, scene: impl Into<String>) -> Self {
        Self::new(
            beat,
            EventAction::SwapScene {
                scene: scene.into(),
            },
        )
    }

    /// Convenience: push data entries into a declared generator at `beat`.
    pub fn push_data(
        beat: u64,
        scene: impl Into<String>,
        slot: usize,
        entries: Vec<(String, Value)>,
    ) -> Self {
        Self::new(
            beat,
            EventAction::PushData {
                scene: scene.into(),
                slot,
                entries,
            },
        )
    }

    /// Convenience: spawn a dynamic generator at `beat`.
    pub fn spawn(beat: u64, spec: GeneratorSpec) -> Self {
        Self::new(beat, EventAction::SpawnGenerator { spec })
    }

    /// Convenience: remove a declared generator at `beat`.
    pub fn remove(beat: u64, scene: impl Into<String>, slot: usize) -> Self {
        Self::new(
            beat,
            EventAction::RemoveGenerator {
                scene: scene.into(),
                slot,
            },
        )
    }
}

#[derive(Clone, Debug)]
struct Scheduled {
    beat: BeatIndex,
    seq: u64,
    action: EventAction,
    fired: bool,
}

/// Ordered-by-beat event schedule with per-event fired marks.
///
/// Ties on the same beat break by registration order.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    events: Vec<Scheduled>,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timeline from a batch of events.
    pub fn from_events(events: Vec<Event>) -> Self {
        let mut timeline = Self::new();
        for event in events {
            timeline.push(event);
        }
        timeline
    }

    /// Schedule one event. Events are immutable once scheduled.
    pub fn push(&mut self, event: Event) {
        let seq = self.events.len() as u64;
        self.events.push(Scheduled {
            beat: event.beat,
            seq,
            action: event.action,
            fired: false,
        });
        // Stable ordering key; sort is cheap because pushes happen at build
        // time, not inside the tick loop.
        self.events.sort_by_key(|e| (e.beat, e.seq));
    }

    /// Total scheduled event count.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are scheduled.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events currently marked fired.
    pub fn fired_count(&self) -> usize {
        self.events.iter().filter(|e| e.fired).count()
    }

    /// Mark and return every unfired action with `beat <= now`, in
    /// (beat, registration) order.
    pub fn fire_due(&mut self, now: BeatIndex) -> SmallVec<[EventAction; 4]> {
        let mut due = SmallVec::new();
        for event in &mut self.events {
            if event.beat > now {
                break;
            }
            if !event.fired {
                event.fired = true;
                due.push(event.action.clone());
            }
        }
        due
    }

    /// Re-evaluate fired marks against a new playback position.
    ///
    /// Events at or before `now` are marked fired without running (forward
    /// seeks never replay side effects); events after `now` are re-armed so
    /// a backward seek restores the pre-fired state at that point in time.
    pub fn resync(&mut self, now: BeatIndex) {
        for event in &mut self.events {
            event.fired = event.beat <= now;
        }
    }

    /// Re-arm every event (restart from beat zero).
    pub fn reset(&mut self) {
        for event in &mut self.events {
            event.fired = false;
        }
    }
}
