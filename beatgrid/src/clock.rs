use crate::foundation::core::BeatIndex;
use crate::foundation::error::{BeatgridError, BeatgridResult};

/// Musical tempo: beats per minute plus the animation subdivision count.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tempo {
    /// Beats per minute of the audio track, must be > 0 and finite.
    pub bpm: f64,
    /// Animation ticks per musical beat, must be >= 1.
    pub subdivisions: u32,
}

impl Tempo {
    /// Create a validated tempo.
    pub fn new(bpm: f64, subdivisions: u32) -> BeatgridResult<Self> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(BeatgridError::config("bpm must be a finite value > 0"));
        }
        if subdivisions == 0 {
            return Err(BeatgridError::config("subdivisions must be >= 1"));
        }
        Ok(Self { bpm, subdivisions })
    }

    /// Effective animation BPM: `bpm * subdivisions`.
    pub fn animation_bpm(self) -> f64 {
        self.bpm * f64::from(self.subdivisions)
    }

    /// Duration of one animation beat in seconds.
    pub fn beat_duration_secs(self) -> f64 {
        60.0 / self.animation_bpm()
    }
}

/// One clock reading: the current beat and the progress through it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeatTick {
    /// Current subdivided beat index.
    pub index: BeatIndex,
    /// Fractional progress through the current beat, in `[0, 1)`.
    pub phase: f64,
}

impl BeatTick {
    /// The reading before playback has reached the animation start.
    pub const START: Self = Self {
        index: BeatIndex::ZERO,
        phase: 0.0,
    };
}

/// Converts elapsed audio time into subdivided beat ticks.
///
/// The clock is a pure function of elapsed seconds and its configuration: it
/// keeps no accumulated state, so seeking the audio transport to any
/// timestamp immediately yields a consistent beat index. The only mutable
/// piece is `offset_secs`, the user-adjustable sync correction, which takes
/// effect on the next [`BeatClock::tick`] call.
#[derive(Clone, Copy, Debug)]
pub struct BeatClock {
    tempo: Tempo,
    offset_secs: f64,
}

impl BeatClock {
    /// Create a clock from a validated tempo and an initial sync offset.
    pub fn new(tempo: Tempo, offset_secs: f64) -> BeatgridResult<Self> {
        if !offset_secs.is_finite() {
            return Err(BeatgridError::config("offset must be a finite value"));
        }
        Ok(Self { tempo, offset_secs })
    }

    /// The configured tempo.
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Current sync offset in seconds.
    pub fn offset_secs(&self) -> f64 {
        self.offset_secs
    }

    /// Replace the sync offset. Non-finite values are ignored.
    pub fn set_offset_secs(&mut self, offset_secs: f64) {
        if offset_secs.is_finite() {
            self.offset_secs = offset_secs;
        }
    }

    /// Nudge the sync offset by `delta` seconds.
    pub fn nudge_offset_secs(&mut self, delta: f64) {
        self.set_offset_secs(self.offset_secs + delta);
    }

    /// Convert elapsed playback seconds into a beat reading.
    ///
    /// Elapsed time before the offset clamps to beat 0 with phase 0; the
    /// index is never negative.
    pub fn tick(&self, elapsed_secs: f64) -> BeatTick {
        let local = elapsed_secs - self.offset_secs;
        if !local.is_finite() || local <= 0.0 {
            return BeatTick::START;
        }
        let beats = local * self.tempo.animation_bpm() / 60.0;
        let index = beats.floor();
        BeatTick {
            index: BeatIndex(index as u64),
            phase: (beats - index).clamp(0.0, 1.0 - f64::EPSILON),
        }
    }

    /// Beat index a given elapsed time maps to (convenience for seeks).
    pub fn beat_at(&self, elapsed_secs: f64) -> BeatIndex {
        self.tick(elapsed_secs).index
    }
}

#[cfg(test)]
#[path = "../tests/unit/clock.rs"]
mod tests;
