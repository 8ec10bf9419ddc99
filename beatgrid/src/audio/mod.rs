//! Audio transport contract.
//!
//! The engine never decodes or plays audio itself; it polls a transport for
//! the playback position once per tick. Real players plug in behind
//! [`AudioTransport`]; the built-in transports cover silent runs
//! ([`WallClockTransport`]) and deterministic tests ([`ManualTransport`]).

use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Playback position/control contract the engine polls once per tick.
///
/// `position_secs` must be a cheap, non-blocking read.
pub trait AudioTransport {
    /// Current playback position in seconds.
    fn position_secs(&self) -> f64;
    /// Whether the transport is currently advancing.
    fn is_playing(&self) -> bool;
    /// Start or resume playback.
    fn play(&mut self);
    /// Pause playback, freezing the position.
    fn pause(&mut self);
    /// Jump to an absolute position in seconds (clamped at 0).
    fn seek(&mut self, secs: f64);
}

/// Wall-clock transport for running a show without an audio track.
///
/// Mirrors a player's transport semantics exactly: position advances with
/// real time while playing and freezes while paused.
#[derive(Debug)]
pub struct WallClockTransport {
    anchor: Instant,
    position_at_anchor: f64,
    playing: bool,
}

impl WallClockTransport {
    /// Create a stopped transport at position 0.
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
            position_at_anchor: 0.0,
            playing: false,
        }
    }
}

impl Default for WallClockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioTransport for WallClockTransport {
    fn position_secs(&self) -> f64 {
        if self.playing {
            self.position_at_anchor + self.anchor.elapsed().as_secs_f64()
        } else {
            self.position_at_anchor
        }
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        if !self.playing {
            self.anchor = Instant::now();
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        if self.playing {
            self.position_at_anchor += self.anchor.elapsed().as_secs_f64();
            self.playing = false;
        }
    }

    fn seek(&mut self, secs: f64) {
        self.position_at_anchor = secs.max(0.0);
        self.anchor = Instant::now();
    }
}

#[derive(Debug, Default)]
struct ManualState {
    position: f64,
    playing: bool,
}

/// Hand-driven transport for deterministic tests.
///
/// Clones share one position, so a test keeps a handle while the manager
/// owns the boxed transport.
#[derive(Clone, Debug, Default)]
pub struct ManualTransport {
    state: Arc<Mutex<ManualState>>,
}

impl ManualTransport {
    /// Create a stopped transport at position 0.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        // Poisoning cannot corrupt a plain position/flag pair; recover.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set the position directly, as a test's stand-in for elapsed time.
    pub fn set_position(&self, secs: f64) {
        self.lock().position = secs.max(0.0);
    }

    /// Advance the position by `secs`.
    pub fn advance(&self, secs: f64) {
        let mut state = self.lock();
        state.position = (state.position + secs).max(0.0);
    }
}

impl AudioTransport for ManualTransport {
    fn position_secs(&self) -> f64 {
        self.lock().position
    }

    fn is_playing(&self) -> bool {
        self.lock().playing
    }

    fn play(&mut self) {
        self.lock().playing = true;
    }

    fn pause(&mut self) {
        self.lock().playing = false;
    }

    fn seek(&mut self, secs: f64) {
        self.set_position(secs);
    }
}
