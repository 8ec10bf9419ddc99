use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::time::Instant;

use crate::audio::AudioTransport;
use crate::canvas::Canvas;
use crate::clock::{BeatClock, BeatTick};
use crate::config::EngineConfig;
use crate::foundation::core::BeatIndex;
use crate::foundation::error::{BeatgridError, BeatgridResult};
use crate::render::{FrameGrid, FrameSink, SinkConfig};
use crate::scene::{Arena, GeneratorSpec, Lifecycle, Scene, TickCtx};
use crate::session::debug::{self, DebugSnapshot};
use crate::timeline::{Event, EventAction, Timeline};

const FPS_WINDOW: usize = 32;

/// Playback state machine of the manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Initial and reset state: no scene active, beat frozen at zero.
    Stopped,
    /// Ticks advance the beat and evaluate the active scene.
    Playing,
    /// Beat frozen at its last value; canvas state is retained.
    Paused,
}

/// Discrete commands delivered by the external input collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Stopped -> Playing, or Playing <-> Paused.
    TogglePlayback,
    /// Reset to the initial scene at beat zero and play.
    Restart,
    /// Seek relative to the current position, in seconds.
    SeekBy(f64),
    /// Seek to an absolute position, in seconds.
    SeekTo(f64),
    /// Toggle the debug overlay.
    ToggleDebug,
    /// Adjust the beat clock's sync offset by a delta, in seconds.
    NudgeOffset(f64),
}

#[derive(Debug)]
struct ActiveInfo {
    name: String,
    entered_at: BeatIndex,
}

/// Owns the scene registry, the event timeline, the canvas, and the clock;
/// advances everything by one frame per [`SceneManager::tick`] call.
///
/// The tick loop itself is driven by an external fixed-rate timer; beat
/// indices derive purely from the transport's elapsed time, so rendering
/// frame rate and musical timing stay decoupled.
pub struct SceneManager {
    clock: BeatClock,
    canvas: Canvas,
    timeline: Timeline,
    scenes: BTreeMap<String, Scene>,
    transport: Box<dyn AudioTransport>,
    state: PlaybackState,
    arena: Arena,
    active: Option<ActiveInfo>,
    initial_scene: String,
    last_tick: BeatTick,
    seed: u64,
    debug: bool,
    edits_last_frame: u32,
    frame_times: VecDeque<Instant>,
}

impl SceneManager {
    /// Build a manager from validated configuration, a scene registry, and a
    /// scheduled timeline.
    ///
    /// Fails fast with a config error on invalid tempo or grid values,
    /// duplicate scene names, or an unknown initial scene; nothing else
    /// aborts startup.
    pub fn new(
        config: &EngineConfig,
        scenes: Vec<Scene>,
        events: Vec<Event>,
        initial_scene: impl Into<String>,
        transport: Box<dyn AudioTransport>,
    ) -> BeatgridResult<Self> {
        let clock = config.beat_clock()?;
        let canvas = config.canvas()?;
        let initial_scene = initial_scene.into();

        let mut registry = BTreeMap::new();
        for scene in scenes {
            let name = scene.name().to_owned();
            if registry.insert(name.clone(), scene).is_some() {
                return Err(BeatgridError::config(format!("duplicate scene name '{name}'")));
            }
        }
        if !registry.contains_key(&initial_scene) {
            return Err(BeatgridError::config(format!(
                "initial scene '{initial_scene}' is not registered"
            )));
        }

        Ok(Self {
            clock,
            canvas,
            timeline: Timeline::from_events(events),
            scenes: registry,
            transport,
            state: PlaybackState::Stopped,
            arena: Arena::new(),
            active: None,
            initial_scene,
            last_tick: BeatTick::START,
            seed: config.seed,
            debug: false,
            edits_last_frame: 0,
            frame_times: VecDeque::with_capacity(FPS_WINDOW),
        })
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Latest clock reading (frozen while paused or stopped).
    pub fn current_tick(&self) -> BeatTick {
        self.last_tick
    }

    /// Name of the active scene, if one is entered.
    pub fn active_scene(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.name.as_str())
    }

    /// Whether the debug overlay is enabled.
    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Configuration a frame sink needs before the first frame.
    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            size: self.canvas.size(),
            tempo: self.clock.tempo(),
        }
    }

    /// Read-only state snapshot for the debug overlay.
    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            state: self.state,
            tick: self.last_tick,
            scene: self.active.as_ref().map(|a| a.name.clone()),
            live_generators: self.arena.live_count(),
            edits_last_frame: self.edits_last_frame,
            fps: self.fps_estimate(),
            offset_secs: self.clock.offset_secs(),
            events: (self.timeline.fired_count(), self.timeline.len()),
        }
    }

    /// Apply one external command.
    pub fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::TogglePlayback => match self.state {
                PlaybackState::Stopped => self.start(),
                PlaybackState::Playing => {
                    self.transport.pause();
                    self.state = PlaybackState::Paused;
                    tracing::debug!(beat = %self.last_tick.index, "paused");
                }
                PlaybackState::Paused => {
                    self.transport.play();
                    self.state = PlaybackState::Playing;
                    tracing::debug!(beat = %self.last_tick.index, "resumed");
                }
            },
            Command::Restart => {
                self.stop();
                self.start();
            }
            Command::SeekBy(delta) => {
                self.seek_to(self.transport.position_secs() + delta);
            }
            Command::SeekTo(secs) => self.seek_to(secs),
            Command::ToggleDebug => {
                self.debug = !self.debug;
                if !self.debug {
                    // The overlay owns the top layer; drop its leftovers.
                    let top = self.canvas.layer_count() - 1;
                    let _ = self.canvas.clear_layer(top);
                }
            }
            Command::NudgeOffset(delta) => {
                self.clock.nudge_offset_secs(delta);
                tracing::debug!(offset = self.clock.offset_secs(), "sync offset adjusted");
            }
        }
    }

    /// Advance one frame and return the clock reading plus the composited
    /// grid.
    ///
    /// While paused or stopped the beat stays frozen and no events or
    /// generators run; the last composited state is returned unchanged.
    pub fn tick(&mut self) -> (BeatTick, &FrameGrid) {
        self.note_frame_time();

        if self.state != PlaybackState::Playing {
            return (self.last_tick, self.canvas.composite());
        }

        let elapsed = self.transport.position_secs();
        let mut tick = self.clock.tick(elapsed);
        // Transport jitter must never rewind the beat; only explicit seeks
        // reset the latch.
        if tick.index < self.last_tick.index {
            tick = self.last_tick;
        }
        self.last_tick = tick;

        for action in self.timeline.fire_due(tick.index) {
            if let Err(e) = self.apply_action(&action) {
                tracing::warn!(beat = %tick.index, error = %e, "skipping timeline event");
            }
        }

        self.run_generators(tick);
        self.edits_last_frame = self.canvas.take_edit_count();

        if self.debug {
            let snap = self.debug_snapshot();
            if let Err(e) = debug::render_overlay(&mut self.canvas, &snap) {
                tracing::warn!(error = %e, "debug overlay failed");
            }
        }

        (tick, self.canvas.composite())
    }

    /// Advance one frame and push the result into `sink`.
    pub fn tick_into(&mut self, sink: &mut dyn FrameSink) -> BeatgridResult<BeatTick> {
        let (tick, frame) = self.tick();
        sink.push_frame(tick, frame)?;
        Ok(tick)
    }

    fn start(&mut self) {
        let at = self.last_tick.index;
        let initial = self.initial_scene.clone();
        if self.active.is_none() {
            // Cannot fail: the initial scene's presence is checked in `new`.
            if let Err(e) = self.enter_scene(&initial, at) {
                tracing::warn!(error = %e, "failed to enter initial scene");
                return;
            }
        }
        self.transport.play();
        self.state = PlaybackState::Playing;
        tracing::debug!(scene = %initial, beat = %at, "playing");
    }

    fn stop(&mut self) {
        self.transport.pause();
        self.transport.seek(0.0);
        self.timeline.reset();
        self.canvas.clear_all();
        self.arena.populate(&[]);
        self.active = None;
        self.last_tick = BeatTick::START;
        self.edits_last_frame = 0;
        self.state = PlaybackState::Stopped;
        tracing::debug!("stopped");
    }

    fn seek_to(&mut self, secs: f64) {
        let secs = secs.max(0.0);
        self.transport.seek(secs);
        let tick = self.clock.tick(secs);
        self.timeline.resync(tick.index);
        self.last_tick = tick;
        tracing::debug!(secs, beat = %tick.index, "seek");
    }

    fn apply_action(&mut self, action: &EventAction) -> BeatgridResult<()> {
        match action {
            EventAction::SwapScene { scene } => self.enter_scene(scene, self.last_tick.index),
            EventAction::PushData {
                scene,
                slot,
                entries,
            } => {
                self.require_active(scene)?;
                let entry = self.arena.declared_mut(*slot).ok_or_else(|| {
                    BeatgridError::timeline(format!(
                        "scene '{scene}' has no declared generator in slot {slot}"
                    ))
                })?;
                for (key, value) in entries {
                    entry.generator.data_mut().set(key.clone(), value.clone());
                }
                Ok(())
            }
            EventAction::SpawnGenerator { spec } => {
                if self.active.is_none() {
                    return Err(BeatgridError::timeline("spawn with no active scene"));
                }
                self.arena.queue_spawn(spec.clone());
                Ok(())
            }
            EventAction::RemoveGenerator { scene, slot } => {
                self.require_active(scene)?;
                let entry = self.arena.declared_mut(*slot).ok_or_else(|| {
                    BeatgridError::timeline(format!(
                        "scene '{scene}' has no declared generator in slot {slot}"
                    ))
                })?;
                entry.dead = true;
                Ok(())
            }
            EventAction::SetClockOffset { secs } => {
                self.clock.set_offset_secs(*secs);
                Ok(())
            }
        }
    }

    fn require_active(&self, scene: &str) -> BeatgridResult<()> {
        match self.active.as_ref() {
            Some(a) if a.name == scene => Ok(()),
            _ => Err(BeatgridError::timeline(format!(
                "scene '{scene}' is not active"
            ))),
        }
    }

    /// Swap the active scene: clear the canvas and rebuild the incoming
    /// scene's canonical generators. Dynamic generators die with the swap;
    /// the timeline is untouched (a plain swap never re-arms events).
    fn enter_scene(&mut self, name: &str, at: BeatIndex) -> BeatgridResult<()> {
        let scene = self
            .scenes
            .get(name)
            .ok_or_else(|| BeatgridError::timeline(format!("unknown scene '{name}'")))?;
        self.canvas.clear_all();
        self.arena.populate(scene.specs());
        self.active = Some(ActiveInfo {
            name: name.to_owned(),
            entered_at: at,
        });
        tracing::debug!(scene = %name, beat = %at, "scene entered");
        Ok(())
    }

    fn run_generators(&mut self, tick: BeatTick) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let ctx = TickCtx {
            beat: tick.index.since(active.entered_at),
            global: tick.index,
            phase: tick.phase,
            grid: self.canvas.size(),
            seed: self.seed,
        };

        let canvas = &mut self.canvas;
        let mut spawned: Vec<GeneratorSpec> = Vec::new();
        for entry in self.arena.entries_mut() {
            if entry.dead {
                continue;
            }
            let generator = &mut entry.generator;
            if generator.predicate.eval(ctx.beat) {
                let layer = generator.layer;
                generator.effect.update(&mut generator.data, &ctx);
                if let Err(e) = generator.effect.render(&generator.data, &ctx, layer, canvas) {
                    tracing::warn!(id = %entry.id, error = %e, "generator fault, despawning");
                    entry.dead = true;
                    // The faulted generator's layer may hold partial or stale
                    // output; drop it so the effect disappears from the frame.
                    if let Err(e) = canvas.clear_layer(layer) {
                        tracing::warn!(error = %e, "could not clear faulted layer");
                    }
                    continue;
                }
            }
            match generator.effect.request(&generator.data, &ctx) {
                Lifecycle::Keep => {}
                Lifecycle::Spawn(spec) => spawned.push(spec),
                Lifecycle::Despawn => entry.dead = true,
            }
        }
        for spec in spawned {
            self.arena.queue_spawn(spec);
        }
        self.arena.end_tick();
    }

    fn note_frame_time(&mut self) {
        if self.frame_times.len() == FPS_WINDOW {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(Instant::now());
    }

    fn fps_estimate(&self) -> f64 {
        if self.frame_times.len() < 2 {
            return 0.0;
        }
        let span = self
            .frame_times
            .back()
            .unwrap()
            .duration_since(*self.frame_times.front().unwrap())
            .as_secs_f64();
        if span <= 0.0 {
            return 0.0;
        }
        (self.frame_times.len() - 1) as f64 / span
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session.rs"]
mod tests;
