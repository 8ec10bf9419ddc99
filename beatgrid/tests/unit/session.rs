use super::*;

use crate::audio::ManualTransport;
use crate::canvas::CellStyle;
use crate::config::{GridConfig, TempoConfig};
use crate::foundation::core::GridPos;
use crate::render::InMemorySink;
use crate::scene::{Effect, GenData, Predicate};

/// Renders one fixed character every firing tick.
#[derive(Clone, Copy)]
struct Stamp {
    ch: char,
    pos: GridPos,
}

impl Effect for Stamp {
    fn render(
        &mut self,
        _data: &GenData,
        _ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> crate::BeatgridResult<()> {
        canvas.set_cell(
            layer,
            self.pos,
            crate::canvas::Cell::new(self.ch, CellStyle::default()),
        )
    }
}

/// Renders the `text` data entry at a fixed position.
#[derive(Clone, Copy)]
struct DataStamp {
    pos: GridPos,
}

impl Effect for DataStamp {
    fn render(
        &mut self,
        data: &GenData,
        _ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> crate::BeatgridResult<()> {
        if let Some(text) = data.text("text") {
            canvas.set_string(layer, self.pos, text, CellStyle::default())?;
        }
        Ok(())
    }
}

/// Renders fine until the given scene-local beat, then errors.
#[derive(Clone, Copy)]
struct FailAt {
    beat: u64,
    inner: Stamp,
}

impl Effect for FailAt {
    fn render(
        &mut self,
        data: &GenData,
        ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> crate::BeatgridResult<()> {
        if ctx.beat >= self.beat {
            return Err(crate::BeatgridError::generator("intentional test fault"));
        }
        self.inner.render(data, ctx, layer, canvas)
    }
}

/// Requests one dynamic spawn on the scene's first beat.
struct SpawnerAtZero {
    spawn: GeneratorSpec,
}

impl Effect for SpawnerAtZero {
    fn render(
        &mut self,
        _data: &GenData,
        _ctx: &TickCtx,
        _layer: usize,
        _canvas: &mut Canvas,
    ) -> crate::BeatgridResult<()> {
        Ok(())
    }

    fn request(&self, _data: &GenData, ctx: &TickCtx) -> Lifecycle {
        if ctx.beat == 0 {
            Lifecycle::Spawn(self.spawn.clone())
        } else {
            Lifecycle::Keep
        }
    }
}

fn stamp_spec(layer: usize, ch: char, x: i32, y: i32) -> GeneratorSpec {
    GeneratorSpec::new(layer, Predicate::Always, move || {
        Box::new(Stamp {
            ch,
            pos: GridPos::new(x, y),
        })
    })
}

/// 60 BPM, one subdivision: the beat index equals whole elapsed seconds.
fn config() -> EngineConfig {
    EngineConfig {
        tempo: TempoConfig {
            bpm: 60.0,
            subdivisions: 1,
            offset_secs: 0.0,
        },
        grid: GridConfig {
            width: 16,
            height: 8,
            layers: 3,
        },
        seed: 1,
    }
}

fn manager(
    scenes: Vec<Scene>,
    events: Vec<Event>,
    initial: &str,
) -> (SceneManager, ManualTransport) {
    let transport = ManualTransport::new();
    let mgr = SceneManager::new(
        &config(),
        scenes,
        events,
        initial,
        Box::new(transport.clone()),
    )
    .unwrap();
    (mgr, transport)
}

fn char_at(frame: &FrameGrid, x: i32, y: i32) -> char {
    frame.cell(GridPos::new(x, y)).ch
}

#[test]
fn construction_rejects_duplicate_and_unknown_scenes() {
    let transport = ManualTransport::new();
    let dup = SceneManager::new(
        &config(),
        vec![
            Scene::new("a", vec![stamp_spec(0, 'a', 0, 0)]),
            Scene::new("a", vec![]),
        ],
        vec![],
        "a",
        Box::new(transport.clone()),
    );
    assert!(matches!(dup, Err(BeatgridError::Config(_))));

    let missing = SceneManager::new(
        &config(),
        vec![Scene::new("a", vec![])],
        vec![],
        "nope",
        Box::new(transport),
    );
    assert!(matches!(missing, Err(BeatgridError::Config(_))));
}

#[test]
fn first_tick_renders_the_initial_scene() {
    let (mut mgr, transport) = manager(
        vec![Scene::new("main", vec![stamp_spec(0, 'a', 0, 0)])],
        vec![],
        "main",
    );
    assert_eq!(mgr.state(), PlaybackState::Stopped);
    mgr.handle_command(Command::TogglePlayback);
    assert_eq!(mgr.state(), PlaybackState::Playing);

    transport.set_position(0.0);
    let (tick, frame) = mgr.tick();
    assert_eq!(tick.index, BeatIndex(0));
    assert_eq!(char_at(frame, 0, 0), 'a');
}

#[test]
fn events_fire_before_generators_within_one_tick() {
    let spec = GeneratorSpec::new(0, Predicate::Always, || {
        Box::new(DataStamp {
            pos: GridPos::new(0, 0),
        })
    });
    let (mut mgr, transport) = manager(
        vec![Scene::new("lyrics", vec![spec])],
        vec![Event::push_data(0, "lyrics", 0, vec![("text".into(), "hi".into())])],
        "lyrics",
    );
    mgr.handle_command(Command::TogglePlayback);
    transport.set_position(0.0);
    let (_, frame) = mgr.tick();
    assert_eq!(char_at(frame, 0, 0), 'h');
    assert_eq!(char_at(frame, 1, 0), 'i');
}

#[test]
fn scene_swap_replaces_generator_set_and_silences_the_old_scene() {
    let (mut mgr, transport) = manager(
        vec![
            Scene::new("a", vec![stamp_spec(0, 'a', 0, 0)]),
            Scene::new("b", vec![stamp_spec(0, 'b', 1, 0)]),
        ],
        vec![Event::swap_scene(2, "b")],
        "a",
    );
    mgr.handle_command(Command::TogglePlayback);

    transport.set_position(0.0);
    let (_, frame) = mgr.tick();
    assert_eq!(char_at(frame, 0, 0), 'a');

    transport.set_position(2.0);
    let (_, frame) = mgr.tick();
    assert_eq!(char_at(frame, 1, 0), 'b');
    // The swap cleared the outgoing scene's pixels.
    assert_eq!(char_at(frame, 0, 0), ' ');
    assert_eq!(mgr.active_scene(), Some("b"));

    transport.set_position(3.0);
    let (_, frame) = mgr.tick();
    assert_eq!(char_at(frame, 0, 0), ' ', "old scene must produce no further output");
}

#[test]
fn faulting_generator_despawns_without_breaking_the_frame() {
    let fail = GeneratorSpec::new(1, Predicate::Always, || {
        Box::new(FailAt {
            beat: 1,
            inner: Stamp {
                ch: 'f',
                pos: GridPos::new(0, 0),
            },
        })
    });
    let (mut mgr, transport) = manager(
        vec![Scene::new("s", vec![fail, stamp_spec(0, 'g', 1, 0)])],
        vec![],
        "s",
    );
    mgr.handle_command(Command::TogglePlayback);

    transport.set_position(0.0);
    let (_, frame) = mgr.tick();
    assert_eq!(char_at(frame, 0, 0), 'f');
    assert_eq!(char_at(frame, 1, 0), 'g');
    assert_eq!(mgr.debug_snapshot().live_generators, 2);

    // Tick N: the fault is contained, the healthy generator still renders.
    transport.set_position(1.0);
    let (_, frame) = mgr.tick();
    assert_eq!(char_at(frame, 1, 0), 'g');
    assert_eq!(mgr.debug_snapshot().live_generators, 1);

    // Tick N+1: the faulted effect has disappeared from the canvas.
    transport.set_position(2.0);
    let (_, frame) = mgr.tick();
    assert_eq!(char_at(frame, 0, 0), ' ');
    assert_eq!(char_at(frame, 1, 0), 'g');
}

#[test]
fn dynamic_spawn_begins_on_the_next_tick() {
    let spawner = GeneratorSpec::new(0, Predicate::Always, || {
        Box::new(SpawnerAtZero {
            spawn: stamp_spec(1, 'n', 2, 0),
        })
    });
    let (mut mgr, transport) = manager(vec![Scene::new("s", vec![spawner])], vec![], "s");
    mgr.handle_command(Command::TogglePlayback);

    transport.set_position(0.0);
    let (_, frame) = mgr.tick();
    assert_eq!(char_at(frame, 2, 0), ' ', "spawned generator must not tick on the same frame");

    transport.set_position(1.0);
    let (_, frame) = mgr.tick();
    assert_eq!(char_at(frame, 2, 0), 'n');
    assert_eq!(mgr.debug_snapshot().live_generators, 2);
}

#[test]
fn pause_freezes_the_beat_and_resume_continues_without_a_jump() {
    let (mut mgr, transport) = manager(
        vec![Scene::new("s", vec![stamp_spec(0, 'a', 0, 0)])],
        vec![],
        "s",
    );
    mgr.handle_command(Command::TogglePlayback);
    transport.set_position(5.0);
    let (tick, _) = mgr.tick();
    assert_eq!(tick.index, BeatIndex(5));

    mgr.handle_command(Command::TogglePlayback);
    assert_eq!(mgr.state(), PlaybackState::Paused);
    for _ in 0..3 {
        let (tick, frame) = mgr.tick();
        assert_eq!(tick.index, BeatIndex(5), "beat must stay frozen while paused");
        assert_eq!(char_at(frame, 0, 0), 'a', "canvas state is retained while paused");
    }

    mgr.handle_command(Command::TogglePlayback);
    let (tick, _) = mgr.tick();
    assert_eq!(tick.index, BeatIndex(5), "resume must not jump");

    transport.set_position(6.0);
    let (tick, _) = mgr.tick();
    assert_eq!(tick.index, BeatIndex(6));
}

#[test]
fn backward_seek_rearms_an_event_for_exactly_one_refire() {
    let spawn = stamp_spec(1, 'e', 5, 0);
    let (mut mgr, transport) = manager(
        vec![Scene::new("s", vec![stamp_spec(0, 'a', 0, 0)])],
        vec![Event::spawn(60, spawn)],
        "s",
    );
    mgr.handle_command(Command::TogglePlayback);

    transport.set_position(61.0);
    mgr.tick();
    assert_eq!(mgr.debug_snapshot().live_generators, 2, "event fired on the forward pass");

    transport.set_position(62.0);
    mgr.tick();
    assert_eq!(mgr.debug_snapshot().live_generators, 2, "no double fire within one pass");

    mgr.handle_command(Command::SeekTo(10.0));
    transport.set_position(10.5);
    mgr.tick();
    assert_eq!(mgr.debug_snapshot().live_generators, 2, "rearmed event must wait for its beat");

    transport.set_position(61.0);
    mgr.tick();
    transport.set_position(62.0);
    mgr.tick();
    assert_eq!(
        mgr.debug_snapshot().live_generators,
        3,
        "exactly one re-fire after a genuine backward seek"
    );
}

#[test]
fn forward_seek_skips_side_effects() {
    let (mut mgr, transport) = manager(
        vec![Scene::new("s", vec![stamp_spec(0, 'a', 0, 0)])],
        vec![Event::spawn(30, stamp_spec(1, 'e', 5, 0))],
        "s",
    );
    mgr.handle_command(Command::TogglePlayback);
    transport.set_position(0.0);
    mgr.tick();

    mgr.handle_command(Command::SeekTo(45.0));
    transport.set_position(45.0);
    mgr.tick();
    assert_eq!(
        mgr.debug_snapshot().live_generators,
        1,
        "forward seek must never replay event side effects"
    );
}

#[test]
fn restart_resets_to_the_initial_scene_at_beat_zero() {
    let (mut mgr, transport) = manager(
        vec![
            Scene::new("a", vec![stamp_spec(0, 'a', 0, 0)]),
            Scene::new("b", vec![stamp_spec(0, 'b', 1, 0)]),
        ],
        vec![Event::swap_scene(3, "b")],
        "a",
    );
    mgr.handle_command(Command::TogglePlayback);
    transport.set_position(4.0);
    mgr.tick();
    assert_eq!(mgr.active_scene(), Some("b"));

    mgr.handle_command(Command::Restart);
    assert_eq!(mgr.state(), PlaybackState::Playing);
    let (tick, frame) = mgr.tick();
    assert_eq!(tick.index, BeatIndex(0));
    assert_eq!(char_at(frame, 0, 0), 'a');
    assert_eq!(mgr.active_scene(), Some("a"));

    // The restart re-armed the swap event for the new pass.
    transport.set_position(3.0);
    mgr.tick();
    assert_eq!(mgr.active_scene(), Some("b"));
}

#[test]
fn event_referencing_inactive_scene_is_skipped() {
    let (mut mgr, transport) = manager(
        vec![
            Scene::new("a", vec![stamp_spec(0, 'a', 0, 0)]),
            Scene::new("b", vec![stamp_spec(0, 'b', 1, 0)]),
        ],
        vec![
            Event::push_data(0, "b", 0, vec![("text".into(), "x".into())]),
            Event::push_data(0, "a", 99, vec![("text".into(), "x".into())]),
        ],
        "a",
    );
    mgr.handle_command(Command::TogglePlayback);
    transport.set_position(0.0);
    let (_, frame) = mgr.tick();
    // Both events were skipped; the frame still completed.
    assert_eq!(char_at(frame, 0, 0), 'a');
}

#[test]
fn transport_jitter_never_rewinds_the_beat() {
    let (mut mgr, transport) = manager(
        vec![Scene::new("s", vec![stamp_spec(0, 'a', 0, 0)])],
        vec![],
        "s",
    );
    mgr.handle_command(Command::TogglePlayback);
    transport.set_position(5.0);
    let (tick, _) = mgr.tick();
    assert_eq!(tick.index, BeatIndex(5));

    // Position regressed without an explicit seek: the beat holds.
    transport.set_position(4.6);
    let (tick, _) = mgr.tick();
    assert_eq!(tick.index, BeatIndex(5));
}

#[test]
fn tick_into_pushes_frames_to_a_sink() {
    let (mut mgr, transport) = manager(
        vec![Scene::new("s", vec![stamp_spec(0, 'a', 0, 0)])],
        vec![],
        "s",
    );
    let mut sink = InMemorySink::new();
    sink.begin(mgr.sink_config()).unwrap();

    mgr.handle_command(Command::TogglePlayback);
    for i in 0..4 {
        transport.set_position(i as f64 * 0.25);
        mgr.tick_into(&mut sink).unwrap();
    }
    sink.end().unwrap();

    assert_eq!(sink.frames().len(), 4);
    let cfg = sink.config().unwrap();
    assert_eq!(cfg.size.width, 16);
    assert_eq!(char_at(&sink.frames()[0].1, 0, 0), 'a');
}
