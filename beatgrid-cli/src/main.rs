mod demo;
mod term;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use beatgrid::{
    AudioTransport, Command, EngineConfig, FrameSink, InMemorySink, ManualTransport, SceneManager,
    WallClockTransport,
};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing_subscriber::EnvFilter;

const TICK_RATE_HZ: f64 = 60.0;

#[derive(Parser, Debug)]
#[command(name = "beatgrid", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the built-in demo show in the terminal.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Engine configuration JSON (tempo/grid/seed). Defaults are used when
    /// omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured BPM.
    #[arg(long)]
    bpm: Option<f64>,

    /// Override the configured subdivisions per beat.
    #[arg(long)]
    subdivisions: Option<u32>,

    /// Override the configured sync offset in seconds.
    #[arg(long)]
    offset: Option<f64>,

    /// Start with the debug overlay enabled.
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Render without a terminal (in-memory sink), for CI and smoke tests.
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Stop after this many ticks (0 = run until quit).
    #[arg(long, default_value_t = 0)]
    ticks: u64,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Play(args) => cmd_play(args),
    }
}

fn load_config(args: &PlayArgs) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(bpm) = args.bpm {
        config.tempo.bpm = bpm;
    }
    if let Some(subdivisions) = args.subdivisions {
        config.tempo.subdivisions = subdivisions;
    }
    if let Some(offset) = args.offset {
        config.tempo.offset_secs = offset;
    }
    tracing::debug!(?config, "engine configuration");
    Ok(config)
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    if args.headless {
        play_headless(&config, &args)
    } else {
        play_interactive(&config, &args)
    }
}

/// Deterministic run against a hand-driven transport; frames land in memory
/// and a one-line summary is printed.
fn play_headless(config: &EngineConfig, args: &PlayArgs) -> anyhow::Result<()> {
    let ticks = if args.ticks == 0 { 120 } else { args.ticks };
    let transport = ManualTransport::new();
    let mut manager = SceneManager::new(
        config,
        demo::scenes(),
        demo::events(),
        demo::initial_scene(),
        Box::new(transport.clone()),
    )?;
    if args.debug {
        manager.handle_command(Command::ToggleDebug);
    }

    let mut sink = InMemorySink::new();
    sink.begin(manager.sink_config())?;
    manager.handle_command(Command::TogglePlayback);
    for i in 0..ticks {
        transport.set_position(i as f64 / TICK_RATE_HZ);
        manager.tick_into(&mut sink)?;
    }
    sink.end()?;

    let last = manager.current_tick();
    println!(
        "rendered {} frames, final beat {} (scene {})",
        sink.frames().len(),
        last.index,
        manager.active_scene().unwrap_or("-"),
    );
    Ok(())
}

fn play_interactive(config: &EngineConfig, args: &PlayArgs) -> anyhow::Result<()> {
    let transport: Box<dyn AudioTransport> = Box::new(WallClockTransport::new());
    let mut manager = SceneManager::new(
        config,
        demo::scenes(),
        demo::events(),
        demo::initial_scene(),
        transport,
    )?;
    if args.debug {
        manager.handle_command(Command::ToggleDebug);
    }

    let mut sink = term::TerminalSink::new();
    sink.begin(manager.sink_config())?;
    manager.handle_command(Command::TogglePlayback);

    let frame_budget = Duration::from_secs_f64(1.0 / TICK_RATE_HZ);
    let mut ticks_done = 0u64;
    let result = loop {
        let frame_start = Instant::now();

        if let Some(cmd) = poll_command(frame_budget / 4)? {
            match cmd {
                InputAction::Quit => break Ok(()),
                InputAction::Engine(cmd) => manager.handle_command(cmd),
            }
        }

        if let Err(e) = manager.tick_into(&mut sink) {
            break Err(e).context("render tick");
        }

        ticks_done += 1;
        if args.ticks > 0 && ticks_done >= args.ticks {
            break Ok(());
        }

        let spent = frame_start.elapsed();
        if spent < frame_budget {
            std::thread::sleep(frame_budget - spent);
        }
    };

    sink.end()?;
    result
}

enum InputAction {
    Engine(Command),
    Quit,
}

/// Map one pending key event to an action, waiting at most `budget`.
fn poll_command(budget: Duration) -> anyhow::Result<Option<InputAction>> {
    if !event::poll(budget).context("poll input")? {
        return Ok(None);
    }
    let TermEvent::Key(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }) = event::read().context("read input")?
    else {
        return Ok(None);
    };
    if kind != KeyEventKind::Press {
        return Ok(None);
    }

    let action = match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(InputAction::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(InputAction::Quit),
        KeyCode::Char(' ') => Some(InputAction::Engine(Command::TogglePlayback)),
        KeyCode::Char('r') => Some(InputAction::Engine(Command::Restart)),
        KeyCode::Char('d') => Some(InputAction::Engine(Command::ToggleDebug)),
        KeyCode::Left => Some(InputAction::Engine(Command::SeekBy(-2.0))),
        KeyCode::Right => Some(InputAction::Engine(Command::SeekBy(2.0))),
        KeyCode::Char('[') => Some(InputAction::Engine(Command::NudgeOffset(-0.01))),
        KeyCode::Char(']') => Some(InputAction::Engine(Command::NudgeOffset(0.01))),
        _ => None,
    };
    Ok(action)
}

fn init_tracing() {
    // Interactive runs own the terminal; keep tracing quiet unless asked.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .try_init();
}
