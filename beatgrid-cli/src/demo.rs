//! Built-in demo show: a handful of scenes cycling on a fixed beat grid.
//!
//! Layer plan: 0 backdrop, 1 ambient motion, 2 text, 3 accents,
//! 4 debug overlay (owned by the engine).

use beatgrid::effects::{Blink, ClearLayer, MatrixRain, Noise, ProgressBar, Pulse, Scramble, Typewriter, Wave};
use beatgrid::{CellStyle, Color, Event, GridPos, GeneratorSpec, Predicate, Scene};

const INTRO_TEXT: &str = "signal acquired\ncalibrating beat grid\nstand by";
const OCEAN_TEXT: &str = "low tide\nthe grid breathes in waves";
const STORM_TEXT: &str = "STORM FRONT";
const RAIN_TEXT: &str = "digital rainfall";
const FINALE_TEXT: &str = "resolve";

/// Section boundaries, in subdivided beats.
const OCEAN_AT: u64 = 64;
const STORM_AT: u64 = 128;
const RAIN_AT: u64 = 192;
const FINALE_AT: u64 = 256;
const LOOP_AT: u64 = 336;

pub fn scenes() -> Vec<Scene> {
    vec![
        Scene::new(
            "intro",
            vec![
                GeneratorSpec::new(0, Predicate::Once, || Box::new(ClearLayer)),
                GeneratorSpec::new(2, Predicate::Always, || {
                    Box::new(Typewriter::new(
                        GridPos::new(4, 4),
                        CellStyle::bright(Color::Cyan),
                        2,
                    ))
                })
                .with_data("text", INTRO_TEXT),
                GeneratorSpec::new(3, Predicate::Always, || {
                    Box::new(Blink::new(
                        GridPos::new(0, 0),
                        "##",
                        CellStyle::bright(Color::Yellow),
                        CellStyle::bright(Color::Red),
                    ))
                }),
            ],
        ),
        Scene::new(
            "ocean",
            vec![
                GeneratorSpec::new(1, Predicate::Always, || {
                    Box::new(Wave::new(16, 3.0, 0.35, 0.6))
                }),
                GeneratorSpec::new(1, Predicate::EveryN { n: 8, phase: 0 }, || {
                    Box::new(
                        Wave::new(19, 1.5, 0.5, -0.4)
                            .with_look('-', CellStyle::dim(Color::Cyan)),
                    )
                }),
                GeneratorSpec::new(2, Predicate::Always, || {
                    Box::new(Typewriter::new(
                        GridPos::new(6, 5),
                        CellStyle::bright(Color::White),
                        3,
                    ))
                })
                .with_data("text", OCEAN_TEXT),
            ],
        ),
        Scene::new(
            "storm",
            vec![
                GeneratorSpec::new(1, Predicate::Always, || Box::new(Noise::glitch(1)))
                    .with_data("intensity", 18i64),
                GeneratorSpec::new(3, Predicate::Always, || {
                    Box::new(Pulse::centered(
                        GridPos::new(0, 10),
                        CellStyle::fg(Color::Red),
                    ))
                })
                .with_data("text", STORM_TEXT),
            ],
        ),
        Scene::new(
            "rain",
            vec![
                GeneratorSpec::new(1, Predicate::Always, || Box::new(MatrixRain::new(2)))
                    .with_data("density", 14i64),
                GeneratorSpec::new(2, Predicate::After(8), || {
                    Box::new(Scramble::new(
                        GridPos::new(8, 12),
                        CellStyle::bright(Color::Green),
                        0.02,
                        3,
                    ))
                })
                .with_data("text", RAIN_TEXT),
            ],
        ),
        Scene::new(
            "finale",
            vec![
                GeneratorSpec::new(2, Predicate::Always, || {
                    Box::new(ProgressBar::new(
                        GridPos::new(10, 14),
                        40,
                        CellStyle::bright(Color::Cyan),
                    ))
                }),
                GeneratorSpec::new(3, Predicate::Always, || {
                    Box::new(Pulse::centered(
                        GridPos::new(0, 10),
                        CellStyle::fg(Color::White),
                    ))
                })
                .with_data("text", FINALE_TEXT),
            ],
        ),
    ]
}

pub fn events() -> Vec<Event> {
    let mut events = vec![
        Event::swap_scene(OCEAN_AT, "ocean"),
        Event::swap_scene(STORM_AT, "storm"),
        Event::push_data(
            STORM_AT + 32,
            "storm",
            0,
            vec![("intensity".into(), 36i64.into())],
        ),
        Event::swap_scene(RAIN_AT, "rain"),
        Event::swap_scene(FINALE_AT, "finale"),
        Event::swap_scene(LOOP_AT, "intro"),
    ];
    // March the finale bar from empty to full across its section.
    for step in 0..=8u64 {
        events.push(Event::push_data(
            FINALE_AT + step * 8,
            "finale",
            0,
            vec![("progress".into(), (step as f64 / 8.0).into())],
        ));
    }
    events
}

pub fn initial_scene() -> &'static str {
    "intro"
}
