use super::*;

fn clock(bpm: f64, subdivisions: u32, offset: f64) -> BeatClock {
    BeatClock::new(Tempo::new(bpm, subdivisions).unwrap(), offset).unwrap()
}

#[test]
fn construction_validates_tempo() {
    assert!(Tempo::new(0.0, 4).is_err());
    assert!(Tempo::new(-120.0, 4).is_err());
    assert!(Tempo::new(f64::NAN, 4).is_err());
    assert!(Tempo::new(120.0, 0).is_err());
    assert!(Tempo::new(120.0, 1).is_ok());
}

#[test]
fn monotonic_over_forward_time() {
    let clock = clock(179.0, 8, 0.0);
    let mut last = clock.tick(0.0).index;
    for i in 1..2000 {
        let now = clock.tick(i as f64 * 0.007).index;
        assert!(now >= last, "beat index regressed at step {i}");
        last = now;
    }
}

#[test]
fn reference_tempo_179_bpm_times_8() {
    let clock = clock(179.0, 8, 0.0);
    assert_eq!(clock.tempo().animation_bpm(), 1432.0);

    // One subdivided beat lasts 60/1432 ~= 0.04190 s.
    assert_eq!(clock.tick(0.0).index, BeatIndex(0));
    assert_eq!(clock.tick(0.0418).index, BeatIndex(0));
    assert_eq!(clock.tick(0.0420).index, BeatIndex(1));
    assert_eq!(clock.tick(0.4190).index, BeatIndex(10));
}

#[test]
fn elapsed_before_offset_clamps_to_beat_zero() {
    let clock = clock(120.0, 4, 1.5);
    assert_eq!(clock.tick(0.0), BeatTick::START);
    assert_eq!(clock.tick(1.49), BeatTick::START);
    assert_eq!(clock.tick(1.51).index, BeatIndex(0));
    assert!(clock.tick(1.51).phase > 0.0);
}

#[test]
fn phase_stays_in_unit_interval() {
    let clock = clock(133.7, 3, 0.25);
    for i in 0..5000 {
        let tick = clock.tick(i as f64 * 0.0031);
        assert!((0.0..1.0).contains(&tick.phase), "phase out of range: {}", tick.phase);
    }
}

#[test]
fn offset_change_applies_on_next_tick() {
    let mut clock = clock(60.0, 1, 0.0);
    assert_eq!(clock.tick(10.0).index, BeatIndex(10));
    clock.set_offset_secs(2.0);
    assert_eq!(clock.tick(10.0).index, BeatIndex(8));
    clock.nudge_offset_secs(-1.0);
    assert_eq!(clock.tick(10.0).index, BeatIndex(9));
}

#[test]
fn pure_function_of_elapsed_time() {
    let clock = clock(179.0, 8, 0.1);
    let a = clock.tick(42.0);
    let _ = clock.tick(1.0);
    let b = clock.tick(42.0);
    assert_eq!(a, b, "seeking must not leave hidden state behind");
}
