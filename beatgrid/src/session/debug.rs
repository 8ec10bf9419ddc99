use crate::canvas::{Canvas, CellStyle, Color};
use crate::clock::BeatTick;
use crate::foundation::core::GridPos;
use crate::foundation::error::BeatgridResult;
use crate::session::manager::PlaybackState;

/// Read-only view of manager state for the debug overlay.
#[derive(Clone, Debug)]
pub struct DebugSnapshot {
    /// Current playback state.
    pub state: PlaybackState,
    /// Latest clock reading.
    pub tick: BeatTick,
    /// Name of the active scene, if any.
    pub scene: Option<String>,
    /// Live generator count in the active scene.
    pub live_generators: usize,
    /// Canvas edits applied during the last frame.
    pub edits_last_frame: u32,
    /// Render loop rate estimated from recent tick times.
    pub fps: f64,
    /// Current beat clock sync offset in seconds.
    pub offset_secs: f64,
    /// Fired/total scheduled event counts.
    pub events: (usize, usize),
}

/// Paint the overlay into the canvas's top layer, right-aligned.
pub(crate) fn render_overlay(canvas: &mut Canvas, snap: &DebugSnapshot) -> BeatgridResult<()> {
    let layer = canvas.layer_count() - 1;
    let width = i32::from(canvas.size().width);
    let style = CellStyle::bright(Color::Yellow);
    let dim = CellStyle::fg(Color::Green);

    let scene = snap.scene.as_deref().unwrap_or("-");
    let lines = [
        format!("{:>5} b {:>4.2} p", snap.tick.index, snap.tick.phase),
        format!("{scene} ({})", snap.live_generators),
        format!("{:>5} e/f", snap.edits_last_frame),
        format!("{:>6.1} fps", snap.fps),
        format!("{:+.3} s", snap.offset_secs),
        format!("ev {}/{}", snap.events.0, snap.events.1),
    ];
    for (row, line) in lines.iter().enumerate() {
        let x = width - line.chars().count() as i32 - 1;
        let s = if row == 1 { dim } else { style };
        canvas.set_string(layer, GridPos::new(x, row as i32), line, s)?;
    }
    Ok(())
}
