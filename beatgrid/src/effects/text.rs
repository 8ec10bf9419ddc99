use crate::canvas::{Canvas, CellStyle, Intensity};
use crate::foundation::core::GridPos;
use crate::foundation::error::BeatgridResult;
use crate::scene::{Effect, GenData, TickCtx};

/// Typewriter: text appears a few characters per beat, with a trailing
/// cursor until each line completes.
///
/// Data contract: `text` is the (possibly multi-line) target string, pushed
/// by timeline events; `offset` is the character cursor, managed here.
pub struct Typewriter {
    pos: GridPos,
    style: CellStyle,
    speed: i64,
    last_text_len: Option<usize>,
}

impl Typewriter {
    /// Create a typewriter at `pos` advancing `speed` characters per beat.
    pub fn new(pos: GridPos, style: CellStyle, speed: u16) -> Self {
        Self {
            pos,
            style,
            speed: i64::from(speed.max(1)),
            last_text_len: None,
        }
    }
}

impl Effect for Typewriter {
    fn on_spawn(&mut self, data: &mut GenData) {
        if !data.contains("text") {
            data.set("text", "");
        }
        if !data.contains("offset") {
            data.set("offset", 0i64);
        }
    }

    fn update(&mut self, data: &mut GenData, _ctx: &TickCtx) {
        let total = data.text("text").map_or(0, |t| t.chars().count()) as i64;
        let speed = self.speed;
        data.update_int("offset", 0, |off| (off + speed).min(total));
    }

    fn render(
        &mut self,
        data: &GenData,
        _ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> BeatgridResult<()> {
        let Some(text) = data.text("text") else {
            return Ok(());
        };
        // A re-targeted text (event pushed new lyrics) invalidates whatever
        // the previous text left on the layer.
        if self.last_text_len != Some(text.len()) {
            canvas.clear_layer(layer)?;
            self.last_text_len = Some(text.len());
        }

        let offset = data.int_or("offset", 0).max(0) as usize;
        let mut consumed = 0usize;
        for (row, line) in text.lines().enumerate() {
            let len = line.chars().count();
            let visible = offset.saturating_sub(consumed).min(len);
            if visible > 0 || offset > consumed {
                let mut shown: String = line.chars().take(visible).collect();
                if visible < len {
                    shown.push('_');
                }
                canvas.set_string(layer, self.pos.offset(0, row as i32), &shown, self.style)?;
            }
            consumed += len + 1;
        }
        Ok(())
    }
}

/// Scramble: garbage glyphs that progressively settle into the target text.
///
/// Data contract: `text` is the final string; `progress` in `[0, 1]` is the
/// reveal fraction, advanced by `rate` per beat.
pub struct Scramble {
    pos: GridPos,
    style: CellStyle,
    rate: f64,
    glyphs: Vec<char>,
    salt: u64,
}

impl Scramble {
    const GLYPHS: &'static str = "!@#$%^&*()_+-=[]{}|;:,.<>?/~";

    /// Create a scramble at `pos`, revealing `rate` of the text per beat.
    pub fn new(pos: GridPos, style: CellStyle, rate: f64, salt: u64) -> Self {
        Self {
            pos,
            style,
            rate: rate.max(0.0),
            glyphs: Self::GLYPHS.chars().collect(),
            salt,
        }
    }
}

impl Effect for Scramble {
    fn on_spawn(&mut self, data: &mut GenData) {
        if !data.contains("text") {
            data.set("text", "");
        }
        if !data.contains("progress") {
            data.set("progress", 0.0f64);
        }
    }

    fn update(&mut self, data: &mut GenData, _ctx: &TickCtx) {
        let next = (data.num_or("progress", 0.0) + self.rate).min(1.0);
        data.set("progress", next);
    }

    fn render(
        &mut self,
        data: &GenData,
        ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> BeatgridResult<()> {
        let Some(text) = data.text("text") else {
            return Ok(());
        };
        let total = text.chars().count();
        let revealed = (total as f64 * data.num_or("progress", 0.0)) as usize;
        let mut rng = ctx.rng(self.salt);
        let shown: String = text
            .chars()
            .enumerate()
            .map(|(i, ch)| {
                if i < revealed || ch == ' ' {
                    ch
                } else {
                    *rng.pick(&self.glyphs)
                }
            })
            .collect();
        canvas.set_string(layer, self.pos, &shown, self.style)
    }
}

/// Pulse: text whose intensity flips between bright and normal every beat.
///
/// Data contract: `text` is the displayed string.
pub struct Pulse {
    pos: GridPos,
    style: CellStyle,
    /// Center the text horizontally instead of anchoring at `pos.x`.
    centered: bool,
}

impl Pulse {
    /// Pulse `text` anchored at `pos`.
    pub fn new(pos: GridPos, style: CellStyle) -> Self {
        Self {
            pos,
            style,
            centered: false,
        }
    }

    /// Pulse centered on row `pos.y` (the x coordinate is ignored).
    pub fn centered(pos: GridPos, style: CellStyle) -> Self {
        Self {
            pos,
            style,
            centered: true,
        }
    }
}

impl Effect for Pulse {
    fn on_spawn(&mut self, data: &mut GenData) {
        if !data.contains("text") {
            data.set("text", "");
        }
    }

    fn render(
        &mut self,
        data: &GenData,
        ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> BeatgridResult<()> {
        let Some(text) = data.text("text") else {
            return Ok(());
        };
        let style = CellStyle {
            color: self.style.color,
            intensity: if ctx.beat % 2 == 0 {
                Intensity::Bright
            } else {
                Intensity::Normal
            },
        };
        let pos = if self.centered {
            let width = i32::from(ctx.grid.width);
            GridPos::new((width - text.chars().count() as i32) / 2, self.pos.y)
        } else {
            self.pos
        };
        canvas.set_string(layer, pos, text, style)
    }
}

/// Blink: a fixed marker alternating between two styles every beat.
pub struct Blink {
    pos: GridPos,
    marker: String,
    style_a: CellStyle,
    style_b: CellStyle,
}

impl Blink {
    /// Blink `marker` at `pos`, alternating between the two styles.
    pub fn new(pos: GridPos, marker: impl Into<String>, style_a: CellStyle, style_b: CellStyle) -> Self {
        Self {
            pos,
            marker: marker.into(),
            style_a,
            style_b,
        }
    }
}

impl Effect for Blink {
    fn render(
        &mut self,
        _data: &GenData,
        ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> BeatgridResult<()> {
        let style = if ctx.beat % 2 == 0 {
            self.style_a
        } else {
            self.style_b
        };
        canvas.set_string(layer, self.pos, &self.marker, style)
    }
}
