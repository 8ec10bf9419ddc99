use crate::canvas::{Canvas, Cell, CellStyle, Color, Intensity};
use crate::foundation::core::GridPos;
use crate::foundation::error::BeatgridResult;
use crate::scene::{Effect, GenData, TickCtx};

/// A sine wave sweeping across the full grid width.
///
/// The wave phase advances with the continuous beat (index + intra-beat
/// phase), so motion stays smooth at any frame rate.
pub struct Wave {
    base_row: i32,
    amplitude: f64,
    frequency: f64,
    speed: f64,
    glyph: char,
    style: CellStyle,
}

impl Wave {
    /// Create a wave oscillating around `base_row`.
    pub fn new(base_row: i32, amplitude: f64, frequency: f64, speed: f64) -> Self {
        Self {
            base_row,
            amplitude,
            frequency,
            speed,
            glyph: '~',
            style: CellStyle::fg(Color::Blue),
        }
    }

    /// Override the wave glyph and style.
    pub fn with_look(mut self, glyph: char, style: CellStyle) -> Self {
        self.glyph = glyph;
        self.style = style;
        self
    }
}

impl Effect for Wave {
    fn render(
        &mut self,
        _data: &GenData,
        ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> BeatgridResult<()> {
        canvas.clear_layer(layer)?;
        let t = ctx.beat as f64 + ctx.phase;
        for x in 0..i32::from(ctx.grid.width) {
            let y = self.base_row as f64
                + self.amplitude * (self.frequency * x as f64 + self.speed * t).sin();
            canvas.set_cell(
                layer,
                GridPos::new(x, y.round() as i32),
                Cell::new(self.glyph, self.style),
            )?;
        }
        Ok(())
    }
}

/// Matrix-style digital rain: bright drop heads with dim trails falling down
/// random columns.
///
/// Data contract: `density` is the number of simultaneously falling drops.
pub struct MatrixRain {
    glyphs: Vec<char>,
    style: CellStyle,
    salt: u64,
    /// (column, head row) per live drop; internal bookkeeping.
    drops: Vec<(i32, i32)>,
}

impl MatrixRain {
    const GLYPHS: &'static str = "ﾊﾐﾋｰｳｼﾅﾓﾆｻﾜﾂｵﾘｱﾎﾃﾏｹﾒｴｶｷﾑﾕﾗｾﾈｽﾀﾇﾍ";

    /// Create a rain effect with the classic katakana glyph set.
    pub fn new(salt: u64) -> Self {
        Self {
            glyphs: Self::GLYPHS.chars().collect(),
            style: CellStyle::fg(Color::Green),
            salt,
            drops: Vec::new(),
        }
    }
}

impl Effect for MatrixRain {
    fn on_spawn(&mut self, data: &mut GenData) {
        if !data.contains("density") {
            data.set("density", 12i64);
        }
    }

    fn update(&mut self, data: &mut GenData, ctx: &TickCtx) {
        let density = data.int_or("density", 0).max(0) as usize;
        let height = i32::from(ctx.grid.height);
        let mut rng = ctx.rng(self.salt);

        self.drops.retain(|&(_, head)| head < height + 4);
        for drop in &mut self.drops {
            drop.1 += 1;
        }
        while self.drops.len() < density {
            let col = rng.next_below(u32::from(ctx.grid.width)) as i32;
            let head = -(rng.next_below(u32::from(ctx.grid.height)) as i32);
            self.drops.push((col, head));
        }
    }

    fn render(
        &mut self,
        _data: &GenData,
        ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> BeatgridResult<()> {
        canvas.clear_layer(layer)?;
        let mut rng = ctx.rng(self.salt.wrapping_add(1));
        for &(col, head) in &self.drops {
            for tail in 0..4i32 {
                let y = head - tail;
                let glyph = *rng.pick(&self.glyphs);
                let style = CellStyle {
                    color: self.style.color,
                    intensity: if tail == 0 {
                        Intensity::Bright
                    } else {
                        Intensity::Dim
                    },
                };
                canvas.set_cell(layer, GridPos::new(col, y), Cell::new(glyph, style))?;
            }
        }
        Ok(())
    }
}

/// A horizontal progress bar.
///
/// Data contract: `progress` in `[0, 1]` selects the filled fraction;
/// timeline events (or a driving update elsewhere) move it.
pub struct ProgressBar {
    pos: GridPos,
    width: u16,
    style: CellStyle,
}

impl ProgressBar {
    /// Create a bar of `width` cells at `pos`.
    pub fn new(pos: GridPos, width: u16, style: CellStyle) -> Self {
        Self { pos, width, style }
    }
}

impl Effect for ProgressBar {
    fn on_spawn(&mut self, data: &mut GenData) {
        if !data.contains("progress") {
            data.set("progress", 0.0f64);
        }
    }

    fn render(
        &mut self,
        data: &GenData,
        _ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> BeatgridResult<()> {
        let progress = data.num_or("progress", 0.0).clamp(0.0, 1.0);
        let filled = (f64::from(self.width) * progress) as i32;
        for x in 0..i32::from(self.width) {
            let glyph = if x < filled { '█' } else { '░' };
            canvas.set_cell(
                layer,
                self.pos.offset(x, 0),
                Cell::new(glyph, self.style),
            )?;
        }
        Ok(())
    }
}
