use crate::canvas::{Canvas, Cell, CellStyle, Color};
use crate::foundation::core::GridPos;
use crate::foundation::error::BeatgridResult;
use crate::scene::{Effect, GenData, TickCtx};

const NOISE_GLYPHS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?/~`";

/// Random glyphs scattered over the layer, redrawn every firing tick.
///
/// Data contract: `intensity` is the number of glyphs per tick; timeline
/// events crank it up for breakdowns and back down for verses.
pub struct Noise {
    glyphs: Vec<char>,
    palette: Vec<CellStyle>,
    salt: u64,
}

impl Noise {
    /// White noise with the default glyph set.
    pub fn new(salt: u64) -> Self {
        Self {
            glyphs: NOISE_GLYPHS.chars().collect(),
            palette: vec![CellStyle::fg(Color::White)],
            salt,
        }
    }

    /// Glitch variant: the same scatter in hot, clashing colors.
    pub fn glitch(salt: u64) -> Self {
        Self {
            glyphs: NOISE_GLYPHS.chars().collect(),
            palette: vec![
                CellStyle::bright(Color::Red),
                CellStyle::bright(Color::Yellow),
                CellStyle::bright(Color::Green),
                CellStyle::bright(Color::Magenta),
            ],
            salt,
        }
    }

    /// Override the glyph set.
    pub fn with_glyphs(mut self, glyphs: &str) -> Self {
        self.glyphs = glyphs.chars().collect();
        self
    }

    /// Override the color palette.
    pub fn with_palette(mut self, palette: Vec<CellStyle>) -> Self {
        self.palette = palette;
        self
    }
}

impl Effect for Noise {
    fn on_spawn(&mut self, data: &mut GenData) {
        if !data.contains("intensity") {
            data.set("intensity", 10i64);
        }
    }

    fn render(
        &mut self,
        data: &GenData,
        ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> BeatgridResult<()> {
        canvas.clear_layer(layer)?;
        let amount = data.int_or("intensity", 0).max(0) as u32;
        let mut rng = ctx.rng(self.salt);
        for _ in 0..amount {
            let x = rng.next_below(u32::from(ctx.grid.width)) as i32;
            let y = rng.next_below(u32::from(ctx.grid.height)) as i32;
            let ch = *rng.pick(&self.glyphs);
            let style = *rng.pick(&self.palette);
            canvas.set_cell(layer, GridPos::new(x, y), Cell::new(ch, style))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{BeatIndex, GridSize};

    fn ctx(beat: u64, grid: GridSize) -> TickCtx {
        TickCtx {
            beat,
            global: BeatIndex(beat),
            phase: 0.0,
            grid,
            seed: 42,
        }
    }

    fn non_blank(canvas: &mut Canvas) -> usize {
        canvas
            .composite()
            .cells()
            .iter()
            .filter(|c| !c.is_blank())
            .count()
    }

    #[test]
    fn noise_draws_at_most_intensity_cells_and_is_deterministic() {
        let grid = GridSize::new(40, 12).unwrap();
        let mut a = Canvas::new(grid, 2).unwrap();
        let mut b = Canvas::new(grid, 2).unwrap();
        let mut data = GenData::new();
        data.set("intensity", 25i64);

        let mut fx = Noise::new(3);
        fx.render(&data, &ctx(8, grid), 0, &mut a).unwrap();
        fx.render(&data, &ctx(8, grid), 0, &mut b).unwrap();

        let count = non_blank(&mut a);
        assert!(count > 0 && count <= 25);
        assert_eq!(a.composite(), b.composite(), "same seed/beat, same frame");
    }

    #[test]
    fn noise_redraw_replaces_previous_scatter() {
        let grid = GridSize::new(40, 12).unwrap();
        let mut canvas = Canvas::new(grid, 2).unwrap();
        let mut data = GenData::new();
        data.set("intensity", 30i64);

        let mut fx = Noise::glitch(0);
        fx.render(&data, &ctx(1, grid), 0, &mut canvas).unwrap();
        data.set("intensity", 0i64);
        fx.render(&data, &ctx(2, grid), 0, &mut canvas).unwrap();
        assert_eq!(non_blank(&mut canvas), 0, "zero intensity leaves a clean layer");
    }
}
