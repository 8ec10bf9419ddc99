//! Multi-layer character canvas.
//!
//! Generators write into individual layers; [`Canvas::composite`] flattens
//! the stack into one [`FrameGrid`] with ascending layer index, a non-blank
//! cell on a higher layer occluding anything below it at the same coordinate.

mod cell;
mod layer;

pub use cell::{Cell, CellStyle, Color, Intensity};

use crate::canvas::layer::Layer;
use crate::foundation::core::{GridPos, GridSize};
use crate::foundation::error::{BeatgridError, BeatgridResult};
use crate::render::FrameGrid;

/// An ordered stack of character layers over a fixed grid.
///
/// Bounds policy: a layer index at or beyond the configured layer count is an
/// error (the stack never auto-grows); out-of-grid coordinates are dropped
/// silently, so effects may aim partly off screen without guarding.
#[derive(Clone, Debug)]
pub struct Canvas {
    size: GridSize,
    layers: Vec<Layer>,
    composited: FrameGrid,
    edits_this_frame: u32,
}

impl Canvas {
    /// Create a canvas with `layers` blank planes of `size` cells.
    pub fn new(size: GridSize, layers: usize) -> BeatgridResult<Self> {
        if layers == 0 {
            return Err(BeatgridError::config("canvas needs at least one layer"));
        }
        Ok(Self {
            size,
            layers: (0..layers).map(|_| Layer::new(size)).collect(),
            composited: FrameGrid::blank(size),
            edits_this_frame: 0,
        })
    }

    /// Grid dimensions.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Number of layers in the stack.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Edits applied since the counter was last taken (debug overlay food).
    pub fn edits_this_frame(&self) -> u32 {
        self.edits_this_frame
    }

    /// Reset the per-frame edit counter, returning the previous value.
    pub fn take_edit_count(&mut self) -> u32 {
        std::mem::take(&mut self.edits_this_frame)
    }

    fn layer_mut(&mut self, layer: usize) -> BeatgridResult<&mut Layer> {
        let count = self.layers.len();
        self.layers
            .get_mut(layer)
            .ok_or_else(|| BeatgridError::canvas(format!("layer {layer} out of range (0..{count})")))
    }

    /// Write one cell to a layer.
    pub fn set_cell(&mut self, layer: usize, pos: GridPos, cell: Cell) -> BeatgridResult<()> {
        let target = self.layer_mut(layer)?;
        if target.set(pos.x, pos.y, cell) {
            self.edits_this_frame += 1;
        }
        Ok(())
    }

    /// Write a string left-to-right starting at `pos`, clipping at the grid
    /// edge. Spaces in `text` erase (they overwrite with blank cells).
    pub fn set_string(
        &mut self,
        layer: usize,
        pos: GridPos,
        text: &str,
        style: CellStyle,
    ) -> BeatgridResult<()> {
        let target = self.layer_mut(layer)?;
        let mut wrote = false;
        for (i, ch) in text.chars().enumerate() {
            wrote |= target.set(pos.x + i as i32, pos.y, Cell::new(ch, style));
        }
        if wrote {
            self.edits_this_frame += 1;
        }
        Ok(())
    }

    /// Write a multi-line string, one row per `\n`-separated line, stopping
    /// at the bottom edge.
    pub fn set_multiline(
        &mut self,
        layer: usize,
        pos: GridPos,
        text: &str,
        style: CellStyle,
    ) -> BeatgridResult<()> {
        for (row, line) in text.lines().enumerate() {
            let line_pos = pos.offset(0, row as i32);
            if line_pos.y >= i32::from(self.size.height) {
                break;
            }
            self.set_string(layer, line_pos, line, style)?;
        }
        Ok(())
    }

    /// Fill a `w x h` rectangle with one character.
    pub fn fill_rect(
        &mut self,
        layer: usize,
        pos: GridPos,
        w: u16,
        h: u16,
        cell: Cell,
    ) -> BeatgridResult<()> {
        let target = self.layer_mut(layer)?;
        let mut wrote = false;
        for dy in 0..i32::from(h) {
            for dx in 0..i32::from(w) {
                wrote |= target.set(pos.x + dx, pos.y + dy, cell);
            }
        }
        if wrote {
            self.edits_this_frame += 1;
        }
        Ok(())
    }

    /// Draw a single-cell border around a `w x h` rectangle.
    ///
    /// `chars` holds the eight border glyphs in reading order: top-left, top,
    /// top-right, left, right, bottom-left, bottom, bottom-right.
    pub fn draw_border(
        &mut self,
        layer: usize,
        pos: GridPos,
        w: u16,
        h: u16,
        chars: [char; 8],
        style: CellStyle,
    ) -> BeatgridResult<()> {
        if w < 2 || h < 2 {
            return Ok(());
        }
        let [tl, t, tr, l, r, bl, b, br] = chars;
        let right = i32::from(w) - 1;
        let bottom = i32::from(h) - 1;
        for dx in 0..=right {
            let top_ch = if dx == 0 { tl } else if dx == right { tr } else { t };
            let bot_ch = if dx == 0 { bl } else if dx == right { br } else { b };
            self.set_cell(layer, pos.offset(dx, 0), Cell::new(top_ch, style))?;
            self.set_cell(layer, pos.offset(dx, bottom), Cell::new(bot_ch, style))?;
        }
        for dy in 1..bottom {
            self.set_cell(layer, pos.offset(0, dy), Cell::new(l, style))?;
            self.set_cell(layer, pos.offset(right, dy), Cell::new(r, style))?;
        }
        Ok(())
    }

    /// Read one cell back from a layer. `None` outside the grid.
    pub fn cell_at(&self, layer: usize, pos: GridPos) -> BeatgridResult<Option<Cell>> {
        let count = self.layers.len();
        let target = self
            .layers
            .get(layer)
            .ok_or_else(|| BeatgridError::canvas(format!("layer {layer} out of range (0..{count})")))?;
        Ok(target.get(pos.x, pos.y))
    }

    /// Blank out one layer.
    pub fn clear_layer(&mut self, layer: usize) -> BeatgridResult<()> {
        self.layer_mut(layer)?.clear();
        self.edits_this_frame += 1;
        Ok(())
    }

    /// Blank out every layer.
    pub fn clear_all(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
        self.edits_this_frame += 1;
    }

    /// Flatten the stack into one resolved frame.
    ///
    /// Idempotent: layer contents are never mutated, only the cached output
    /// buffer is rewritten, so calling this twice without intervening writes
    /// yields identical grids.
    pub fn composite(&mut self) -> &FrameGrid {
        self.composited.reset_blank();
        let out = self.composited.cells_mut();
        for layer in &self.layers {
            for (dst, src) in out.iter_mut().zip(layer.cells()) {
                if !src.is_blank() {
                    *dst = *src;
                }
            }
        }
        &self.composited
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas.rs"]
mod tests;
