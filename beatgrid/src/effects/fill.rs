use crate::canvas::{Canvas, Cell};
use crate::foundation::core::GridPos;
use crate::foundation::error::BeatgridResult;
use crate::scene::{Effect, GenData, TickCtx};

/// Fill the whole layer (or a rectangle of it) with one cell.
pub struct SolidFill {
    cell: Cell,
    rect: Option<(GridPos, u16, u16)>,
}

impl SolidFill {
    /// Fill the entire layer.
    pub fn full(cell: Cell) -> Self {
        Self { cell, rect: None }
    }

    /// Fill a `w x h` rectangle at `pos`.
    pub fn rect(cell: Cell, pos: GridPos, w: u16, h: u16) -> Self {
        Self {
            cell,
            rect: Some((pos, w, h)),
        }
    }
}

impl Effect for SolidFill {
    fn render(
        &mut self,
        _data: &GenData,
        ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> BeatgridResult<()> {
        let (pos, w, h) = self
            .rect
            .unwrap_or((GridPos::new(0, 0), ctx.grid.width, ctx.grid.height));
        canvas.fill_rect(layer, pos, w, h, self.cell)
    }
}

/// Blank out the layer on every firing tick.
///
/// Paired with [`crate::scene::Predicate::Once`] this is the classic
/// scene-opening wipe; with `Always` it keeps a layer clean under
/// accumulating writers.
pub struct ClearLayer;

impl Effect for ClearLayer {
    fn render(
        &mut self,
        _data: &GenData,
        _ctx: &TickCtx,
        layer: usize,
        canvas: &mut Canvas,
    ) -> BeatgridResult<()> {
        canvas.clear_layer(layer)
    }
}
