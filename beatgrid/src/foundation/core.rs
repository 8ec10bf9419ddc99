use crate::foundation::error::{BeatgridError, BeatgridResult};

/// Absolute 0-based index of a subdivided animation beat.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BeatIndex(pub u64);

impl BeatIndex {
    /// Beat index zero, the start of the animation.
    pub const ZERO: Self = Self(0);

    /// Saturating difference `self - earlier`, in beats.
    pub fn since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::fmt::Display for BeatIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Character-grid dimensions in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridSize {
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl GridSize {
    /// Create a validated grid size with both dimensions non-zero.
    pub fn new(width: u16, height: u16) -> BeatgridResult<Self> {
        if width == 0 || height == 0 {
            return Err(BeatgridError::config("grid dimensions must be non-zero"));
        }
        Ok(Self { width, height })
    }

    /// Total cell count.
    pub fn area(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Return `true` when `(x, y)` lies inside the grid.
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < u32::from(self.width) && (y as u32) < u32::from(self.height)
    }

    /// Row-major cell index for an in-bounds `(x, y)`.
    pub fn index_of(self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }
}

/// Signed cell coordinates.
///
/// Positions are signed so effects can aim above/left of the grid and rely on
/// the canvas dropping the out-of-range part.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridPos {
    /// Column, 0 at the left edge.
    pub x: i32,
    /// Row, 0 at the top edge.
    pub y: i32,
}

impl GridPos {
    /// Construct a position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}
