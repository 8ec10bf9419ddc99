/// The 16-color ANSI palette used for cell foregrounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// ANSI black.
    Black,
    /// ANSI red.
    Red,
    /// ANSI green.
    Green,
    /// ANSI yellow.
    Yellow,
    /// ANSI blue.
    Blue,
    /// ANSI magenta.
    Magenta,
    /// ANSI cyan.
    Cyan,
    /// ANSI white.
    #[default]
    White,
}

/// Rendering intensity applied on top of the base color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    /// Default terminal weight.
    #[default]
    Normal,
    /// Bold/bright variant.
    Bright,
    /// Dim/faint variant.
    Dim,
}

/// Closed color-attribute pair for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CellStyle {
    /// Foreground color.
    pub color: Color,
    /// Intensity attribute.
    pub intensity: Intensity,
}

impl CellStyle {
    /// Style with the given color at normal intensity.
    pub fn fg(color: Color) -> Self {
        Self {
            color,
            intensity: Intensity::Normal,
        }
    }

    /// Style with the given color at bright intensity.
    pub fn bright(color: Color) -> Self {
        Self {
            color,
            intensity: Intensity::Bright,
        }
    }

    /// Style with the given color at dim intensity.
    pub fn dim(color: Color) -> Self {
        Self {
            color,
            intensity: Intensity::Dim,
        }
    }
}

/// One character cell of a layer or composited frame.
///
/// A space character is transparent during compositing regardless of its
/// style; layers paint glyphs, not backgrounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    /// The glyph occupying the cell.
    pub ch: char,
    /// Foreground styling for the glyph.
    pub style: CellStyle,
}

impl Cell {
    /// The blank (transparent) cell.
    pub const BLANK: Self = Self {
        ch: ' ',
        style: CellStyle {
            color: Color::White,
            intensity: Intensity::Normal,
        },
    };

    /// Construct a styled cell.
    pub fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }

    /// Whether the cell is transparent for compositing.
    pub fn is_blank(self) -> bool {
        self.ch == ' '
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}
