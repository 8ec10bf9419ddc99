//! Terminal frame sink built on crossterm.

use std::io::{Stdout, Write};

use anyhow::Context as _;
use beatgrid::{BeatTick, Cell, CellStyle, Color, FrameGrid, FrameSink, Intensity, SinkConfig};
use crossterm::style::{Attribute, SetAttribute, SetForegroundColor};
use crossterm::{cursor, execute, queue, style, terminal};

fn map_color(color: Color) -> style::Color {
    match color {
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
    }
}

fn map_intensity(intensity: Intensity) -> Attribute {
    match intensity {
        Intensity::Normal => Attribute::NormalIntensity,
        Intensity::Bright => Attribute::Bold,
        Intensity::Dim => Attribute::Dim,
    }
}

/// Paints composited frames into an alternate terminal screen.
///
/// The sink repaints the full grid every frame; at the engine's grid sizes a
/// full repaint stays comfortably inside the 60 Hz budget and avoids
/// carrying dirty-cell state across seeks and scene swaps.
pub struct TerminalSink {
    out: Stdout,
    active: bool,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            out: std::io::stdout(),
            active: false,
        }
    }

    fn paint(&mut self, frame: &FrameGrid) -> anyhow::Result<()> {
        queue!(self.out, cursor::MoveTo(0, 0))?;
        let mut current: Option<CellStyle> = None;
        for (y, row) in frame.rows().enumerate() {
            queue!(self.out, cursor::MoveTo(0, y as u16))?;
            let mut run = String::with_capacity(row.len());
            for cell in row {
                let Cell { ch, style } = *cell;
                if current != Some(style) {
                    if !run.is_empty() {
                        queue!(self.out, style::Print(&run))?;
                        run.clear();
                    }
                    queue!(
                        self.out,
                        SetAttribute(Attribute::Reset),
                        SetAttribute(map_intensity(style.intensity)),
                        SetForegroundColor(map_color(style.color))
                    )?;
                    current = Some(style);
                }
                run.push(ch);
            }
            if !run.is_empty() {
                queue!(self.out, style::Print(&run))?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

impl FrameSink for TerminalSink {
    fn begin(&mut self, _cfg: SinkConfig) -> beatgrid::BeatgridResult<()> {
        let mut setup = || -> anyhow::Result<()> {
            terminal::enable_raw_mode().context("enable raw mode")?;
            execute!(
                self.out,
                terminal::EnterAlternateScreen,
                cursor::Hide,
                terminal::Clear(terminal::ClearType::All)
            )
            .context("enter alternate screen")?;
            Ok(())
        };
        setup()?;
        self.active = true;
        Ok(())
    }

    fn push_frame(&mut self, _tick: BeatTick, frame: &FrameGrid) -> beatgrid::BeatgridResult<()> {
        self.paint(frame).context("paint frame")?;
        Ok(())
    }

    fn end(&mut self) -> beatgrid::BeatgridResult<()> {
        if self.active {
            let mut teardown = || -> anyhow::Result<()> {
                execute!(
                    self.out,
                    SetAttribute(Attribute::Reset),
                    cursor::Show,
                    terminal::LeaveAlternateScreen
                )
                .context("leave alternate screen")?;
                terminal::disable_raw_mode().context("disable raw mode")?;
                Ok(())
            };
            teardown()?;
            self.active = false;
        }
        Ok(())
    }
}

impl Drop for TerminalSink {
    fn drop(&mut self) {
        // Raw mode must not outlive a panicking run.
        let _ = self.end();
    }
}
