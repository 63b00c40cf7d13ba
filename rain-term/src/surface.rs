//! `Surface` implementation that renders into a terminal.

use std::fmt::Write as _;
use std::io::{self, Write};

use rain_core::{Color, GlyphStyle, Point, Size, Surface};

use crate::cell::{Rgb, Shade};
use crate::grid::RainGrid;
use crate::tty;

/// Pixel size of one terminal cell. Glyph coordinates are divided by these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

impl CellMetrics {
    pub const DEFAULT: Self = Self {
        width: 8.0,
        height: 16.0,
    };

    /// One glyph per row, with half-glyph-wide cells so a double-width
    /// glyph spans exactly one glyph size.
    pub fn for_glyph_size(glyph_size: f32) -> Self {
        if glyph_size.is_nan() || glyph_size <= 0.0 {
            return Self::DEFAULT;
        }
        Self {
            width: glyph_size / 2.0,
            height: glyph_size,
        }
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Where the grid dimensions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSize {
    Fixed { cols: u16, rows: u16 },
    /// Ask the terminal on stdout. Falls back to the default size.
    Tty,
}

/// Maximum share of the glow color mixed into a glyph.
const GLOW_MIX: f32 = 0.35;
/// Glow radius that gets the full `GLOW_MIX`.
const GLOW_FULL_RADIUS: f32 = 16.0;

/// A terminal surface.
///
/// Drawing goes to a back grid. `present` writes only the cells whose shade
/// differs from what was last written.
pub struct TermSurface<W: Write> {
    out: W,
    metrics: CellMetrics,
    source: WindowSize,
    back: RainGrid,
    front: RainGrid,
    /// Set after a resize or a failed write. The next present repaints
    /// everything.
    full_redraw: bool,
}

impl<W: Write> TermSurface<W> {
    pub fn new(out: W, metrics: CellMetrics, source: WindowSize) -> Self {
        let (cols, rows) = measure(source);
        Self {
            out,
            metrics,
            source,
            back: RainGrid::new(cols, rows),
            front: RainGrid::new(cols, rows),
            full_redraw: true,
        }
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// The frame being drawn.
    pub fn grid(&self) -> &RainGrid {
        &self.back
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Change where the size comes from, e.g. after the host resized a
    /// fixed-size surface. Takes effect on the next `sync_size`.
    pub fn set_source(&mut self, source: WindowSize) {
        self.source = source;
    }

    fn encode_frame(&self) -> String {
        let mut buf = String::new();
        if self.full_redraw {
            buf.push_str("\x1b[0m\x1b[2J");
        }

        let mut cursor: Option<(u16, u16)> = None;
        let mut pen: Option<Rgb> = None;
        let (cols, rows) = self.back.size();

        for row in 0..rows {
            for col in 0..cols {
                let Some(cell) = self.back.get(col, row) else {
                    continue;
                };
                let shade = cell.shade();
                if !self.full_redraw && self.front.get(col, row).map(|c| c.shade()) == Some(shade) {
                    continue;
                }

                let (c, rgb) = match shade {
                    Shade::WideTail => continue,
                    // Freshly cleared screen is already blank.
                    Shade::Blank if self.full_redraw => continue,
                    Shade::Blank => (' ', None),
                    Shade::Glyph(c, rgb) => (c, Some(rgb)),
                };

                if cursor != Some((col, row)) {
                    let _ = write!(buf, "\x1b[{};{}H", row + 1, col + 1);
                }
                match rgb {
                    Some(rgb) if pen != Some(rgb) => {
                        let _ = write!(buf, "\x1b[38;2;{};{};{}m", rgb.0, rgb.1, rgb.2);
                        pen = Some(rgb);
                    }
                    None if pen.is_some() => {
                        buf.push_str("\x1b[0m");
                        pen = None;
                    }
                    _ => {}
                }
                buf.push(c);

                let advance = if c == ' ' { 1 } else { unicode_advance(c) };
                cursor = Some((col + advance, row));
            }
        }
        buf
    }
}

fn write_frame<W: Write>(out: &mut W, frame: &str) -> io::Result<()> {
    if !frame.is_empty() {
        out.write_all(frame.as_bytes())?;
    }
    out.flush()
}

fn unicode_advance(c: char) -> u16 {
    use unicode_width::UnicodeWidthChar;
    c.width().unwrap_or(1).clamp(1, 2) as u16
}

fn measure(source: WindowSize) -> (u16, u16) {
    match source {
        WindowSize::Fixed { cols, rows } => (cols, rows),
        WindowSize::Tty => tty::window_size().unwrap_or_else(|err| {
            tracing::warn!(%err, "could not read terminal size, using default");
            (crate::DEFAULT_COLS, crate::DEFAULT_ROWS)
        }),
    }
}

fn blend_glow(style: &GlyphStyle) -> Color {
    match style.glow {
        Some(glow) if glow.radius > 0.0 => {
            let t = GLOW_MIX * (glow.radius / GLOW_FULL_RADIUS).min(1.0);
            style.color.lerp(glow.color, t).with_alpha(style.color.a)
        }
        _ => style.color,
    }
}

impl<W: Write> Surface for TermSurface<W> {
    fn size(&self) -> Size {
        let (cols, rows) = self.back.size();
        Size::new(
            cols as f32 * self.metrics.width,
            rows as f32 * self.metrics.height,
        )
    }

    fn sync_size(&mut self) -> Size {
        let (cols, rows) = measure(self.source);
        if (cols, rows) != self.back.size() {
            tracing::debug!(cols, rows, "terminal resized");
            self.back = RainGrid::new(cols, rows);
            self.front = RainGrid::new(cols, rows);
            self.full_redraw = true;
        }
        self.size()
    }

    fn fade(&mut self, wash: Color) {
        self.back.fade(1.0 - wash.a);
    }

    fn draw_glyph(&mut self, glyph: char, at: Point, style: &GlyphStyle) {
        // Nearest cell, so sub-cell jitter keeps a glyph in its lane.
        let col = (at.x / self.metrics.width).round();
        let row = (at.y / self.metrics.height).floor();
        if !(0.0..u16::MAX as f32).contains(&col) || !(0.0..u16::MAX as f32).contains(&row) {
            return;
        }
        let color = blend_glow(style);
        let (r, g, b) = color.to_rgb8();
        self.back
            .put(col as u16, row as u16, glyph, (r, g, b), color.a.clamp(0.0, 1.0));
    }

    fn present(&mut self) {
        let frame = self.encode_frame();
        match write_frame(&mut self.out, &frame) {
            Ok(()) => {
                self.front.clone_from(&self.back);
                self.full_redraw = false;
            }
            Err(err) => {
                tracing::warn!(%err, "failed to write rain frame");
                self.full_redraw = true;
            }
        }
    }
}
