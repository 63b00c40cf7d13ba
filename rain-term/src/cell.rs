//! Terminal cell representation.

/// 24-bit foreground color.
pub type Rgb = (u8, u8, u8);

/// Cells dimmer than this are cleared by `fade`.
pub const VISIBILITY_FLOOR: f32 = 0.03;

/// A single cell in the rain grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// The character in this cell. `' '` when blank.
    pub c: char,
    /// Foreground color at full intensity.
    pub fg: Rgb,
    /// Remaining brightness, 0.0-1.0. Decays with every fade.
    pub intensity: f32,
    /// Right half of a double-width glyph drawn in the cell to the left.
    pub wide_tail: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            c: ' ',
            fg: (0, 0, 0),
            intensity: 0.0,
            wide_tail: false,
        }
    }
}

/// What a cell looks like on screen. Two cells with equal shades need no
/// redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Blank,
    /// Covered by the wide glyph to its left.
    WideTail,
    Glyph(char, Rgb),
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        !self.wide_tail && self.c == ' '
    }

    /// Multiply intensity by `keep`, clearing the cell once it drops below
    /// the visibility floor.
    pub fn fade(&mut self, keep: f32) {
        self.intensity *= keep;
        if self.intensity < VISIBILITY_FLOOR {
            *self = Cell::default();
        }
    }

    pub fn shade(&self) -> Shade {
        if self.wide_tail {
            return Shade::WideTail;
        }
        if self.c == ' ' || self.intensity < VISIBILITY_FLOOR {
            return Shade::Blank;
        }
        Shade::Glyph(self.c, scale(self.fg, self.intensity))
    }
}

fn scale((r, g, b): Rgb, intensity: f32) -> Rgb {
    let k = intensity.clamp(0.0, 1.0);
    let channel = |v: u8| (v as f32 * k).round() as u8;
    (channel(r), channel(g), channel(b))
}
