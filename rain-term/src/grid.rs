//! Rain grid - a 2D array of fading cells.

use std::fmt;

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, Rgb};

/// A grid containing rows of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RainGrid {
    /// The cells, stored row-major.
    cells: Vec<Cell>,
    cols: u16,
    rows: u16,
}

impl RainGrid {
    /// Create a blank grid with the given dimensions.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cells: vec![Cell::default(); cols as usize * rows as usize],
            cols,
            rows,
        }
    }

    /// Get the grid dimensions.
    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        (col < self.cols && row < self.rows)
            .then(|| row as usize * self.cols as usize + col as usize)
    }

    /// Get a cell at the given position.
    pub fn get(&self, col: u16, row: u16) -> Option<&Cell> {
        self.index(col, row).map(|idx| &self.cells[idx])
    }

    /// Clear every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Multiply every cell's intensity by `keep`. Cells that fall below the
    /// visibility floor are cleared.
    ///
    /// Both halves of a wide glyph carry the same intensity, so they clear
    /// together.
    pub fn fade(&mut self, keep: f32) {
        let keep = keep.clamp(0.0, 1.0);
        for cell in &mut self.cells {
            if !cell.is_blank() {
                cell.fade(keep);
            }
        }
    }

    /// Write a glyph. Double-width glyphs take this cell and the next.
    ///
    /// Returns false when the glyph has no width or does not fit in the row.
    pub fn put(&mut self, col: u16, row: u16, c: char, fg: Rgb, intensity: f32) -> bool {
        let width = match c.width() {
            Some(w @ 1..=2) => w as u16,
            _ => return false,
        };
        if row >= self.rows || col as usize + width as usize > self.cols as usize {
            return false;
        }

        self.unlink(col, row);
        if width == 2 {
            self.unlink(col + 1, row);
        }

        let head = Cell {
            c,
            fg,
            intensity,
            wide_tail: false,
        };
        self.set(col, row, head);
        if width == 2 {
            self.set(
                col + 1,
                row,
                Cell {
                    c: ' ',
                    wide_tail: true,
                    ..head
                },
            );
        }
        true
    }

    fn set(&mut self, col: u16, row: u16, cell: Cell) {
        if let Some(idx) = self.index(col, row) {
            self.cells[idx] = cell;
        }
    }

    /// Break any wide glyph that overlaps this cell, so overwriting one half
    /// never leaves the other half orphaned.
    fn unlink(&mut self, col: u16, row: u16) {
        let Some(cell) = self.get(col, row).copied() else {
            return;
        };
        if cell.wide_tail && col > 0 {
            self.set(col - 1, row, Cell::default());
        } else if self.get(col + 1, row).is_some_and(|next| next.wide_tail) {
            self.set(col + 1, row, Cell::default());
        }
    }

    /// Iterate over rows.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols.max(1) as usize)
    }

    /// Get all cells as a slice.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Visible text, one line per row.
impl fmt::Display for RainGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows_iter() {
            for cell in row.iter().filter(|cell| !cell.wide_tail) {
                write!(f, "{}", cell.c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
