//! Rain Term - draws the rain into a terminal.
//!
//! Pixel coordinates from the renderer are mapped onto a grid of cells.
//! Fades dim cell intensities instead of blending pixels, and each frame is
//! written as the minimal set of cursor moves and 24-bit color changes.

mod cell;
mod grid;
mod surface;
pub mod tty;

pub use cell::{Cell, Rgb, Shade, VISIBILITY_FLOOR};
pub use grid::RainGrid;
pub use surface::{CellMetrics, TermSurface, WindowSize};
pub use tty::ScreenGuard;

/// Size used when the terminal cannot be measured.
pub const DEFAULT_COLS: u16 = 80;
pub const DEFAULT_ROWS: u16 = 24;
