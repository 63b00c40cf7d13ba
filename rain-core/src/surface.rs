//! The drawing surface the renderer paints onto.

use crate::palette::GlyphStyle;
use crate::primitives::{Color, Point, Size};

/// A drawing target measured in pixels.
///
/// The renderer never clears the surface. Each frame starts with a
/// translucent `fade` wash, so earlier frames show through as trails.
pub trait Surface {
    /// Current dimensions.
    fn size(&self) -> Size;

    /// Re-measure the host and adopt its current dimensions. Called before
    /// every reseed.
    fn sync_size(&mut self) -> Size {
        self.size()
    }

    /// Whether the surface can be drawn on right now (attached, context available).
    fn is_ready(&self) -> bool {
        true
    }

    /// Paint `wash` over the whole surface, blending with its alpha.
    fn fade(&mut self, wash: Color);

    /// Draw one glyph with its baseline-left corner at `at`.
    fn draw_glyph(&mut self, glyph: char, at: Point, style: &GlyphStyle);

    /// Flush the frame to the host.
    fn present(&mut self) {}
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn sync_size(&mut self) -> Size {
        (**self).sync_size()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn fade(&mut self, wash: Color) {
        (**self).fade(wash)
    }

    fn draw_glyph(&mut self, glyph: char, at: Point, style: &GlyphStyle) {
        (**self).draw_glyph(glyph, at, style)
    }

    fn present(&mut self) {
        (**self).present()
    }
}
