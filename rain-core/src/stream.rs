//! A single falling trail of glyphs.

use std::ops::Range;

use rand::Rng;

use crate::glyphs;

/// Range of the per-drop speed factor, before the configured multiplier.
pub const SPEED_FACTOR: Range<f32> = 1.0..3.0;

/// One column's falling trail ("drop").
///
/// Index 0 is the head. The trail extends upward from the head, one glyph
/// pitch per index.
#[derive(Debug, Clone)]
pub struct GlyphStream {
    /// Left edge of the column in pixels.
    x: f32,
    /// Vertical position of the head glyph in pixels.
    head: f32,
    /// Pixels advanced per tick. Always positive.
    speed: f32,
    glyphs: Vec<char>,
    /// `brightness[i] = 1 - i / len`, fixed for the drop's lifetime.
    brightness: Vec<f32>,
}

impl GlyphStream {
    /// Build a stream from explicit parts.
    pub fn new(x: f32, head: f32, speed: f32, glyphs: Vec<char>) -> Self {
        let brightness = trail_brightness(glyphs.len());
        Self {
            x,
            head,
            speed,
            glyphs,
            brightness,
        }
    }

    /// Seed a new stream above the surface with random length, speed and glyphs.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        x: f32,
        surface_height: f32,
        speed_multiplier: f32,
        trail: Range<usize>,
    ) -> Self {
        let len = rng.gen_range(trail);
        let head = entry_height(rng, surface_height);
        let speed = rng.gen_range(SPEED_FACTOR) * speed_multiplier;
        Self::new(x, head, speed, glyphs::random_trail(rng, len))
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn head(&self) -> f32 {
        self.head
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Trail length in glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn brightness(&self) -> &[f32] {
        &self.brightness
    }

    /// Vertical position of trail glyph `index`.
    #[inline]
    pub fn glyph_y(&self, index: usize, glyph_size: f32) -> f32 {
        self.head - index as f32 * glyph_size
    }

    /// Move the head down by one tick. The head always moves, even when
    /// `speed` is below the `f32` resolution at the current position.
    #[inline]
    pub fn advance(&mut self) {
        let next = self.head + self.speed;
        self.head = if next > self.head {
            next
        } else {
            self.head + self.head.abs() * f32::EPSILON
        };
    }

    /// Swap one random trail glyph.
    pub fn flicker<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.glyphs.is_empty() {
            return;
        }
        let idx = rng.gen_range(0..self.glyphs.len());
        self.glyphs[idx] = glyphs::random_glyph(rng);
    }

    /// The whole trail, tail included, has left the bottom of the surface.
    #[inline]
    pub fn is_past(&self, surface_height: f32, glyph_size: f32) -> bool {
        self.head > surface_height + self.len() as f32 * glyph_size
    }

    /// Reset above the surface in a new column with a new speed.
    ///
    /// The trail length is kept. With probability `reroll_chance` the glyphs
    /// are replaced as well.
    pub fn recycle<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        x: f32,
        surface_height: f32,
        speed_multiplier: f32,
        reroll_chance: f64,
    ) {
        self.x = x;
        self.head = entry_height(rng, surface_height);
        self.speed = rng.gen_range(SPEED_FACTOR) * speed_multiplier;
        if rng.gen_bool(reroll_chance.clamp(0.0, 1.0)) {
            let len = self.glyphs.len();
            self.glyphs = glyphs::random_trail(rng, len);
        }
    }
}

/// A head position in `[-surface_height, 0]`.
fn entry_height<R: Rng + ?Sized>(rng: &mut R, surface_height: f32) -> f32 {
    -rng.gen_range(0.0..=surface_height.max(0.0))
}

/// Brightness ramp from 1.0 at the head toward zero at the tail.
pub fn trail_brightness(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (1.0 - i as f32 / len as f32).max(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn brightness_decreases_from_head() {
        for len in [1usize, 2, 10, 29] {
            let b = trail_brightness(len);
            assert_eq!(b.len(), len);
            assert_eq!(b[0], 1.0);
            for pair in b.windows(2) {
                assert!(pair[1] < pair[0], "len {len}: {:?}", b);
            }
            assert!(b.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn spawn_respects_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let s = GlyphStream::spawn(&mut rng, 28.0, 800.0, 1.0, 10..30);
            assert!((10..30).contains(&s.len()));
            assert!(s.head() <= 0.0 && s.head() >= -800.0);
            assert!(s.speed() >= 1.0 && s.speed() < 3.0);
            assert_eq!(s.x(), 28.0);
        }
    }

    #[test]
    fn spawn_on_zero_height_surface() {
        let mut rng = StdRng::seed_from_u64(3);
        let s = GlyphStream::spawn(&mut rng, 0.0, 0.0, 1.0, 10..30);
        assert_eq!(s.head(), 0.0);
    }

    #[test]
    fn advance_moves_head_down() {
        let mut s = GlyphStream::new(0.0, -10.0, 2.5, vec!['A'; 5]);
        s.advance();
        assert_eq!(s.head(), -7.5);
    }

    #[test]
    fn advance_never_stalls_on_tiny_speed() {
        for head in [-800.0f32, -123.4, 500.0, 4000.0] {
            let mut s = GlyphStream::new(0.0, head, 1e-6, vec!['A'; 5]);
            s.advance();
            assert!(s.head() > head, "stalled at {head}");
        }
    }

    #[test]
    fn trail_extends_upward() {
        let s = GlyphStream::new(0.0, 100.0, 1.0, vec!['A'; 3]);
        assert_eq!(s.glyph_y(0, 14.0), 100.0);
        assert_eq!(s.glyph_y(2, 14.0), 72.0);
    }

    #[test]
    fn is_past_uses_trail_extent() {
        let s = GlyphStream::new(0.0, 800.0 + 10.0 * 14.0, 1.0, vec!['A'; 10]);
        assert!(!s.is_past(800.0, 14.0));
        let s = GlyphStream::new(0.0, 800.0 + 10.0 * 14.0 + 0.5, 1.0, vec!['A'; 10]);
        assert!(s.is_past(800.0, 14.0));
    }

    #[test]
    fn recycle_resets_above_surface_and_keeps_length() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut s = GlyphStream::new(0.0, 5000.0, 1.0, vec!['A'; 12]);
        s.recycle(&mut rng, 42.0, 800.0, 2.0, 1.0);
        assert!(s.head() <= 0.0);
        assert_eq!(s.x(), 42.0);
        assert_eq!(s.len(), 12);
        assert_eq!(s.brightness().len(), 12);
        assert!(s.speed() >= 2.0 && s.speed() < 6.0);
    }

    #[test]
    fn flicker_keeps_length() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = GlyphStream::new(0.0, 0.0, 1.0, vec!['A'; 8]);
        for _ in 0..50 {
            s.flicker(&mut rng);
        }
        assert_eq!(s.len(), 8);

        let mut empty = GlyphStream::new(0.0, 0.0, 1.0, Vec::new());
        empty.flicker(&mut rng);
        assert!(empty.is_empty());
    }
}
