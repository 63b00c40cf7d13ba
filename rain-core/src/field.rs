//! The drop field: sizing, per-tick update, and painting.
//!
//! A `RainField` owns every live `GlyphStream`. It is mutated only by its
//! owner, once per tick, and rebuilt wholesale on resize.

use std::ops::Range;

use rand::Rng;

use crate::config::{Intensity, IntensityProfile, RainConfig, MAX_DENSITY, MIN_SPEED};
use crate::palette::{self, BACKGROUND};
use crate::primitives::{Point, Size};
use crate::stream::GlyphStream;
use crate::surface::Surface;

/// Per-tick chance that a drop past the bottom is recycled.
pub const RECYCLE_CHANCE: f64 = 0.35;
/// Chance that a recycled drop gets fresh glyphs.
pub const REROLL_CHANCE: f64 = 0.1;
/// Maximum horizontal jitter per glyph, in pixels.
pub const JITTER_PX: f32 = 1.0;
/// Glitch chance while a glitch burst is active.
pub const GLITCH_BURST_CHANCE: f64 = 0.15;
/// Attempts at finding a free lane when spawning.
const SPAWN_ATTEMPTS: usize = 4;

/// Number of columns of rain for a surface width.
///
/// `floor(floor(width / spacing) * density)`. Zero for zero, negative or
/// non-finite inputs; `spacing` is always a positive tier constant.
pub fn column_count(width: f32, spacing: f32, density: f32) -> usize {
    let lanes = lane_count(width, spacing);
    let columns = (lanes as f32 * density).floor();
    if columns.is_finite() && columns > 0.0 {
        columns as usize
    } else {
        0
    }
}

/// Number of distinct horizontal positions a drop can occupy.
fn lane_count(width: f32, spacing: f32) -> usize {
    if !(spacing > 0.0) {
        return 0;
    }
    let lanes = (width / spacing).floor();
    if lanes.is_finite() && lanes > 0.0 {
        lanes as usize
    } else {
        0
    }
}

/// What a tick changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub recycled: usize,
    pub spawned: usize,
}

/// What a paint pass drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintReport {
    /// False when the surface was not ready or had no area.
    pub painted: bool,
    pub glyphs: usize,
}

/// All live drops for one surface.
#[derive(Debug, Clone)]
pub struct RainField {
    size: Size,
    tier: Intensity,
    profile: IntensityProfile,
    density: f32,
    speed: f32,
    trail: Range<usize>,
    lanes: usize,
    columns: usize,
    streams: Vec<GlyphStream>,
    glitch_burst: bool,
}

impl RainField {
    /// Create an empty field for a tier. Call `reseed` to populate it.
    ///
    /// Density and speed are clamped to the ranges `RainConfig::validate`
    /// accepts.
    pub fn new(config: &RainConfig, tier: Intensity) -> Self {
        Self {
            size: Size::ZERO,
            tier,
            profile: tier.profile(),
            density: config.density.clamp(0.0, MAX_DENSITY),
            speed: config.speed.max(MIN_SPEED),
            trail: config.trail_min..config.trail_max,
            lanes: 0,
            columns: 0,
            streams: Vec::new(),
            glitch_burst: false,
        }
    }

    /// Rebuild for a new surface size: recompute columns and reseed every drop.
    pub fn reseed<R: Rng + ?Sized>(&mut self, rng: &mut R, size: Size) {
        self.size = size;
        self.lanes = lane_count(size.width, self.profile.column_spacing);
        self.columns = column_count(size.width, self.profile.column_spacing, self.density);
        self.streams.clear();
        self.streams.reserve(self.max_streams());
        for _ in 0..self.columns {
            let x = self.random_lane_x(rng);
            self.streams.push(GlyphStream::spawn(
                rng,
                x,
                size.height,
                self.speed,
                self.trail.clone(),
            ));
        }
        tracing::debug!(
            width = size.width,
            height = size.height,
            lanes = self.lanes,
            columns = self.columns,
            "reseeded rain field"
        );
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn tier(&self) -> Intensity {
        self.tier
    }

    pub fn profile(&self) -> &IntensityProfile {
        &self.profile
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn streams(&self) -> &[GlyphStream] {
        &self.streams
    }

    /// Upper bound on live drops: `columns * char_density`.
    pub fn max_streams(&self) -> usize {
        (self.columns as f32 * self.profile.char_density).floor() as usize
    }

    /// Head position beyond which a drop is always recycled.
    pub fn recycle_limit(&self) -> f32 {
        self.size.height + self.trail.end as f32 * self.profile.glyph_size
    }

    pub fn set_glitch_burst(&mut self, active: bool) {
        self.glitch_burst = active;
    }

    pub fn glitch_burst(&self) -> bool {
        self.glitch_burst
    }

    /// Advance every drop by one tick, recycle the ones that fell through,
    /// and occasionally spawn a new one.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickReport {
        let mut report = TickReport::default();
        let height = self.size.height;
        let glyph_size = self.profile.glyph_size;
        let hard_limit = self.recycle_limit();

        for i in 0..self.streams.len() {
            let stream = &mut self.streams[i];
            stream.advance();
            if rng.gen_bool(self.profile.flicker_chance) {
                stream.flicker(rng);
            }

            let must = stream.head() > hard_limit;
            let may = stream.is_past(height, glyph_size) && rng.gen_bool(RECYCLE_CHANCE);
            if must || may {
                let x = self.random_lane_x(rng);
                self.streams[i].recycle(rng, x, height, self.speed, REROLL_CHANCE);
                report.recycled += 1;
            }
        }

        if self.streams.len() < self.max_streams() && rng.gen_bool(self.profile.spawn_chance) {
            if let Some(x) = self.free_lane_x(rng) {
                self.streams.push(GlyphStream::spawn(
                    rng,
                    x,
                    height,
                    self.speed,
                    self.trail.clone(),
                ));
                report.spawned += 1;
            }
        }

        report
    }

    /// Paint the current state: fade wash, then every visible trail glyph.
    ///
    /// A surface that is not ready or has no area is left untouched.
    pub fn paint<S, R>(&self, surface: &mut S, rng: &mut R) -> PaintReport
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        if !surface.is_ready() || surface.size().is_empty() {
            return PaintReport::default();
        }

        surface.fade(BACKGROUND.with_alpha(self.profile.fade_alpha));

        let glyph_size = self.profile.glyph_size;
        let bottom = self.size.height + glyph_size;
        let glitch_chance = if self.glitch_burst {
            GLITCH_BURST_CHANCE
        } else {
            self.profile.glitch_chance
        };

        let mut drawn = 0;
        for stream in &self.streams {
            for (i, (&glyph, &brightness)) in stream
                .glyphs()
                .iter()
                .zip(stream.brightness())
                .enumerate()
            {
                let y = stream.glyph_y(i, glyph_size);
                if y <= 0.0 || y >= bottom {
                    continue;
                }
                let glitch = rng.gen_bool(glitch_chance);
                let style = palette::glyph_style(i, brightness, &self.profile, glitch);
                let jitter = rng.gen_range(-JITTER_PX..=JITTER_PX);
                surface.draw_glyph(glyph, Point::new(stream.x() + jitter, y), &style);
                drawn += 1;
            }
        }

        surface.present();
        PaintReport {
            painted: true,
            glyphs: drawn,
        }
    }

    /// One full animation step: `tick` then `paint`.
    pub fn frame<S, R>(&mut self, surface: &mut S, rng: &mut R) -> (TickReport, PaintReport)
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        let tick = self.tick(rng);
        let paint = self.paint(surface, rng);
        (tick, paint)
    }

    fn random_lane_x<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.lanes == 0 {
            return 0.0;
        }
        rng.gen_range(0..self.lanes) as f32 * self.profile.column_spacing
    }

    /// A lane with no drop in it, or whose drops are all past mid-height.
    fn free_lane_x<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<f32> {
        if self.lanes == 0 {
            return None;
        }
        let midline = self.size.height * 0.5;
        (0..SPAWN_ATTEMPTS)
            .map(|_| self.random_lane_x(rng))
            .find(|&x| {
                self.streams
                    .iter()
                    .filter(|s| s.x() == x)
                    .all(|s| s.head() > midline)
            })
    }
}
