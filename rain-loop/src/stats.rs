//! Frame timing instrumentation for the rain loop.
//!
//! Paint passes are timed on every frame; a summary is logged at `trace`
//! level every `SAMPLE_EVERY` frames to avoid flooding.

use std::time::{Duration, Instant};

use rain_core::PaintReport;

/// Log a timing line once per this many frames.
pub const SAMPLE_EVERY: u64 = 60;

/// Per-loop counters.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frames: u64,
    painted: u64,
    glyphs: u64,
    last_paint: Duration,
    slowest_paint: Duration,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames that reached the surface.
    pub fn painted(&self) -> u64 {
        self.painted
    }

    /// Glyphs drawn across all painted frames.
    pub fn glyphs(&self) -> u64 {
        self.glyphs
    }

    pub fn last_paint(&self) -> Duration {
        self.last_paint
    }

    pub fn slowest_paint(&self) -> Duration {
        self.slowest_paint
    }

    /// Count a frame that ticked without painting (reveal delay).
    pub fn skip(&mut self) {
        self.frames += 1;
    }

    /// Time one paint pass and fold its report into the counters.
    #[inline]
    pub fn measure(&mut self, paint: impl FnOnce() -> PaintReport) -> PaintReport {
        let start = Instant::now();
        let report = paint();
        let elapsed = start.elapsed();

        let frame = self.frames;
        self.frames += 1;
        if report.painted {
            self.painted += 1;
            self.glyphs += report.glyphs as u64;
        }
        self.last_paint = elapsed;
        self.slowest_paint = self.slowest_paint.max(elapsed);

        if frame % SAMPLE_EVERY == 0 {
            tracing::trace!(
                frame,
                glyphs = report.glyphs,
                total_glyphs = self.glyphs,
                paint = ?elapsed,
                slowest = ?self.slowest_paint,
                "frame timing"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_returns_report_and_counts() {
        let mut stats = FrameStats::new();
        let report = stats.measure(|| PaintReport {
            painted: true,
            glyphs: 42,
        });
        assert_eq!(report.glyphs, 42);
        assert_eq!(stats.frames(), 1);
        assert_eq!(stats.painted(), 1);
        assert_eq!(stats.glyphs(), 42);
    }

    #[test]
    fn unpainted_frames_are_counted_separately() {
        let mut stats = FrameStats::new();
        stats.measure(PaintReport::default);
        stats.skip();
        assert_eq!(stats.frames(), 2);
        assert_eq!(stats.painted(), 0);
        assert_eq!(stats.glyphs(), 0);
    }

    #[test]
    fn slowest_paint_only_grows() {
        let mut stats = FrameStats::new();
        stats.measure(|| {
            std::thread::sleep(Duration::from_millis(2));
            PaintReport::default()
        });
        let slowest = stats.slowest_paint();
        stats.measure(PaintReport::default);
        assert!(stats.slowest_paint() >= slowest);
        assert!(stats.last_paint() <= stats.slowest_paint());
    }
}
