//! Trailing-edge debounce for resize notifications.

use std::time::{Duration, Instant};

/// Collapses a burst of triggers into one firing after a quiet window.
///
/// Time is passed in explicitly, so the same type serves the frame loop and
/// deterministic tests.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    /// Time of the most recent trigger not yet fired.
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Record a trigger. Restarts the quiet window.
    pub fn trigger(&mut self, at: Instant) {
        self.last = Some(at);
    }

    pub fn is_pending(&self) -> bool {
        self.last.is_some()
    }

    /// True exactly once per burst, the first time `now` is a full window
    /// past the last trigger.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) >= self.window => {
                self.last = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    #[test]
    fn idle_debouncer_never_fires() {
        let mut d = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        assert!(!d.is_pending());
        assert!(!d.poll(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn burst_fires_once_after_quiet_window() {
        let mut d = Debouncer::new(WINDOW);
        let t0 = Instant::now();

        // 10 triggers within 50ms
        for i in 0..10 {
            d.trigger(t0 + Duration::from_millis(i * 5));
        }
        let last = t0 + Duration::from_millis(45);

        let mut fired = 0;
        // Poll every frame (~16ms) for a second.
        for frame in 0..60u64 {
            if d.poll(t0 + Duration::from_millis(frame * 16)) {
                fired += 1;
                assert!(t0 + Duration::from_millis(frame * 16) >= last + WINDOW);
            }
        }
        assert_eq!(fired, 1);
        assert!(!d.is_pending());
    }

    #[test]
    fn trigger_during_window_restarts_it() {
        let mut d = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        d.trigger(t0);
        assert!(!d.poll(t0 + Duration::from_millis(90)));
        d.trigger(t0 + Duration::from_millis(90));
        assert!(!d.poll(t0 + Duration::from_millis(150)));
        assert!(d.poll(t0 + Duration::from_millis(190)));
    }

    #[test]
    fn separate_bursts_fire_separately() {
        let mut d = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        d.trigger(t0);
        assert!(d.poll(t0 + WINDOW));
        d.trigger(t0 + Duration::from_millis(500));
        assert!(!d.poll(t0 + Duration::from_millis(550)));
        assert!(d.poll(t0 + Duration::from_millis(600)));
    }

    #[test]
    fn poll_before_trigger_time_does_not_fire() {
        let mut d = Debouncer::new(WINDOW);
        let t0 = Instant::now() + Duration::from_secs(1);
        d.trigger(t0);
        assert!(!d.poll(t0 - Duration::from_millis(500)));
        assert!(d.is_pending());
    }
}
