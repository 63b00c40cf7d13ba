//! The frame loop thread and its handle.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, Receiver, Sender};
use rain_core::{RainEvent, RainField, ReseedCause, Surface};

use crate::debounce::Debouncer;
use crate::stats::FrameStats;

/// Messages from the owner to the loop thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// The surface changed size. Debounced before the field is rebuilt.
    Resize,
    /// Raise the glitch chance for this long.
    Glitch(Duration),
    /// Exit after the current frame.
    Stop,
}

/// Timing knobs for one loop, taken from the config at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    pub frame_interval: Duration,
    pub resize_debounce: Duration,
    /// Frames before this much time has passed tick but are not painted.
    pub reveal_delay: Duration,
}

/// A running frame loop that owns a surface until stopped.
pub struct LoopHandle<S> {
    /// Handle to the loop thread. Yields the surface back on exit.
    handle: Option<JoinHandle<S>>,

    /// Checked before every paint.
    cancelled: Arc<AtomicBool>,

    control: Sender<Control>,
}

impl<S: Surface + Send + 'static> LoopHandle<S> {
    /// Spawn the loop thread.
    ///
    /// `active` is incremented before the thread starts and decremented when
    /// it exits.
    pub fn spawn(
        surface: S,
        field: RainField,
        settings: LoopSettings,
        events: Sender<RainEvent>,
        active: Arc<AtomicUsize>,
    ) -> io::Result<Self> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let (control, control_rx) = crossbeam_channel::unbounded();

        active.fetch_add(1, Ordering::SeqCst);
        let guard = ActiveGuard(active);
        let cancelled_clone = cancelled.clone();

        let handle = thread::Builder::new()
            .name("rain-loop".into())
            .spawn(move || {
                let _guard = guard;
                frame_loop(surface, field, settings, control_rx, events, cancelled_clone)
            })?;

        Ok(Self {
            handle: Some(handle),
            cancelled,
            control,
        })
    }

    /// Schedule a debounced rebuild for the surface's current size.
    pub fn resize(&self) {
        let _ = self.control.send(Control::Resize);
    }

    /// Start a glitch burst of the given length.
    pub fn glitch(&self, duration: Duration) {
        let _ = self.control.send(Control::Glitch(duration));
    }
}

impl<S> LoopHandle<S> {
    /// True once the thread has exited (stopped, or panicked).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Stop the loop and wait for it. Returns the surface unless the loop
    /// thread panicked.
    ///
    /// No paint happens after this returns.
    pub fn stop(mut self) -> Option<S> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<S> {
        self.cancelled.store(true, Ordering::SeqCst);
        let _ = self.control.send(Control::Stop);
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(surface) => Some(surface),
            Err(_) => {
                tracing::warn!("rain loop thread panicked; surface lost");
                None
            }
        }
    }
}

impl<S> Drop for LoopHandle<S> {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown();
        }
    }
}

/// Decrements the live-loop counter when the thread exits, including by panic.
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The main frame loop.
fn frame_loop<S: Surface>(
    mut surface: S,
    mut field: RainField,
    settings: LoopSettings,
    control: Receiver<Control>,
    events: Sender<RainEvent>,
    cancelled: Arc<AtomicBool>,
) -> S {
    let mut rng = rand::thread_rng();
    let started = Instant::now();

    let _ = events.send(RainEvent::Started {
        intensity: field.tier(),
    });
    field.reseed(&mut rng, surface.sync_size());
    let _ = events.send(reseeded(&field, ReseedCause::Start));

    let ticker = crossbeam_channel::tick(settings.frame_interval);
    let mut resize = Debouncer::new(settings.resize_debounce);
    let mut glitch_until: Option<Instant> = None;
    let mut stats = FrameStats::new();

    loop {
        select! {
            recv(control) -> msg => match msg {
                Ok(Control::Resize) => resize.trigger(Instant::now()),
                Ok(Control::Glitch(duration)) => {
                    glitch_until = Some(Instant::now() + duration);
                    field.set_glitch_burst(true);
                    let _ = events.send(RainEvent::GlitchBurst {
                        duration_ms: duration.as_millis() as u64,
                    });
                }
                Ok(Control::Stop) | Err(_) => break,
            },
            recv(ticker) -> tick => {
                let Ok(now) = tick else { break };
                if cancelled.load(Ordering::SeqCst) {
                    break;
                }

                if resize.poll(now) {
                    field.reseed(&mut rng, surface.sync_size());
                    let _ = events.send(reseeded(&field, ReseedCause::Resize));
                }
                if glitch_until.is_some_and(|until| now >= until) {
                    glitch_until = None;
                    field.set_glitch_burst(false);
                }

                field.tick(&mut rng);
                if now.saturating_duration_since(started) < settings.reveal_delay {
                    stats.skip();
                } else {
                    stats.measure(|| field.paint(&mut surface, &mut rng));
                }
            }
        }
    }

    tracing::debug!(
        frames = stats.frames(),
        painted = stats.painted(),
        glyphs = stats.glyphs(),
        slowest_paint = ?stats.slowest_paint(),
        "rain loop stopped"
    );
    let _ = events.send(RainEvent::Stopped {
        frames: stats.painted(),
    });
    surface
}

fn reseeded(field: &RainField, cause: ReseedCause) -> RainEvent {
    let size = field.size();
    RainEvent::Reseeded {
        cause,
        columns: field.columns(),
        drops: field.streams().len(),
        width: size.width,
        height: size.height,
    }
}
