//! The public renderer: start, stop, resize and glitch control over one
//! surface.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use rain_core::{
    visibility, ConfigError, Environment, Intensity, RainConfig, RainEvent, RainField,
    SuppressReason, Surface, Visibility,
};
use thiserror::Error;

use crate::handle::{LoopHandle, LoopSettings};

/// How long `trigger_glitch` raises the glitch chance.
pub const GLITCH_BURST: Duration = Duration::from_millis(500);

/// Errors from starting a renderer.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn rain loop: {0}")]
    Spawn(#[from] io::Error),

    /// A previous loop panicked while holding the surface.
    #[error("surface was lost when the previous loop panicked")]
    SurfaceLost,
}

/// What `start` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new loop is running at this tier.
    Started { intensity: Intensity },
    /// A loop was already running. Nothing changed.
    AlreadyRunning,
    /// Visibility rules declined to run. No loop was created.
    Suppressed(SuppressReason),
}

/// Owns a surface and at most one frame loop painting it.
///
/// The surface is parked here while stopped and moves to the loop thread
/// while running.
pub struct RainRenderer<S: Surface + Send + 'static> {
    surface: Option<S>,
    running: Option<LoopHandle<S>>,
    /// Config of the last `start`, kept until `stop` so environment changes
    /// can pause and resume the loop.
    requested: Option<RainConfig>,
    events: Sender<RainEvent>,
    active: Arc<AtomicUsize>,
}

impl<S: Surface + Send + 'static> RainRenderer<S> {
    /// Create a stopped renderer and the receiving end of its event stream.
    pub fn new(surface: S) -> (Self, Receiver<RainEvent>) {
        let (events, events_rx) = crossbeam_channel::unbounded();
        let renderer = Self {
            surface: Some(surface),
            running: None,
            requested: None,
            events,
            active: Arc::new(AtomicUsize::new(0)),
        };
        (renderer, events_rx)
    }

    /// Start animating with the given config and host signals.
    ///
    /// Idempotent: while a loop is running this returns `AlreadyRunning`.
    pub fn start(
        &mut self,
        config: &RainConfig,
        env: &Environment,
    ) -> Result<StartOutcome, RendererError> {
        if self.is_running() {
            return Ok(StartOutcome::AlreadyRunning);
        }
        // Reap a loop that exited on its own.
        self.halt();

        config.validate()?;
        self.requested = Some(config.clone());
        self.launch(config, env)
    }

    /// Re-run the visibility rules after the host environment changed, e.g.
    /// the viewport crossed the mobile breakpoint.
    ///
    /// A running loop the rules now suppress is stopped. A loop suppressed
    /// earlier is started again once the rules allow it. Returns `None` when
    /// the renderer was never started or was stopped by the caller.
    pub fn update_environment(
        &mut self,
        env: &Environment,
    ) -> Result<Option<StartOutcome>, RendererError> {
        let Some(config) = self.requested.clone() else {
            return Ok(None);
        };
        match (visibility(&config, env), self.is_running()) {
            (Visibility::Suppressed(reason), true) => {
                self.halt();
                tracing::info!(?reason, "rain suppressed after environment change");
                let _ = self.events.send(RainEvent::Suppressed { reason });
                Ok(Some(StartOutcome::Suppressed(reason)))
            }
            (Visibility::Suppressed(reason), false) => Ok(Some(StartOutcome::Suppressed(reason))),
            (Visibility::Run(_), true) => Ok(Some(StartOutcome::AlreadyRunning)),
            (Visibility::Run(_), false) => {
                self.halt();
                self.launch(&config, env).map(Some)
            }
        }
    }

    /// Evaluate visibility and spawn a loop. Expects no loop to be running.
    fn launch(
        &mut self,
        config: &RainConfig,
        env: &Environment,
    ) -> Result<StartOutcome, RendererError> {
        let tier = match visibility(config, env) {
            Visibility::Suppressed(reason) => {
                tracing::info!(?reason, "rain suppressed");
                let _ = self.events.send(RainEvent::Suppressed { reason });
                return Ok(StartOutcome::Suppressed(reason));
            }
            Visibility::Run(tier) => tier,
        };

        let surface = self.surface.take().ok_or(RendererError::SurfaceLost)?;
        let settings = LoopSettings {
            frame_interval: config.frame_interval(),
            resize_debounce: config.resize_debounce(),
            reveal_delay: config.reveal_delay(),
        };
        let field = RainField::new(config, tier);

        // On spawn failure the closure, and the surface in it, is dropped.
        let handle = LoopHandle::spawn(
            surface,
            field,
            settings,
            self.events.clone(),
            self.active.clone(),
        )?;
        self.running = Some(handle);

        tracing::info!(
            intensity = %tier,
            requested = %config.intensity,
            fps = config.fps,
            "rain started"
        );
        Ok(StartOutcome::Started { intensity: tier })
    }

    /// Stop the loop and wait for it to exit. Safe to call when stopped.
    pub fn stop(&mut self) {
        self.requested = None;
        self.halt();
    }

    /// Stop the loop but keep the requested config.
    fn halt(&mut self) {
        let Some(handle) = self.running.take() else {
            return;
        };
        if let Some(surface) = handle.stop() {
            self.surface = Some(surface);
        }
        tracing::info!("rain stopped");
    }

    /// Notify the loop that the surface size changed. Ignored when stopped.
    pub fn resize(&self) {
        if let Some(handle) = &self.running {
            handle.resize();
        }
    }

    /// Raise the glitch chance for `GLITCH_BURST`. Ignored when stopped.
    pub fn trigger_glitch(&self) {
        if let Some(handle) = &self.running {
            handle.glitch(GLITCH_BURST);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Live loop threads started by this renderer. Never more than one.
    pub fn active_loops(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// The parked surface, when stopped.
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }
}

impl<S: Surface + Send + 'static> Drop for RainRenderer<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
