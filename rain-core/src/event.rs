//! Events emitted by a renderer to its subscribers (host UI, logs, tests).

use serde::Serialize;

use crate::config::Intensity;
use crate::environment::SuppressReason;

/// Why the drop field was rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReseedCause {
    /// First layout after the loop started.
    Start,
    /// A debounced burst of resize notifications settled.
    Resize,
}

/// Lifecycle and layout events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RainEvent {
    /// The loop is running at this tier.
    Started { intensity: Intensity },

    /// `start` declined to run.
    Suppressed { reason: SuppressReason },

    /// The field was rebuilt for a surface size.
    Reseeded {
        cause: ReseedCause,
        columns: usize,
        drops: usize,
        width: f32,
        height: f32,
    },

    /// A glitch burst began.
    GlitchBurst { duration_ms: u64 },

    /// The loop exited after painting this many frames.
    Stopped { frames: u64 },
}
