//! Rain Loop - drives a rain field on its own thread.
//!
//! The loop owns the surface while it runs, paces frames with a ticker and
//! takes resize, glitch and stop requests over a channel. Stopping joins the
//! thread, so nothing is painted after `stop` returns.

pub mod debounce;
pub mod handle;
pub mod renderer;
pub mod stats;

pub use debounce::Debouncer;
pub use handle::{Control, LoopHandle, LoopSettings};
pub use renderer::{RainRenderer, RendererError, StartOutcome, GLITCH_BURST};
pub use stats::FrameStats;
