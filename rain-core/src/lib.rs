//! Rain Core - the digital rain model.
//!
//! This crate holds everything about the effect that does not depend on how
//! frames are scheduled or where they are shown:
//! - Configuration, intensity tiers and presets
//! - The visibility predicate over host signals
//! - Glyph streams and the drop field (sizing, tick rules, painting)
//! - The `Surface` trait painted onto
//! - Events reported to subscribers

pub mod config;
pub mod environment;
pub mod event;
pub mod field;
pub mod glyphs;
pub mod palette;
pub mod primitives;
pub mod stream;
pub mod surface;

mod error;

pub use config::{Intensity, IntensityProfile, Preset, RainConfig};
pub use environment::{visibility, Environment, SuppressReason, Visibility};
pub use error::ConfigError;
pub use event::{RainEvent, ReseedCause};
pub use field::{column_count, PaintReport, RainField, TickReport};
pub use palette::{Glow, GlyphStyle};
pub use primitives::{Color, Point, Size};
pub use stream::GlyphStream;
pub use surface::Surface;
