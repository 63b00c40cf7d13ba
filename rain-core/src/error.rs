//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("density must be between 0 and {max}, got {got}")]
    Density { got: f32, max: f32 },

    #[error("speed must be at least {min}, got {got}")]
    Speed { got: f32, min: f32 },

    #[error("fps must be between {min} and {max}, got {got}")]
    Fps { got: u32, min: u32, max: u32 },

    #[error("trail range {min}..{max} is empty or starts at zero")]
    TrailRange { min: usize, max: usize },

    #[error("unknown {kind} '{value}'")]
    UnknownName { kind: &'static str, value: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
