//! Rain CLI - argument parsing, config discovery, logging and host detection
//! for the `rain` binary.

pub mod cli;
pub mod env;
pub mod logging;

pub use cli::{default_config_path, Args};
pub use logging::setup_logging;
