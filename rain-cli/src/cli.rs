use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rain_core::{Intensity, Preset, RainConfig};

/// Digital rain for the terminal.
#[derive(Debug, Parser)]
#[command(name = "rain", version, about, long_about = None)]
pub struct Args {
    /// JSON config file. Defaults to `<config dir>/rain/config.json` when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Effect preset: low, medium or high. Sets density, speed and intensity.
    #[arg(long)]
    pub preset: Option<Preset>,

    /// Drop density multiplier.
    #[arg(long)]
    pub density: Option<f32>,

    /// Fall speed multiplier.
    #[arg(long)]
    pub speed: Option<f32>,

    /// Intensity tier: low, medium, high or extreme.
    #[arg(long)]
    pub intensity: Option<Intensity>,

    /// Only run on narrow (mobile-sized) terminals.
    #[arg(long)]
    pub mobile_only: bool,

    /// Behave as if the host asked for reduced motion.
    #[arg(long)]
    pub reduced_motion: bool,

    /// Target frames per second.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Exit after this many seconds.
    #[arg(long, value_name = "SECS", value_parser = parse_seconds)]
    pub duration: Option<Duration>,

    /// Write logs here instead of stderr.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Load the config file (explicit or default) and apply flag overrides.
    pub fn resolve_config(&self) -> Result<RainConfig> {
        self.resolve_config_from(default_config_path().as_deref())
    }

    /// Like `resolve_config`, with the default location given explicitly.
    pub fn resolve_config_from(&self, default_path: Option<&Path>) -> Result<RainConfig> {
        let base = match (&self.config, default_path) {
            (Some(path), _) => RainConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            (None, Some(path)) if path.exists() => RainConfig::load(path)
                .with_context(|| format!("loading default config {}", path.display()))?,
            _ => RainConfig::default(),
        };

        let config = self.apply(base);
        config.validate().context("invalid rain settings")?;
        Ok(config)
    }

    /// Overlay command-line flags on a base config. The preset goes first so
    /// individual flags can refine it.
    pub fn apply(&self, mut config: RainConfig) -> RainConfig {
        if let Some(preset) = self.preset {
            config = config.with_preset(preset);
        }
        if let Some(density) = self.density {
            config.density = density;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(intensity) = self.intensity {
            config.intensity = intensity;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if self.mobile_only {
            config.mobile_only = true;
        }
        config
    }
}

/// `<config dir>/rain/config.json`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rain").join("config.json"))
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number of seconds"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("duration must be positive, got {value}"));
    }
    Ok(Duration::from_secs_f64(secs))
}
