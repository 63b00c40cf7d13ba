//! Renderer configuration.
//!
//! A single model covers every option the renderer understands: density and
//! speed multipliers, an intensity tier, and the environment switches. Files
//! are JSON; every field is optional and falls back to its default.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lowest frame rate the loop accepts.
pub const MIN_FPS: u32 = 1;
/// Highest frame rate the loop accepts.
pub const MAX_FPS: u32 = 240;
/// Largest density multiplier. Keeps column and drop counts small enough to
/// allocate.
pub const MAX_DENSITY: f32 = 10.0;
/// Slowest speed multiplier. Below this a per-tick step is lost to `f32`
/// rounding at typical head positions and drops stall.
pub const MIN_SPEED: f32 = 0.01;

/// Visual intensity tier, ordered from cheapest to most expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    #[default]
    Medium,
    High,
    Extreme,
}

impl Intensity {
    pub const ALL: [Intensity; 4] = [
        Intensity::Low,
        Intensity::Medium,
        Intensity::High,
        Intensity::Extreme,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
            Intensity::Extreme => "extreme",
        }
    }

    /// Tuning constants for this tier.
    pub fn profile(self) -> IntensityProfile {
        match self {
            Intensity::Low => IntensityProfile {
                glyph_size: 16.0,
                column_spacing: 20.0,
                fade_alpha: 0.10,
                char_density: 1.0,
                glow_radius: 4.0,
                flicker_chance: 0.01,
                glitch_chance: 0.0,
                spawn_chance: 0.01,
            },
            Intensity::Medium => IntensityProfile {
                glyph_size: 14.0,
                column_spacing: 14.0,
                fade_alpha: 0.05,
                char_density: 1.5,
                glow_radius: 10.0,
                flicker_chance: 0.02,
                glitch_chance: 0.001,
                spawn_chance: 0.02,
            },
            Intensity::High => IntensityProfile {
                glyph_size: 14.0,
                column_spacing: 12.0,
                fade_alpha: 0.04,
                char_density: 2.0,
                glow_radius: 12.0,
                flicker_chance: 0.04,
                glitch_chance: 0.003,
                spawn_chance: 0.04,
            },
            Intensity::Extreme => IntensityProfile {
                glyph_size: 12.0,
                column_spacing: 10.0,
                fade_alpha: 0.03,
                char_density: 3.0,
                glow_radius: 16.0,
                flicker_chance: 0.08,
                glitch_chance: 0.008,
                spawn_chance: 0.08,
            },
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Intensity::Low),
            "medium" => Ok(Intensity::Medium),
            "high" => Ok(Intensity::High),
            "extreme" => Ok(Intensity::Extreme),
            _ => Err(ConfigError::UnknownName {
                kind: "intensity",
                value: s.to_string(),
            }),
        }
    }
}

/// Per-tier tuning. All lengths are in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityProfile {
    /// Glyph height and vertical pitch of a trail.
    pub glyph_size: f32,
    /// Horizontal distance between columns. Always positive.
    pub column_spacing: f32,
    /// Alpha of the background wash painted every frame.
    pub fade_alpha: f32,
    /// Multiplier from column count to the maximum number of live drops.
    pub char_density: f32,
    /// Glow radius of the head glyph.
    pub glow_radius: f32,
    /// Per-drop, per-tick chance of swapping one trail glyph.
    pub flicker_chance: f64,
    /// Per-glyph, per-frame chance of painting in the glitch hue.
    pub glitch_chance: f64,
    /// Per-tick chance of spawning an extra drop.
    pub spawn_chance: f64,
}

/// Named bundles of density, speed and tier, for hosts that only offer
/// three effect levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Low,
    Medium,
    High,
}

impl Preset {
    pub fn density(self) -> f32 {
        match self {
            Preset::Low => 0.4,
            Preset::Medium => 0.8,
            Preset::High => 1.2,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            Preset::Low => 0.5,
            Preset::Medium => 1.0,
            Preset::High => 1.5,
        }
    }

    pub fn intensity(self) -> Intensity {
        match self {
            Preset::Low => Intensity::Low,
            Preset::Medium => Intensity::Medium,
            Preset::High => Intensity::High,
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Preset::Low),
            "medium" => Ok(Preset::Medium),
            "high" => Ok(Preset::High),
            _ => Err(ConfigError::UnknownName {
                kind: "preset",
                value: s.to_string(),
            }),
        }
    }
}

/// Everything the caller can tune.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    /// Drops per column, as a multiplier. Zero draws nothing.
    pub density: f32,
    /// Fall speed multiplier.
    pub speed: f32,
    pub intensity: Intensity,
    /// Only render on narrow viewports.
    pub mobile_only: bool,
    /// Drop to the lowest tier when the environment asks for reduced motion.
    pub respect_reduced_motion: bool,
    pub fps: u32,
    pub resize_debounce_ms: u64,
    /// Frames are simulated but not painted until this much time has passed.
    pub reveal_delay_ms: u64,
    /// Shortest trail, inclusive.
    pub trail_min: usize,
    /// Longest trail, exclusive.
    pub trail_max: usize,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            density: 0.8,
            speed: 1.0,
            intensity: Intensity::Medium,
            mobile_only: false,
            respect_reduced_motion: true,
            fps: 60,
            resize_debounce_ms: 100,
            reveal_delay_ms: 0,
            trail_min: 10,
            trail_max: 30,
        }
    }
}

impl RainConfig {
    /// Config with density, speed and tier taken from a preset.
    pub fn from_preset(preset: Preset) -> Self {
        Self::default().with_preset(preset)
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.density = preset.density();
        self.speed = preset.speed();
        self.intensity = preset.intensity();
        self
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RainConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges. Called by `load` and by the renderer before starting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=MAX_DENSITY).contains(&self.density) {
            return Err(ConfigError::Density {
                got: self.density,
                max: MAX_DENSITY,
            });
        }
        if !self.speed.is_finite() || self.speed < MIN_SPEED {
            return Err(ConfigError::Speed {
                got: self.speed,
                min: MIN_SPEED,
            });
        }
        if !(MIN_FPS..=MAX_FPS).contains(&self.fps) {
            return Err(ConfigError::Fps {
                got: self.fps,
                min: MIN_FPS,
                max: MAX_FPS,
            });
        }
        if self.trail_min == 0 || self.trail_min >= self.trail_max {
            return Err(ConfigError::TrailRange {
                min: self.trail_min,
                max: self.trail_max,
            });
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.clamp(MIN_FPS, MAX_FPS) as f64)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RainConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.intensity, Intensity::Medium);
        assert_eq!(config.speed, 1.0);
    }

    #[test]
    fn zero_density_is_allowed() {
        let config = RainConfig {
            density: 0.0,
            ..RainConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            RainConfig { density: -1.0, ..RainConfig::default() },
            RainConfig { density: f32::NAN, ..RainConfig::default() },
            RainConfig { density: 1e30, ..RainConfig::default() },
            RainConfig { density: f32::INFINITY, ..RainConfig::default() },
            RainConfig { speed: 0.0, ..RainConfig::default() },
            RainConfig { speed: 1e-6, ..RainConfig::default() },
            RainConfig { speed: f32::INFINITY, ..RainConfig::default() },
            RainConfig { fps: 0, ..RainConfig::default() },
            RainConfig { fps: 1000, ..RainConfig::default() },
            RainConfig { trail_min: 0, ..RainConfig::default() },
            RainConfig { trail_min: 30, trail_max: 30, ..RainConfig::default() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }

    #[test]
    fn range_limits_are_inclusive() {
        let edge = RainConfig {
            density: MAX_DENSITY,
            speed: MIN_SPEED,
            ..RainConfig::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn intensity_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Intensity>().unwrap(), Intensity::High);
        assert_eq!(" extreme ".parse::<Intensity>().unwrap(), Intensity::Extreme);
        assert!("turbo".parse::<Intensity>().is_err());
    }

    #[test]
    fn intensity_ordering() {
        assert!(Intensity::Low < Intensity::Medium);
        assert!(Intensity::High < Intensity::Extreme);
    }

    #[test]
    fn profiles_have_positive_spacing() {
        for tier in Intensity::ALL {
            let p = tier.profile();
            assert!(p.column_spacing > 0.0, "{tier}");
            assert!(p.glyph_size > 0.0, "{tier}");
            assert!(p.fade_alpha > 0.0 && p.fade_alpha < 1.0, "{tier}");
        }
    }

    #[test]
    fn presets_match_effects_layer() {
        let low = RainConfig::from_preset(Preset::Low);
        assert_eq!((low.density, low.speed, low.intensity), (0.4, 0.5, Intensity::Low));
        let high = RainConfig::from_preset(Preset::High);
        assert_eq!((high.density, high.speed, high.intensity), (1.2, 1.5, Intensity::High));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: RainConfig = serde_json::from_str(r#"{"intensity":"high","speed":2.0}"#).unwrap();
        assert_eq!(config.intensity, Intensity::High);
        assert_eq!(config.speed, 2.0);
        assert_eq!(config.density, RainConfig::default().density);
        assert_eq!(config.fps, 60);
    }

    #[test]
    fn frame_interval_from_fps() {
        let config = RainConfig { fps: 50, ..RainConfig::default() };
        assert_eq!(config.frame_interval().as_millis(), 20);
    }
}
