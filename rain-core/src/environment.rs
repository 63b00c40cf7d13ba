//! Visibility predicate.
//!
//! Decides from host signals whether the rain runs at all, and at which tier.

use serde::Serialize;

use crate::config::{Intensity, RainConfig};
use crate::primitives::Size;

/// Viewports narrower than this count as mobile.
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Hosts with fewer logical cores than this are capped at `Intensity::Medium`.
pub const LOW_CORE_THRESHOLD: usize = 4;

/// Signals read from the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Environment {
    pub viewport: Size,
    pub prefers_reduced_motion: bool,
    /// Logical core count, when the host reports one.
    pub hardware_concurrency: Option<usize>,
}

impl Environment {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport.width < MOBILE_BREAKPOINT
    }
}

/// Why the renderer declined to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    /// `mobile_only` is set and the viewport is desktop-sized.
    NotMobile,
}

/// Outcome of the visibility predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Run(Intensity),
    Suppressed(SuppressReason),
}

/// Evaluate the visibility predicate for a config in an environment.
pub fn visibility(config: &RainConfig, env: &Environment) -> Visibility {
    if config.mobile_only && !env.is_mobile() {
        return Visibility::Suppressed(SuppressReason::NotMobile);
    }

    if config.respect_reduced_motion && env.prefers_reduced_motion {
        return Visibility::Run(Intensity::Low);
    }

    let mut tier = config.intensity;
    if let Some(cores) = env.hardware_concurrency {
        if cores < LOW_CORE_THRESHOLD {
            tier = tier.min(Intensity::Medium);
        }
    }
    Visibility::Run(tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop() -> Environment {
        Environment::new(Size::new(1920.0, 1080.0))
    }

    #[test]
    fn runs_configured_tier_by_default() {
        let config = RainConfig {
            intensity: Intensity::Extreme,
            ..RainConfig::default()
        };
        assert_eq!(visibility(&config, &desktop()), Visibility::Run(Intensity::Extreme));
    }

    #[test]
    fn mobile_only_suppresses_on_desktop() {
        let config = RainConfig {
            mobile_only: true,
            ..RainConfig::default()
        };
        assert_eq!(
            visibility(&config, &desktop()),
            Visibility::Suppressed(SuppressReason::NotMobile)
        );

        let phone = Environment::new(Size::new(390.0, 844.0));
        assert_eq!(visibility(&config, &phone), Visibility::Run(Intensity::Medium));
    }

    #[test]
    fn reduced_motion_never_runs_extreme() {
        let env = Environment {
            prefers_reduced_motion: true,
            ..desktop()
        };
        for tier in Intensity::ALL {
            let config = RainConfig {
                intensity: tier,
                ..RainConfig::default()
            };
            assert_eq!(visibility(&config, &env), Visibility::Run(Intensity::Low));
        }
    }

    #[test]
    fn reduced_motion_can_be_ignored() {
        let env = Environment {
            prefers_reduced_motion: true,
            ..desktop()
        };
        let config = RainConfig {
            intensity: Intensity::High,
            respect_reduced_motion: false,
            ..RainConfig::default()
        };
        assert_eq!(visibility(&config, &env), Visibility::Run(Intensity::High));
    }

    #[test]
    fn few_cores_cap_at_medium() {
        let env = Environment {
            hardware_concurrency: Some(2),
            ..desktop()
        };
        let extreme = RainConfig {
            intensity: Intensity::Extreme,
            ..RainConfig::default()
        };
        assert_eq!(visibility(&extreme, &env), Visibility::Run(Intensity::Medium));

        let low = RainConfig {
            intensity: Intensity::Low,
            ..RainConfig::default()
        };
        assert_eq!(visibility(&low, &env), Visibility::Run(Intensity::Low));
    }

    #[test]
    fn many_cores_keep_tier() {
        let env = Environment {
            hardware_concurrency: Some(16),
            ..desktop()
        };
        let config = RainConfig {
            intensity: Intensity::High,
            ..RainConfig::default()
        };
        assert_eq!(visibility(&config, &env), Visibility::Run(Intensity::High));
    }
}
