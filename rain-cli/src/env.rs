//! Host signal detection.

use std::thread;

use rain_core::{Environment, Size};

/// Environment variables that request reduced motion when truthy.
pub const REDUCED_MOTION_VARS: [&str; 2] = ["RAIN_REDUCED_MOTION", "REDUCE_MOTION"];

/// `1`, `true`, `yes` or `on`, in any case.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Reduced-motion preference from a variable lookup.
pub fn reduced_motion_from(lookup: impl Fn(&str) -> Option<String>) -> bool {
    REDUCED_MOTION_VARS
        .iter()
        .any(|name| lookup(name).is_some_and(|value| is_truthy(&value)))
}

/// Read host signals for a viewport. `force_reduced_motion` comes from the
/// command line and wins over the environment.
pub fn detect(viewport: Size, force_reduced_motion: bool) -> Environment {
    let prefers_reduced_motion =
        force_reduced_motion || reduced_motion_from(|name| std::env::var(name).ok());
    let hardware_concurrency = thread::available_parallelism().ok().map(|n| n.get());

    tracing::debug!(
        width = viewport.width,
        height = viewport.height,
        prefers_reduced_motion,
        ?hardware_concurrency,
        "detected environment"
    );

    Environment {
        viewport,
        prefers_reduced_motion,
        hardware_concurrency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        for v in ["1", "true", "TRUE", " yes ", "On"] {
            assert!(is_truthy(v), "{v}");
        }
        for v in ["", "0", "false", "no", "off", "maybe"] {
            assert!(!is_truthy(v), "{v}");
        }
    }

    #[test]
    fn either_variable_enables_reduced_motion() {
        assert!(reduced_motion_from(|name| (name == "REDUCE_MOTION").then(|| "1".into())));
        assert!(reduced_motion_from(|name| {
            (name == "RAIN_REDUCED_MOTION").then(|| "true".into())
        }));
        assert!(!reduced_motion_from(|_| Some("0".into())));
        assert!(!reduced_motion_from(|_| None));
    }

    #[test]
    fn forced_reduced_motion_wins() {
        let env = detect(Size::new(640.0, 384.0), true);
        assert!(env.prefers_reduced_motion);
        assert_eq!(env.viewport, Size::new(640.0, 384.0));
        assert!(env.hardware_concurrency.is_some_and(|n| n >= 1));
    }
}
