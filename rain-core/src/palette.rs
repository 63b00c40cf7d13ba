//! Glyph colors by trail position.

use crate::config::IntensityProfile;
use crate::primitives::Color;

/// Head glyph fill.
pub const HEAD_COLOR: Color = Color::WHITE;
/// Trail fill before brightness is applied.
pub const TRAIL_COLOR: Color = Color::RAIN_GREEN;
/// Shadow color for every glow.
pub const GLOW_COLOR: Color = Color::RAIN_GREEN;
/// Trail alpha is `brightness * TRAIL_ALPHA_SCALE`.
pub const TRAIL_ALPHA_SCALE: f32 = 0.8;
/// Background wash painted every frame.
pub const BACKGROUND: Color = Color::BLACK;

/// Soft halo around a glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Color,
    pub radius: f32,
}

/// How a single glyph is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    pub color: Color,
    pub glow: Option<Glow>,
    /// Font size in pixels.
    pub size: f32,
}

/// Style for trail glyph `index` with the given brightness.
///
/// The head gets the highlight color and the full glow radius; the rest fade
/// in alpha and glow with their brightness. `glitch` swaps the fill for the
/// glitch hue at the same alpha.
pub fn glyph_style(index: usize, brightness: f32, profile: &IntensityProfile, glitch: bool) -> GlyphStyle {
    let brightness = brightness.clamp(0.0, 1.0);
    let (mut color, glow_radius) = if index == 0 {
        (HEAD_COLOR, profile.glow_radius)
    } else {
        (
            TRAIL_COLOR.with_alpha(brightness * TRAIL_ALPHA_SCALE),
            profile.glow_radius * 0.5 * brightness,
        )
    };
    if glitch {
        color = Color::GLITCH.with_alpha(color.a);
    }
    let glow = (glow_radius > 0.0).then_some(Glow {
        color: GLOW_COLOR,
        radius: glow_radius,
    });
    GlyphStyle {
        color,
        glow,
        size: profile.glyph_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Intensity;

    #[test]
    fn head_is_white_with_full_glow() {
        let profile = Intensity::Medium.profile();
        let style = glyph_style(0, 1.0, &profile, false);
        assert_eq!(style.color, HEAD_COLOR);
        assert_eq!(style.glow.unwrap().radius, profile.glow_radius);
        assert_eq!(style.size, profile.glyph_size);
    }

    #[test]
    fn trail_fades_with_brightness() {
        let profile = Intensity::Medium.profile();
        let bright = glyph_style(1, 0.9, &profile, false);
        let dim = glyph_style(5, 0.3, &profile, false);
        assert!(dim.color.a < bright.color.a);
        assert!(dim.glow.unwrap().radius < bright.glow.unwrap().radius);
        assert!((bright.color.a - 0.72).abs() < 1e-6);
    }

    #[test]
    fn zero_brightness_has_no_glow() {
        let profile = Intensity::High.profile();
        let style = glyph_style(3, 0.0, &profile, false);
        assert!(style.glow.is_none());
        assert_eq!(style.color.a, 0.0);
    }

    #[test]
    fn glitch_keeps_alpha() {
        let profile = Intensity::Medium.profile();
        let style = glyph_style(2, 0.5, &profile, true);
        assert_eq!(style.color.to_rgb8(), Color::GLITCH.to_rgb8());
        assert!((style.color.a - 0.4).abs() < 1e-6);
    }
}
