//! Luminance, contrast and text-scale helpers.
//!
//! These never fail: malformed colors degrade to [`NEUTRAL_LUMINANCE`] so a bad text color can
//! only make the outline choice less ideal, never abort a render.

use crate::color::hex::Rgb8;

/// Luminance reported for input that is not a 6-digit hex color.
pub const NEUTRAL_LUMINANCE: f64 = 0.5;

/// Surface width at which `font_size_base` is drawn unscaled.
pub const REFERENCE_WIDTH: f64 = 400.0;

/// Lower clamp of [`font_scale`].
pub const MIN_FONT_SCALE: f64 = 0.5;

/// Upper clamp of [`font_scale`].
pub const MAX_FONT_SCALE: f64 = 2.0;

/// Relative luminance of a `#RRGGBB`/`RRGGBB` color in `[0, 1]`.
pub fn luminance(hex: &str) -> f64 {
    match Rgb8::parse_hex(hex) {
        Some(c) => relative_luminance(c),
        None => NEUTRAL_LUMINANCE,
    }
}

/// Relative luminance of an already-parsed color (sRGB to linear, Rec. 709 weights).
pub fn relative_luminance(c: Rgb8) -> f64 {
    fn linear(v: u8) -> f64 {
        let v = f64::from(v) / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * linear(c.r) + 0.7152 * linear(c.g) + 0.0722 * linear(c.b)
}

/// Outline color that stays legible against `hex`: black for light colors, white otherwise.
pub fn contrast_color(hex: &str) -> Rgb8 {
    if luminance(hex) > 0.5 {
        Rgb8::BLACK
    } else {
        Rgb8::WHITE
    }
}

/// [`contrast_color`] rendered as `#000000` / `#FFFFFF`.
pub fn contrast_color_hex(hex: &str) -> &'static str {
    if contrast_color(hex) == Rgb8::BLACK {
        "#000000"
    } else {
        "#FFFFFF"
    }
}

/// Text scale factor for a logical surface width, relative to [`REFERENCE_WIDTH`].
pub fn font_scale(surface_width: f64) -> f64 {
    font_scale_with_base(surface_width, REFERENCE_WIDTH)
}

/// `clamp(surface_width / base_width, 0.5, 2.0)`.
///
/// Total over all inputs: NaN and negative widths map to the lower bound, an invalid base
/// falls back to [`REFERENCE_WIDTH`].
pub fn font_scale_with_base(surface_width: f64, base_width: f64) -> f64 {
    let base = if base_width.is_finite() && base_width > 0.0 {
        base_width
    } else {
        REFERENCE_WIDTH
    };
    let ratio = surface_width / base;
    if ratio.is_nan() {
        return MIN_FONT_SCALE;
    }
    ratio.clamp(MIN_FONT_SCALE, MAX_FONT_SCALE)
}

#[cfg(test)]
#[path = "../../tests/unit/color/contrast.rs"]
mod tests;
