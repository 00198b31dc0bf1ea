use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{KitError, KitResult};

/// Placement of a source image on a surface, in surface-local logical coordinates.
///
/// Derived per render pass and never cached: the surface may have been resized since the last
/// pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawRect {
    /// Left edge (negative when the image overflows horizontally).
    pub x: f64,
    /// Top edge (negative when the image overflows vertically).
    pub y: f64,
    /// Drawn width.
    pub width: f64,
    /// Drawn height.
    pub height: f64,
}

impl DrawRect {
    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Point at fractional offsets `(fx, fy)` of the rectangle, measured from its top-left.
    pub fn at_fraction(&self, fx: f64, fy: f64) -> Point {
        Point::new(self.x + self.width * fx, self.y + self.height * fy)
    }

    /// Same rectangle in a coordinate space scaled by `s` (logical to device pixels).
    pub fn scaled(&self, s: f64) -> Self {
        Self {
            x: self.x * s,
            y: self.y * s,
            width: self.width * s,
            height: self.height * s,
        }
    }

    /// As a `kurbo` rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Aspect-preserving "cover" fit of an `image` size onto a `surface` size.
///
/// The result always covers the surface: a relatively wider image is fit to the surface height
/// and centered horizontally, anything else is fit to the width and centered vertically.
pub fn cover_fit(image: (f64, f64), surface: (f64, f64)) -> KitResult<DrawRect> {
    let (iw, ih) = image;
    let (sw, sh) = surface;
    for (label, v) in [
        ("image width", iw),
        ("image height", ih),
        ("surface width", sw),
        ("surface height", sh),
    ] {
        if !v.is_finite() || v <= 0.0 {
            return Err(KitError::invalid_dimensions(format!(
                "{label} must be finite and > 0 (got {v})"
            )));
        }
    }

    let image_aspect = iw / ih;
    let surface_aspect = sw / sh;

    let rect = if image_aspect > surface_aspect {
        let width = sh * image_aspect;
        DrawRect {
            x: (sw - width) / 2.0,
            y: 0.0,
            width,
            height: sh,
        }
    } else {
        let height = sw / image_aspect;
        DrawRect {
            x: 0.0,
            y: (sh - height) / 2.0,
            width: sw,
            height,
        }
    };
    Ok(rect)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
