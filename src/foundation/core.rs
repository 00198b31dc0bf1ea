use crate::foundation::error::{KitError, KitResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Byte order used by surfaces and pixmaps.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Logical (CSS pixel) size of the surface a preview is drawn onto, plus its device pixel ratio.
///
/// Layout is always computed in logical pixels; surfaces are allocated in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Logical width.
    pub width: f64,
    /// Logical height.
    pub height: f64,
    /// Device pixels per logical pixel.
    #[serde(default = "default_dpr")]
    pub device_pixel_ratio: f64,
}

fn default_dpr() -> f64 {
    1.0
}

impl Viewport {
    /// Create a validated viewport. Zero sizes are allowed here and rejected at render time.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> KitResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(KitError::validation(
                "viewport width/height must be finite and >= 0",
            ));
        }
        if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
            return Err(KitError::validation(
                "device_pixel_ratio must be finite and > 0",
            ));
        }
        Ok(Self {
            width,
            height,
            device_pixel_ratio,
        })
    }

    /// Square viewport used for the 3D texture surface.
    pub fn square(size: f64, device_pixel_ratio: f64) -> KitResult<Self> {
        Self::new(size, size, device_pixel_ratio)
    }

    /// Resolve the device-pixel surface size, capping each axis at `max_dim`.
    ///
    /// The cap lowers the effective scale uniformly so layout stays aspect-correct.
    pub fn device_size(self, max_dim: u32) -> KitResult<DeviceSize> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(KitError::invalid_dimensions(format!(
                "surface is {}x{} logical px",
                self.width, self.height
            )));
        }
        let max_dim = f64::from(max_dim.max(1));
        let mut scale = self.device_pixel_ratio;
        if self.width * scale > max_dim {
            scale = max_dim / self.width;
        }
        if self.height * scale > max_dim {
            scale = max_dim / self.height;
        }

        let width = (self.width * scale).round();
        let height = (self.height * scale).round();
        if width < 1.0 || height < 1.0 {
            return Err(KitError::invalid_dimensions(format!(
                "surface rounds to {width}x{height} device px"
            )));
        }
        Ok(DeviceSize {
            width: width as u32,
            height: height as u32,
            scale,
        })
    }
}

/// Device-pixel surface dimensions and the logical-to-device scale used to reach them.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct DeviceSize {
    /// Width in device pixels.
    pub width: u32,
    /// Height in device pixels.
    pub height: u32,
    /// Logical-to-device scale (the device pixel ratio after capping).
    pub scale: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
