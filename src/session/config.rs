use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::color::hex::Rgb8;
use crate::foundation::error::{KitError, KitResult};

/// Options controlling preview scheduling, surface sizing and placeholder rendering.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Idle delay before a live-preview render fires.
    pub debounce_ms: u64,
    /// Device pixel cap per surface axis, regardless of device pixel ratio.
    pub max_surface_dim: u32,
    /// Logical edge length of the square 3D texture surface.
    pub texture_size: u32,
    /// Placeholder background.
    pub placeholder_fill: Rgb8,
    /// Placeholder label color.
    pub placeholder_text_color: Rgb8,
    /// Placeholder label.
    pub placeholder_label: String,
    /// Placeholder label size in logical px.
    pub placeholder_font_px: f64,
    /// Extra directories scanned for `.ttf`/`.otf`/`.ttc` files.
    pub font_dirs: Vec<PathBuf>,
    /// Whether installed system fonts are loaded.
    pub load_system_fonts: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            max_surface_dim: 1024,
            texture_size: 512,
            placeholder_fill: Rgb8::new(0xF3, 0xF4, 0xF6),
            placeholder_text_color: Rgb8::new(0x6B, 0x72, 0x80),
            placeholder_label: "Preview unavailable".to_owned(),
            placeholder_font_px: 16.0,
            font_dirs: Vec::new(),
            load_system_fonts: true,
        }
    }
}

impl PreviewConfig {
    /// Read a JSON config file, apply environment overrides and validate.
    pub fn from_path(path: &Path) -> KitResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read preview config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| KitError::validation(format!("invalid preview config: {e}")))?;
        let cfg = cfg.with_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `KITCANVAS_DEBOUNCE_MS` and `KITCANVAS_MAX_SURFACE_DIM`; unparsable or zero values
    /// are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(ms) = env_nonzero::<u64>("KITCANVAS_DEBOUNCE_MS") {
            self.debounce_ms = ms;
        }
        if let Some(dim) = env_nonzero::<u32>("KITCANVAS_MAX_SURFACE_DIM") {
            self.max_surface_dim = dim;
        }
        self
    }

    /// Check that sizes are usable.
    pub fn validate(&self) -> KitResult<()> {
        if self.max_surface_dim == 0 || self.max_surface_dim > u32::from(u16::MAX) {
            return Err(KitError::validation(
                "max_surface_dim must be in 1..=65535",
            ));
        }
        if self.texture_size == 0 {
            return Err(KitError::validation("texture_size must be > 0"));
        }
        if !self.placeholder_font_px.is_finite() || self.placeholder_font_px <= 0.0 {
            return Err(KitError::validation(
                "placeholder_font_px must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Debounce interval as a [`std::time::Duration`].
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

fn env_nonzero<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr + PartialEq + Default,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|n| *n != T::default())
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
