use crate::color::hex::Rgb8;
use crate::foundation::error::{KitError, KitResult};

/// Sleeve geometry of the garment; selects which silhouette mask is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SilhouetteMode {
    /// Full sleeves.
    #[default]
    Full,
    /// Half (short) sleeves; the tint must leave the sleeve regions alone.
    Half,
}

/// Collar style. Only affects mask asset selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollarMode {
    /// Round neck.
    #[default]
    Regular,
    /// Polo-style collar.
    Collared,
}

/// Resolved meaning of the `tint_color` parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tint {
    /// No tint pass (absent, empty, `none` or `transparent`).
    Off,
    /// Tint with this color.
    Color(Rgb8),
    /// Not a recognizable color; the tint pass is skipped.
    Malformed(String),
}

/// Everything a user can change about the customized garment.
///
/// Immutable per render call: the scheduler hands the compositor a snapshot.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignParameters {
    /// Reference to the base product photograph.
    pub base_image: String,
    /// Explicit silhouette mask reference; overrides the mask catalog when set.
    #[serde(default)]
    pub mask: Option<String>,
    /// Tint color (`#RRGGBB`), or `none`/`transparent`/absent for no tint.
    #[serde(default)]
    pub tint_color: Option<String>,
    /// Name printed on the back.
    #[serde(default)]
    pub name_text: String,
    /// Number printed on the back.
    #[serde(default)]
    pub number_text: String,
    /// Font family name.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Name size in px at the 400px reference width; the number is drawn 1.8x larger.
    #[serde(default = "default_font_size_base")]
    pub font_size_base: f64,
    /// Text fill color (`#RRGGBB`).
    #[serde(default = "default_text_color")]
    pub text_color: String,
    /// Sleeve geometry.
    #[serde(default)]
    pub silhouette: SilhouetteMode,
    /// Collar style.
    #[serde(default)]
    pub collar: CollarMode,
}

fn default_font_family() -> String {
    "Arial".to_owned()
}

fn default_font_size_base() -> f64 {
    24.0
}

fn default_text_color() -> String {
    "#FFFFFF".to_owned()
}

impl DesignParameters {
    /// Parameters for `base_image` with every other field at its default.
    pub fn new(base_image: impl Into<String>) -> Self {
        Self {
            base_image: base_image.into(),
            mask: None,
            tint_color: None,
            name_text: String::new(),
            number_text: String::new(),
            font_family: default_font_family(),
            font_size_base: default_font_size_base(),
            text_color: default_text_color(),
            silhouette: SilhouetteMode::default(),
            collar: CollarMode::default(),
        }
    }

    /// Parse parameters from JSON.
    pub fn from_json(s: &str) -> KitResult<Self> {
        let p: Self = serde_json::from_str(s)
            .map_err(|e| KitError::validation(format!("invalid design parameters: {e}")))?;
        p.validate()?;
        Ok(p)
    }

    /// Check invariants that cannot be degraded around.
    pub fn validate(&self) -> KitResult<()> {
        if !self.font_size_base.is_finite() || self.font_size_base <= 0.0 {
            return Err(KitError::validation(
                "font_size_base must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Set the tint color.
    pub fn with_tint(mut self, tint: impl Into<String>) -> Self {
        self.tint_color = Some(tint.into());
        self
    }

    /// Set name and number text.
    pub fn with_text(mut self, name: impl Into<String>, number: impl Into<String>) -> Self {
        self.name_text = name.into();
        self.number_text = number.into();
        self
    }

    /// Set the text fill color.
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = color.into();
        self
    }

    /// Set the font family and base size.
    pub fn with_font(mut self, family: impl Into<String>, size_base: f64) -> Self {
        self.font_family = family.into();
        self.font_size_base = size_base;
        self
    }

    /// Set silhouette and collar modes.
    pub fn with_modes(mut self, silhouette: SilhouetteMode, collar: CollarMode) -> Self {
        self.silhouette = silhouette;
        self.collar = collar;
        self
    }

    /// Set an explicit mask reference.
    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    /// Interpret `tint_color`.
    pub fn tint(&self) -> Tint {
        let Some(raw) = self.tint_color.as_deref() else {
            return Tint::Off;
        };
        let s = raw.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("transparent")
        {
            return Tint::Off;
        }
        match Rgb8::parse_hex(s) {
            Some(c) => Tint::Color(c),
            None => Tint::Malformed(raw.to_owned()),
        }
    }

    /// Text fill color; malformed values fall back to white.
    pub fn text_fill(&self) -> Rgb8 {
        Rgb8::parse_hex(&self.text_color).unwrap_or(Rgb8::WHITE)
    }

    /// `true` when either name or number is non-empty.
    pub fn has_text(&self) -> bool {
        !self.name_text.is_empty() || !self.number_text.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/design/params.rs"]
mod tests;
