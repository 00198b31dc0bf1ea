use std::collections::HashMap;

use crate::design::params::{CollarMode, DesignParameters, SilhouetteMode};

/// Reference prefix resolved from masks compiled into the crate.
pub const BUILTIN_PREFIX: &str = "builtin:";

/// Full-sleeve garment silhouette.
pub const BUILTIN_MASK_FULL: &str = "builtin:mask_full";
/// Half-sleeve garment silhouette (sleeve regions excluded).
pub const BUILTIN_MASK_HALF: &str = "builtin:mask_half";

const MASK_FULL_SVG: &[u8] = include_bytes!("../../assets/masks/mask_full.svg");
const MASK_HALF_SVG: &[u8] = include_bytes!("../../assets/masks/mask_half.svg");

/// Bytes of a bundled mask, if `reference` names one.
pub fn builtin_mask_bytes(reference: &str) -> Option<&'static [u8]> {
    match reference.strip_prefix(BUILTIN_PREFIX)? {
        "mask_full" => Some(MASK_FULL_SVG),
        "mask_half" => Some(MASK_HALF_SVG),
        _ => None,
    }
}

/// Maps `(silhouette, collar)` to a mask reference.
///
/// Owned by whoever creates the session; there is no process-wide catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskCatalog {
    entries: HashMap<(SilhouetteMode, CollarMode), String>,
}

impl Default for MaskCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MaskCatalog {
    /// Catalog with no entries: every garment uses the unmasked tint.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Bundled masks. Collar style does not change the silhouette.
    pub fn builtin() -> Self {
        let mut c = Self::empty();
        for collar in [CollarMode::Regular, CollarMode::Collared] {
            c.set(SilhouetteMode::Full, collar, BUILTIN_MASK_FULL);
            c.set(SilhouetteMode::Half, collar, BUILTIN_MASK_HALF);
        }
        c
    }

    /// Register or replace the mask for a garment variant.
    pub fn set(
        &mut self,
        silhouette: SilhouetteMode,
        collar: CollarMode,
        reference: impl Into<String>,
    ) {
        self.entries.insert((silhouette, collar), reference.into());
    }

    /// Catalog lookup for a garment variant.
    pub fn lookup(&self, silhouette: SilhouetteMode, collar: CollarMode) -> Option<&str> {
        self.entries.get(&(silhouette, collar)).map(String::as_str)
    }

    /// Mask reference for `params`: an explicit `mask` wins, then the catalog.
    ///
    /// An explicit empty string disables masking.
    pub fn select<'a>(&'a self, params: &'a DesignParameters) -> Option<&'a str> {
        match params.mask.as_deref() {
            Some(m) if m.trim().is_empty() => None,
            Some(m) => Some(m),
            None => self.lookup(params.silhouette, params.collar),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/masks.rs"]
mod tests;
