use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{KitError, KitResult};

/// Family tried after the requested one, before the generic sans-serif family.
pub const FALLBACK_FAMILY: &str = "Arial";

/// A concrete font face chosen for a family request.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    /// Face identity inside the owning [`FontBook`].
    pub id: usvg::fontdb::ID,
    /// Family name as reported by the face.
    pub family: String,
    /// Raw font file bytes (shared across faces of the same file).
    pub bytes: Arc<Vec<u8>>,
    /// Face index within a collection file.
    pub index: u32,
    /// Draw-time handle over `bytes`, built once per resolution.
    pub font_data: vello_cpu::peniko::FontData,
}

/// Explicitly owned font database backed by `usvg::fontdb`.
///
/// The same database is handed to SVG parsing so mask documents with `<text>` resolve against the
/// configured fonts.
pub struct FontBook {
    db: Arc<usvg::fontdb::Database>,
    resolved: HashMap<(String, bool), Option<ResolvedFont>>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .finish_non_exhaustive()
    }
}

impl FontBook {
    /// Build from system fonts (optional) plus every font file in `dirs`.
    pub fn load(load_system_fonts: bool, dirs: &[impl AsRef<Path>]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        if load_system_fonts {
            db.load_system_fonts();
        }
        for dir in dirs {
            load_fonts_from_dir(&mut db, dir.as_ref());
        }
        tracing::debug!(faces = db.len(), "font book loaded");
        Self::from_database(db)
    }

    /// Book with no faces; every text pass is skipped.
    pub fn empty() -> Self {
        Self::from_database(usvg::fontdb::Database::new())
    }

    /// Book over in-memory font files.
    pub fn from_font_data(fonts: impl IntoIterator<Item = Vec<u8>>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        for data in fonts {
            db.load_font_data(data);
        }
        Self::from_database(db)
    }

    fn from_database(mut db: usvg::fontdb::Database) -> Self {
        // fontdb maps the generic sans-serif family to "Arial" whether or not it is installed.
        if let Some(family) = installed_sans_family(&db) {
            tracing::debug!(%family, "sans-serif fallback remapped");
            db.set_sans_serif_family(family);
        }
        Self {
            db: Arc::new(db),
            resolved: HashMap::new(),
        }
    }

    /// Shared database, for SVG parsing.
    pub fn database(&self) -> Arc<usvg::fontdb::Database> {
        self.db.clone()
    }

    /// Number of loaded faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Resolve a bold face for `family`, falling back to Arial and then sans-serif.
    pub fn resolve_bold(&mut self, family: &str) -> Option<ResolvedFont> {
        self.resolve(family, true)
    }

    /// Resolve a face for `family` (bold or regular weight) through the fallback chain.
    ///
    /// Results (including misses) are memoized per request.
    pub fn resolve(&mut self, family: &str, bold: bool) -> Option<ResolvedFont> {
        let key = (family.to_owned(), bold);
        if let Some(hit) = self.resolved.get(&key) {
            return hit.clone();
        }
        let found = self.query(family, bold);
        if found.is_none() {
            tracing::warn!(family, bold, "no font face resolves; text will be skipped");
        }
        self.resolved.insert(key, found.clone());
        found
    }

    fn query(&self, family: &str, bold: bool) -> Option<ResolvedFont> {
        use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

        let mut families = Vec::<Family<'_>>::new();
        let family = family.trim();
        if !family.is_empty() {
            families.push(Family::Name(family));
        }
        families.push(Family::Name(FALLBACK_FAMILY));
        families.push(Family::SansSerif);

        let id = self.db.query(&Query {
            families: &families,
            weight: if bold { Weight::BOLD } else { Weight::NORMAL },
            stretch: Stretch::Normal,
            style: Style::Normal,
        })?;
        let face = self.db.face(id)?;
        let family_name = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_default();
        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;
        let bytes = Arc::new(bytes);
        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::new(bytes.clone()),
            index,
        );
        Some(ResolvedFont {
            id,
            family: family_name,
            bytes,
            index,
            font_data,
        })
    }
}

/// Installed family to stand in for sans-serif when Arial is absent.
///
/// Prefers a non-monospace family with "Sans" in its name, then any family.
fn installed_sans_family(db: &usvg::fontdb::Database) -> Option<String> {
    let families: Vec<&str> = db
        .faces()
        .filter_map(|face| face.families.first().map(|(name, _)| name.as_str()))
        .collect();
    if families
        .iter()
        .any(|f| f.eq_ignore_ascii_case(FALLBACK_FAMILY))
    {
        return None;
    }
    families
        .iter()
        .copied()
        .find(|f| {
            let lower = f.to_ascii_lowercase();
            lower.contains("sans") && !lower.contains("mono")
        })
        .or_else(|| families.first().copied())
        .map(str::to_owned)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

/// Brush carried through Parley layouts. Colors are applied at draw time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrush;

/// Stateful helper for building Parley layouts from resolved faces.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    registered: HashMap<usvg::fontdb::ID, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &ResolvedFont) -> KitResult<String> {
        if let Some(name) = self.registered.get(&font.id) {
            return Ok(name.clone());
        }
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::new(font.bytes.clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| KitError::validation("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| KitError::validation("registered font family has no name"))?
            .to_string();
        self.registered.insert(font.id, name.clone());
        Ok(name)
    }

    /// Shape a single unwrapped line of text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
    ) -> KitResult<parley::Layout<TextBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(KitError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
