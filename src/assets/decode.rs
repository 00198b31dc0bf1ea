use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{KitError, KitResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Intrinsic width in pixels.
    pub width: u32,
    /// Intrinsic height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Whether the encoded source carried an alpha channel.
    pub has_alpha: bool,
}

/// Parsed SVG document.
#[derive(Clone, Debug)]
pub struct PreparedSvg {
    /// Parsed tree.
    pub tree: Arc<usvg::Tree>,
}

impl PreparedSvg {
    /// Intrinsic size rounded up to whole pixels.
    pub fn intrinsic_size(&self) -> (u32, u32) {
        let size = self.tree.size();
        (
            size.width().ceil().max(0.0) as u32,
            size.height().ceil().max(0.0) as u32,
        )
    }
}

/// Decode any raster format the `image` crate understands.
#[tracing::instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8]) -> KitResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let has_alpha = dyn_img.color().has_alpha();
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
        has_alpha,
    })
}

/// Parse an SVG document, resolving `<text>` against `fontdb`.
#[tracing::instrument(level = "debug", skip(bytes, fontdb), fields(len = bytes.len()))]
pub fn parse_svg(bytes: &[u8], fontdb: Arc<usvg::fontdb::Database>) -> KitResult<PreparedSvg> {
    let opts = usvg::Options {
        fontdb,
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(PreparedSvg {
        tree: Arc::new(tree),
    })
}

/// Heuristic format sniff: `.svg` references or XML/SVG leading bytes.
pub fn looks_like_svg(reference: &str, bytes: &[u8]) -> bool {
    if reference
        .rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    {
        return true;
    }
    let head = &bytes[..bytes.len().min(256)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || text.starts_with("<?xml")
}

/// Rasterize `tree` stretched to exactly `width`x`height` premultiplied RGBA8.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> KitResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        KitError::invalid_dimensions(format!("cannot allocate {width}x{height} svg pixmap"))
    })?;

    let size = tree.size();
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    if !sx.is_finite() || !sy.is_finite() {
        return Err(KitError::invalid_dimensions("svg has invalid width/height"));
    }
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
