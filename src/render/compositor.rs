use crate::assets::decode::{PreparedImage, rasterize_svg_to_premul_rgba8};
use crate::assets::fonts::{FontBook, TextLayoutEngine};
use crate::assets::loader::{LoadStatus, LoadedAssets, PreparedMask};
use crate::color::hex::Rgb8;
use crate::design::params::{DesignParameters, SilhouetteMode, Tint};
use crate::foundation::core::{Affine, DeviceSize, Point, Rect, Viewport};
use crate::foundation::error::{KitError, KitResult};
use crate::layout::fit::{DrawRect, cover_fit};
use crate::render::kernels::{MaskMode, mask_in_place, multiply_over_in_place, premul_over_in_place};
use crate::render::surface::{
    FrameRGBA, affine_to_cpu, bezpath_to_cpu, image_paint, new_pixmap,
};
use crate::render::text::{TextPlan, draw_centered_line, draw_text_plan};
use crate::session::config::PreviewConfig;

/// Multiply opacity of the tint when it is not clipped by a mask image.
pub const UNMASKED_TINT_OPACITY: f32 = 0.6;
/// Multiply opacity of the mask-clipped tint.
pub const MASKED_TINT_OPACITY: f32 = 0.5;

const MAX_MASK_RASTER_DIM: f64 = 8192.0;

/// How the tint layer is produced for one render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "mode", content = "color", rename_all = "snake_case")]
pub enum TintMode {
    /// No tint layer.
    Off,
    /// Fill the whole draw rect.
    Unmasked(Rgb8),
    /// Fill the draw rect, keep only the mask's opaque footprint.
    Masked(Rgb8),
    /// Half-sleeve mask failed: body rectangle minus the two sleeve ellipses.
    SleeveFallback(Rgb8),
}

impl TintMode {
    /// Multiply opacity used for this mode.
    pub fn opacity(self) -> f32 {
        match self {
            Self::Masked(_) => MASKED_TINT_OPACITY,
            Self::Off | Self::Unmasked(_) | Self::SleeveFallback(_) => UNMASKED_TINT_OPACITY,
        }
    }
}

/// Pick the tint path from the parameters and the mask slot.
///
/// A ready mask always wins. The analytic sleeve exclusion only replaces a half-sleeve mask that
/// failed to load; every other case tints the full draw rect.
pub fn select_tint_mode(assets: &LoadedAssets, params: &DesignParameters) -> TintMode {
    let color = match params.tint() {
        Tint::Off => return TintMode::Off,
        Tint::Malformed(raw) => {
            tracing::warn!(tint_color = %raw, "malformed tint color; skipping tint");
            return TintMode::Off;
        }
        Tint::Color(c) => c,
    };
    if assets.mask.ready_asset().is_some() {
        return TintMode::Masked(color);
    }
    match (assets.mask.status(), params.silhouette) {
        (LoadStatus::Failed, SilhouetteMode::Half) => {
            tracing::warn!("half-sleeve mask unavailable; using analytic sleeve exclusion");
            TintMode::SleeveFallback(color)
        }
        _ => TintMode::Unmasked(color),
    }
}

/// Analytic half-sleeve geometry in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SleeveGeometry {
    /// Central body band, x in [20%, 80%] of the draw width.
    pub body: Rect,
    /// Sleeve ellipses centered at 15% and 85% of the draw width, 25% of the draw height.
    pub sleeves: [kurbo::Ellipse; 2],
}

impl SleeveGeometry {
    /// Geometry for `rect`.
    pub fn for_rect(rect: &DrawRect) -> Self {
        let radii = (0.08 * rect.width, 0.15 * rect.height);
        let sleeve = |fx: f64| kurbo::Ellipse::new(rect.at_fraction(fx, 0.25), radii, 0.0);
        Self {
            body: Rect::new(
                rect.x + 0.2 * rect.width,
                rect.y,
                rect.x + 0.8 * rect.width,
                rect.y + rect.height,
            ),
            sleeves: [sleeve(0.15), sleeve(0.85)],
        }
    }

    /// `true` when `p` receives tint.
    pub fn tints(&self, p: Point) -> bool {
        use kurbo::Shape;
        self.body.contains(p) && !self.sleeves.iter().any(|e| e.contains(p))
    }
}

/// What ended up on the export surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameContent {
    /// Base, tint and text layers.
    Composed,
    /// Neutral placeholder (base image pending, failed or zero-sized).
    Placeholder,
}

/// Result of one render pass.
#[derive(Clone, Debug)]
pub struct ComposedFrame {
    /// Export surface pixels (premultiplied).
    pub frame: FrameRGBA,
    /// Composed or placeholder.
    pub content: FrameContent,
    /// Draw rect in logical pixels, when a base image was drawn.
    pub draw_rect: Option<DrawRect>,
    /// Device surface size and scale.
    pub device: DeviceSize,
    /// Tint path taken.
    pub tint: TintMode,
    /// Whether any text was drawn.
    pub text_drawn: bool,
}

#[derive(Clone, Debug)]
struct PlaceholderStyle {
    fill: Rgb8,
    text_color: Rgb8,
    label: String,
    font_px: f64,
}

/// Turns `(assets, params, surface)` into export-surface pixels.
///
/// Holds only reusable drawing state (render context, shaped-font registry, font book), so the
/// output is a function of the inputs alone. Both the flat preview and the 3D texture path render
/// through the same `Compositor`.
pub struct Compositor {
    ctx: Option<vello_cpu::RenderContext>,
    text_engine: TextLayoutEngine,
    fonts: FontBook,
    placeholder: PlaceholderStyle,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("fonts", &self.fonts)
            .field("placeholder", &self.placeholder)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Compositor drawing text from `fonts`, with placeholder styling from `config`.
    pub fn new(fonts: FontBook, config: &PreviewConfig) -> Self {
        Self {
            ctx: None,
            text_engine: TextLayoutEngine::new(),
            fonts,
            placeholder: PlaceholderStyle {
                fill: config.placeholder_fill,
                text_color: config.placeholder_text_color,
                label: config.placeholder_label.clone(),
                font_px: config.placeholder_font_px,
            },
        }
    }

    /// Font book used for text.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Render one frame.
    ///
    /// Fails with `InvalidDimensions` for a zero-sized surface and `SurfaceUnavailable` when the
    /// surface cannot be allocated; a missing or zero-sized base image yields the placeholder.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(w = viewport.width, h = viewport.height, dpr = viewport.device_pixel_ratio)
    )]
    pub fn compose(
        &mut self,
        assets: &LoadedAssets,
        params: &DesignParameters,
        viewport: Viewport,
        max_surface_dim: u32,
    ) -> KitResult<ComposedFrame> {
        let device = viewport.device_size(max_surface_dim)?;
        let Some(base) = assets.base.ready_asset() else {
            return self.placeholder(viewport, device);
        };
        let rect = match cover_fit(
            (f64::from(base.width), f64::from(base.height)),
            (viewport.width, viewport.height),
        ) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "base image is unusable; drawing placeholder");
                return self.placeholder(viewport, device);
            }
        };

        let mut frame = FrameRGBA::transparent(device.width, device.height);

        let base_layer = self.render_pass(device, |_, ctx| {
            draw_image_into(ctx, base, &rect, device.scale)
        })?;
        premul_over_in_place(&mut frame.data, base_layer.data_as_u8_slice())?;

        let tint = select_tint_mode(assets, params);
        self.apply_tint(&mut frame, tint, assets, &rect, device)?;

        let text_drawn = self.apply_text(&mut frame, params, &rect, viewport.width, device)?;

        tracing::debug!(
            device_w = device.width,
            device_h = device.height,
            rect_x = rect.x,
            rect_y = rect.y,
            rect_w = rect.width,
            rect_h = rect.height,
            ?tint,
            text_drawn,
            "frame composed"
        );
        Ok(ComposedFrame {
            frame,
            content: FrameContent::Composed,
            draw_rect: Some(rect),
            device,
            tint,
            text_drawn,
        })
    }

    fn apply_tint(
        &mut self,
        frame: &mut FrameRGBA,
        tint: TintMode,
        assets: &LoadedAssets,
        rect: &DrawRect,
        device: DeviceSize,
    ) -> KitResult<()> {
        let scale = device.scale;
        match tint {
            TintMode::Off => Ok(()),
            TintMode::Unmasked(color) => {
                let layer = self.render_pass(device, |_, ctx| {
                    fill_rect(ctx, rect.to_rect(), color, scale);
                    Ok(())
                })?;
                multiply_over_in_place(&mut frame.data, layer.data_as_u8_slice(), tint.opacity())
            }
            TintMode::Masked(color) => {
                let Some(mask) = assets.mask.ready_asset() else {
                    return Err(KitError::validation("masked tint without a ready mask"));
                };
                let mut layer = self.render_pass(device, |_, ctx| {
                    fill_rect(ctx, rect.to_rect(), color, scale);
                    Ok(())
                })?;
                let (coverage, mode) = self.mask_coverage(mask, rect, device)?;
                mask_in_place(layer.data_as_u8_slice_mut(), &coverage, mode, false)?;
                multiply_over_in_place(&mut frame.data, layer.data_as_u8_slice(), tint.opacity())
            }
            TintMode::SleeveFallback(color) => {
                let geo = SleeveGeometry::for_rect(rect);
                let mut layer = self.render_pass(device, |_, ctx| {
                    fill_rect(ctx, geo.body, color, scale);
                    Ok(())
                })?;
                let sleeves = self.render_pass(device, |_, ctx| {
                    ctx.set_transform(affine_to_cpu(Affine::scale(scale)));
                    ctx.set_paint(Rgb8::WHITE.to_cpu_color());
                    for e in &geo.sleeves {
                        ctx.fill_path(&bezpath_to_cpu(&kurbo::Shape::to_path(e, 0.1)));
                    }
                    Ok(())
                })?;
                mask_in_place(
                    layer.data_as_u8_slice_mut(),
                    sleeves.data_as_u8_slice(),
                    MaskMode::Alpha,
                    true,
                )?;
                multiply_over_in_place(&mut frame.data, layer.data_as_u8_slice(), tint.opacity())
            }
        }
    }

    /// Mask stretched over the draw rect, as surface-sized RGBA8 plus the channel to read.
    fn mask_coverage(
        &mut self,
        mask: &PreparedMask,
        rect: &DrawRect,
        device: DeviceSize,
    ) -> KitResult<(Vec<u8>, MaskMode)> {
        let (image, mode) = match mask {
            PreparedMask::Raster(img) => {
                let mode = if img.has_alpha {
                    MaskMode::Alpha
                } else {
                    MaskMode::Luma
                };
                (img.clone(), mode)
            }
            PreparedMask::Svg(svg) => {
                let drect = rect.scaled(device.scale);
                let w = drect.width.ceil().clamp(1.0, MAX_MASK_RASTER_DIM) as u32;
                let h = drect.height.ceil().clamp(1.0, MAX_MASK_RASTER_DIM) as u32;
                let rgba = rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?;
                let img = PreparedImage {
                    width: w,
                    height: h,
                    rgba8_premul: std::sync::Arc::new(rgba),
                    has_alpha: true,
                };
                (img, MaskMode::Alpha)
            }
        };
        let pixmap = self.render_pass(device, |_, ctx| {
            draw_image_into(ctx, &image, rect, device.scale)
        })?;
        Ok((pixmap.data_as_u8_slice().to_vec(), mode))
    }

    fn apply_text(
        &mut self,
        frame: &mut FrameRGBA,
        params: &DesignParameters,
        rect: &DrawRect,
        surface_width: f64,
        device: DeviceSize,
    ) -> KitResult<bool> {
        let Some(plan) = TextPlan::compute(params, rect, surface_width) else {
            return Ok(false);
        };
        let Some(font) = self.fonts.resolve_bold(&params.font_family) else {
            return Ok(false);
        };
        let layer = self.render_pass(device, |this, ctx| {
            draw_text_plan(ctx, &mut this.text_engine, &font, &plan, device.scale)
        });
        match layer {
            Ok(layer) => {
                premul_over_in_place(&mut frame.data, layer.data_as_u8_slice())?;
                Ok(true)
            }
            Err(e @ (KitError::SurfaceUnavailable(_) | KitError::InvalidDimensions(_))) => Err(e),
            Err(e) => {
                tracing::warn!(error = %e, family = %params.font_family, "text layout failed; skipping text");
                Ok(false)
            }
        }
    }

    fn placeholder(&mut self, viewport: Viewport, device: DeviceSize) -> KitResult<ComposedFrame> {
        let style = self.placeholder.clone();
        let fill = style.fill.to_premul().to_array();
        let mut frame = FrameRGBA::transparent(device.width, device.height);
        for px in frame.data.chunks_exact_mut(4) {
            px.copy_from_slice(&fill);
        }

        let mut text_drawn = false;
        if let Some(font) = self.fonts.resolve("", false) {
            let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
            let label = self.render_pass(device, |this, ctx| {
                draw_centered_line(
                    ctx,
                    &mut this.text_engine,
                    &font,
                    &style.label,
                    style.font_px,
                    center,
                    style.text_color,
                    None,
                    device.scale,
                )
            });
            match label {
                Ok(label) => {
                    premul_over_in_place(&mut frame.data, label.data_as_u8_slice())?;
                    text_drawn = true;
                }
                Err(e) => tracing::warn!(error = %e, "placeholder label skipped"),
            }
        }

        tracing::debug!(
            device_w = device.width,
            device_h = device.height,
            "placeholder drawn"
        );
        Ok(ComposedFrame {
            frame,
            content: FrameContent::Placeholder,
            draw_rect: None,
            device,
            tint: TintMode::Off,
            text_drawn,
        })
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> KitResult<R>,
    ) -> KitResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx);
        self.ctx = Some(ctx);
        out
    }

    /// `vello_cpu` renders into a fresh buffer, so every layer is drawn into its own transparent
    /// pixmap and composited in software.
    fn render_pass(
        &mut self,
        device: DeviceSize,
        draw: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> KitResult<()>,
    ) -> KitResult<vello_cpu::Pixmap> {
        let mut pixmap = new_pixmap(device.width, device.height)?;
        let (w, h) = (pixmap.width(), pixmap.height());
        self.with_ctx_mut(w, h, |this, ctx| {
            draw(this, ctx)?;
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;
        Ok(pixmap)
    }
}

fn fill_rect(ctx: &mut vello_cpu::RenderContext, rect: Rect, color: Rgb8, scale: f64) {
    ctx.set_transform(affine_to_cpu(Affine::scale(scale)));
    ctx.set_paint(color.to_cpu_color());
    let path = bezpath_to_cpu(&kurbo::Shape::to_path(&rect, 0.1));
    ctx.fill_path(&path);
}

/// Stretch `img` over `rect` (logical) on a surface scaled by `scale`.
fn draw_image_into(
    ctx: &mut vello_cpu::RenderContext,
    img: &PreparedImage,
    rect: &DrawRect,
    scale: f64,
) -> KitResult<()> {
    let iw = f64::from(img.width);
    let ih = f64::from(img.height);
    let paint = image_paint(img)?;
    let tr = Affine::scale(scale)
        * Affine::translate((rect.x, rect.y))
        * Affine::scale_non_uniform(rect.width / iw, rect.height / ih);
    ctx.set_transform(affine_to_cpu(tr));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
