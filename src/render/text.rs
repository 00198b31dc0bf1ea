use crate::assets::fonts::{ResolvedFont, TextLayoutEngine};
use crate::color::contrast::{contrast_color, font_scale};
use crate::color::hex::Rgb8;
use crate::design::params::DesignParameters;
use crate::foundation::core::{Affine, Point};
use crate::foundation::error::KitResult;
use crate::layout::fit::DrawRect;
use crate::render::surface::affine_to_cpu;

/// Number size relative to the name size.
pub const NUMBER_SIZE_FACTOR: f64 = 1.8;
/// Vertical position of the number, as a fraction of the draw height.
pub const NUMBER_Y: f64 = 0.55;
/// Vertical position of the name, as a fraction of the draw height.
pub const NAME_Y: f64 = 0.68;

/// One centered line of printed text, in logical pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextLine {
    /// Content.
    pub text: String,
    /// Font size.
    pub font_px: f64,
    /// Center of the line box.
    pub center: Point,
    /// Outline width.
    pub stroke_width: f64,
}

/// Sizes, positions and colors for the text layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextPlan {
    /// Font scale derived from the surface width.
    pub scale: f64,
    /// Fill color.
    pub fill: Rgb8,
    /// Outline color, always the contrast color of `fill`.
    pub stroke: Rgb8,
    /// Number line, drawn first.
    pub number: Option<TextLine>,
    /// Name line, drawn over the number.
    pub name: Option<TextLine>,
}

impl TextPlan {
    /// Plan the text layer for a surface `surface_width` logical pixels wide.
    ///
    /// Returns `None` when there is nothing to print.
    pub fn compute(params: &DesignParameters, rect: &DrawRect, surface_width: f64) -> Option<Self> {
        if !params.has_text() {
            return None;
        }
        if Rgb8::parse_hex(&params.text_color).is_none() {
            tracing::warn!(
                text_color = %params.text_color,
                "malformed text color; using white"
            );
        }
        let scale = font_scale(surface_width);
        let fill = params.text_fill();
        let stroke = contrast_color(&fill.to_hex());
        let base = params.font_size_base * scale;

        let line = |text: &str, font_px: f64, fy: f64, stroke_width: f64| {
            (!text.is_empty()).then(|| TextLine {
                text: text.to_owned(),
                font_px,
                center: rect.at_fraction(0.5, fy),
                stroke_width,
            })
        };

        Some(Self {
            scale,
            fill,
            stroke,
            number: line(
                &params.number_text,
                base * NUMBER_SIZE_FACTOR,
                NUMBER_Y,
                (3.0 * scale).max(2.0),
            ),
            name: line(&params.name_text, base, NAME_Y, (2.0 * scale).max(1.0)),
        })
    }

    /// Lines in draw order.
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.number.iter().chain(self.name.iter())
    }
}

/// Draw every line of `plan`, outline first and fill on top.
pub(crate) fn draw_text_plan(
    ctx: &mut vello_cpu::RenderContext,
    engine: &mut TextLayoutEngine,
    font: &ResolvedFont,
    plan: &TextPlan,
    device_scale: f64,
) -> KitResult<()> {
    for line in plan.lines() {
        draw_centered_line(
            ctx,
            engine,
            font,
            &line.text,
            line.font_px,
            line.center,
            plan.fill,
            Some((plan.stroke, line.stroke_width)),
            device_scale,
        )?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_centered_line(
    ctx: &mut vello_cpu::RenderContext,
    engine: &mut TextLayoutEngine,
    font: &ResolvedFont,
    text: &str,
    font_px: f64,
    center: Point,
    fill: Rgb8,
    stroke: Option<(Rgb8, f64)>,
    device_scale: f64,
) -> KitResult<()> {
    let layout = engine.layout_line(text, font, font_px as f32)?;
    let w = f64::from(layout.width());
    let h = f64::from(layout.height());
    let origin = Affine::scale(device_scale)
        * Affine::translate((center.x - w / 2.0, center.y - h / 2.0));
    ctx.set_transform(affine_to_cpu(origin));

    for l in layout.lines() {
        for item in l.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let size = run.run().font_size();
            let glyphs: Vec<vello_cpu::Glyph> = run
                .positioned_glyphs()
                .map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                })
                .collect();

            if let Some((color, width)) = stroke {
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
                ctx.set_paint(color.to_cpu_color());
                ctx.glyph_run(&font.font_data)
                    .font_size(size)
                    .stroke_glyphs(glyphs.clone().into_iter());
            }
            ctx.set_paint(fill.to_cpu_color());
            ctx.glyph_run(&font.font_data)
                .font_size(size)
                .fill_glyphs(glyphs.into_iter());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
