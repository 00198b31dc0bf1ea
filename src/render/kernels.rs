//! Software compositing over premultiplied RGBA8 buffers.

use crate::foundation::error::{KitError, KitResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

/// Which mask channel drives coverage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MaskMode {
    /// Coverage from the mask alpha.
    Alpha,
    /// Coverage from the mask luminance (Rec. 709 weights in 8-bit fixed point).
    Luma,
}

fn check_lengths(a: &[u8], b: &[u8], what: &str) -> KitResult<()> {
    if a.len() != b.len() || !a.len().is_multiple_of(4) {
        return Err(KitError::validation(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

/// Scale every premultiplied `layer` pixel by the mask coverage at the same position.
pub(crate) fn mask_in_place(
    layer: &mut [u8],
    mask: &[u8],
    mode: MaskMode,
    inverted: bool,
) -> KitResult<()> {
    check_lengths(layer, mask, "mask_in_place")?;
    for (d, m) in layer.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        let mut w = match mode {
            MaskMode::Alpha => m[3],
            MaskMode::Luma => {
                let r = u16::from(m[0]);
                let g = u16::from(m[1]);
                let b = u16::from(m[2]);
                ((r * 54 + g * 183 + b * 19 + 128) >> 8) as u8
            }
        };
        if inverted {
            w = 255 - w;
        }
        if w == 255 {
            continue;
        }
        let w16 = u16::from(w);
        for c in d.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), w16);
        }
    }
    Ok(())
}

/// Source-over of `src` onto `dst`.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> KitResult<()> {
    check_lengths(dst, src, "premul_over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3] as u16;
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = add_sat_u8(sa as u8, mul_div255_u8(d[3] as u16, inv));
        for c in 0..3 {
            let dc = mul_div255_u8(d[c] as u16, inv);
            d[c] = add_sat_u8(s[c], dc);
        }
    }
    Ok(())
}

/// Multiply-blend `src` onto `dst` at `opacity`.
///
/// Pixels where `src` is fully transparent are left bit-identical.
pub(crate) fn multiply_over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> KitResult<()> {
    check_lengths(dst, src, "multiply_over_in_place")?;
    composite_over_rgba8_premul_blend(dst, src, opacity, |s, d| s * d);
    Ok(())
}

#[inline(always)]
fn composite_over_rgba8_premul_blend<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F)
where
    F: Fn(f32, f32) -> f32,
{
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        // Porter-Duff "source-over" with blend applied to unpremultiplied channels:
        // out_a = sa + da * (1 - sa)
        // out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
        let sa = (s[3] as f32 / 255.0) * opacity;
        let da = d[3] as f32 / 255.0;
        let inv_sa = 1.0 - sa;
        let out_a = (sa + da * inv_sa).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = (s[c] as f32 / 255.0) * opacity;
            let dp = d[c] as f32 / 255.0;
            let sc = if sa > 0.0 { (sp / sa).clamp(0.0, 1.0) } else { 0.0 };
            let dc = if da > 0.0 { (dp / da).clamp(0.0, 1.0) } else { 0.0 };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out_p = (sp * (1.0 - da) + dp * inv_sa + b * sa * da).clamp(0.0, 1.0);
            d[c] = (out_p * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        d[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/kernels.rs"]
mod tests;
