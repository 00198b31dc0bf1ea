use std::io::Cursor;

use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::foundation::error::{KitError, KitResult};
use crate::render::surface::{FrameRGBA, byte_len};

/// Encode a frame as PNG (straight alpha).
pub fn encode_png(frame: &FrameRGBA) -> KitResult<Vec<u8>> {
    if frame.width == 0 || frame.height == 0 {
        return Err(KitError::invalid_dimensions("cannot encode an empty frame"));
    }
    if frame.data.len() != byte_len(frame.width, frame.height) {
        return Err(KitError::encode(format!(
            "frame byte len {} does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut rgba);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| KitError::encode("frame buffer does not fit its dimensions"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| KitError::encode(format!("png: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
