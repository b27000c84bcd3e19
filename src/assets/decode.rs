use anyhow::Context;

use crate::foundation::{core::PixelBuffer, error::SpriteResult};

/// Decode an encoded image (PNG) into a straight-alpha [`PixelBuffer`].
pub fn decode_image(bytes: &[u8]) -> SpriteResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_rgba8_bytes(width, height, rgba.as_raw())
}

/// Encode a [`PixelBuffer`] as PNG bytes.
pub fn encode_png(buf: &PixelBuffer) -> SpriteResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(buf.width, buf.height, buf.to_rgba8_bytes())
        .context("pixel buffer dimensions do not match its data")?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
