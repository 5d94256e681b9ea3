use image::RgbaImage;
use resvg::tiny_skia;

use crate::foundation::error::{StripError, StripResult};

/// Decode encoded image bytes (PNG, JPEG, ...) into a premultiplied raster.
pub fn decode_image(bytes: &[u8]) -> StripResult<tiny_skia::Pixmap> {
    if bytes.is_empty() {
        return Err(StripError::decode("image bytes are empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| StripError::decode(format!("decode image from memory: {e}")))?;
    rgba_to_pixmap(dyn_img.to_rgba8())
}

/// Convert a straight-alpha RGBA image into a premultiplied pixmap.
pub fn rgba_to_pixmap(rgba: RgbaImage) -> StripResult<tiny_skia::Pixmap> {
    let (width, height) = rgba.dimensions();
    let size = tiny_skia::IntSize::from_wh(width, height)
        .ok_or_else(|| StripError::decode(format!("invalid image size {width}x{height}")))?;

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    tiny_skia::Pixmap::from_vec(rgba8_premul, size)
        .ok_or_else(|| StripError::decode("prepared image byte length mismatch"))
}

/// Convert a premultiplied pixmap back into a straight-alpha RGBA image.
pub fn pixmap_to_rgba(pixmap: &tiny_skia::Pixmap) -> StripResult<RgbaImage> {
    let mut straight = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        straight.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), straight)
        .ok_or_else(|| StripError::render("pixmap readback byte length mismatch"))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
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

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
