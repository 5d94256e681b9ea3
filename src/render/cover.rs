use kurbo::{Affine, Rect, RoundedRect};
use resvg::tiny_skia;

use crate::{foundation::core::FrameRect, render::surface::Surface};

/// Source window `(sx, sy, sw, sh)` of a `src_w x src_h` image that fills `rect` without
/// distortion. The excess is cropped symmetrically from the longer axis.
pub fn cover_crop(src_w: f64, src_h: f64, rect: FrameRect) -> Rect {
    let img_ratio = src_w / src_h;
    let target_ratio = rect.aspect_ratio();

    if img_ratio > target_ratio {
        let sw = src_h * target_ratio;
        let sx = (src_w - sw) / 2.0;
        Rect::new(sx, 0.0, sx + sw, src_h)
    } else if img_ratio < target_ratio {
        let sh = src_w / target_ratio;
        let sy = (src_h - sh) / 2.0;
        Rect::new(0.0, sy, src_w, sy + sh)
    } else {
        Rect::new(0.0, 0.0, src_w, src_h)
    }
}

/// Transform mapping the source window `crop` (image space) onto `rect` (surface space).
pub fn crop_transform(crop: Rect, rect: FrameRect) -> Affine {
    Affine::translate((rect.x, rect.y))
        * Affine::scale_non_uniform(rect.width / crop.width(), rect.height / crop.height())
        * Affine::translate((-crop.x0, -crop.y0))
}

/// Draw `image` into `rect` crop-to-fill, clipped to a rounded rectangle.
///
/// Clipping is expressed by the filled shape itself, so no clip state outlives the call.
pub fn draw_cover(surface: &mut Surface, image: &tiny_skia::Pixmap, rect: FrameRect, radius: f64) {
    if image.width() == 0 || image.height() == 0 || rect.width <= 0.0 || rect.height <= 0.0 {
        return;
    }
    let crop = cover_crop(f64::from(image.width()), f64::from(image.height()), rect);
    let clip = RoundedRect::from_rect(rect.to_rect(), radius.max(0.0));
    surface.fill_shape_with_image(&clip, image, crop_transform(crop, rect));
}

#[cfg(test)]
#[path = "../../tests/unit/render/cover.rs"]
mod tests;
