use std::io::Cursor;

use kurbo::Point;
use resvg::tiny_skia;

use crate::{
    foundation::{
        color::Rgba8,
        core::StripConfig,
        error::{StripError, StripResult},
    },
    layout::frames::frame_layout,
    render::{
        surface::Surface,
        text::{TextRasterizer, TextRun},
    },
    template::model::Template,
};

const PLACEHOLDER_FILL: Rgba8 = Rgba8::rgb(0xdd, 0xdd, 0xdd);
const PLACEHOLDER_INK: Rgba8 = Rgba8::rgb(0xaa, 0xaa, 0xaa);
const EMPTY_CAPTION_INK: Rgba8 = Rgba8::rgb(0x33, 0x33, 0x33);

pub const ERROR_MESSAGE: &str = "Error generating preview.";

/// Stand-in bitmap for a frame that failed to decode.
///
/// Sized like frame slot 0 so it cover-fits without cropping.
pub fn error_placeholder(
    config: StripConfig,
    text: &TextRasterizer,
) -> StripResult<tiny_skia::Pixmap> {
    let rect = frame_layout(
        f64::from(config.width),
        f64::from(config.height),
        config.capacity,
        0,
    );
    let width = if rect.width >= 1.0 { rect.width } else { 100.0 };
    let height = if rect.height >= 1.0 {
        rect.height
    } else if rect.width >= 1.0 {
        width / crate::foundation::core::FRAME_ASPECT_RATIO
    } else {
        75.0
    };

    let mut surface = Surface::new(width.round() as u32, height.round() as u32)?;
    surface.fill(PLACEHOLDER_FILL);
    let (w, h) = (f64::from(surface.width()), f64::from(surface.height()));
    text.draw(
        &mut surface,
        &[TextRun::centered(
            "Error",
            Point::new(w / 2.0, h / 2.0),
            (w / 6.0).min(12.0),
            PLACEHOLDER_INK,
        )],
    )?;
    Ok(surface.pixmap().clone())
}

/// Prompt shown on a strip without frames.
pub fn draw_empty_caption(
    surface: &mut Surface,
    config: StripConfig,
    template: &Template,
    text: &TextRasterizer,
) -> StripResult<()> {
    let w = f64::from(config.width);
    let h = f64::from(config.height);
    let ink = if template.is_dark() {
        Rgba8::WHITE
    } else {
        EMPTY_CAPTION_INK
    };
    let run = TextRun::centered(
        format!("Capture {} photos!", config.capacity),
        Point::new(w / 2.0, h / 2.0),
        (w / 12.0).min(16.0),
        ink,
    )
    .bold();
    text.draw(surface, &[run])
}

/// Replace whatever was drawn with the full-surface error image.
pub fn draw_error_overlay(surface: &mut Surface, text: &TextRasterizer) {
    surface.clear();
    surface.fill(Rgba8::rgb(255, 0, 0).with_alpha(0.7));
    let center = Point::new(
        f64::from(surface.width()) / 2.0,
        f64::from(surface.height()) / 2.0,
    );
    let run = TextRun::centered(ERROR_MESSAGE, center, 16.0, Rgba8::WHITE).bold();
    if let Err(e) = text.draw(surface, &[run]) {
        tracing::warn!(error = %e, "error overlay drawn without message");
    }
}

/// Error image built without the drawing stack, for when no surface could be allocated.
pub fn fallback_error_png(width: u32, height: u32) -> StripResult<Vec<u8>> {
    let img =
        image::RgbaImage::from_pixel(width.max(1), height.max(1), image::Rgba([255, 0, 0, 178]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| StripError::render(format!("encode fallback png: {e}")))?;
    Ok(out.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/placeholder.rs"]
mod tests;
