use std::io::Cursor;

use kurbo::{Affine, PathEl, Point, Rect, Shape};
use resvg::tiny_skia;

use crate::{
    assets::decode::pixmap_to_rgba,
    foundation::{
        color::Rgba8,
        error::{StripError, StripResult},
    },
};

const PATH_TOLERANCE: f64 = 0.1;

/// Off-screen RGBA canvas owned by exactly one compositor run.
///
/// Pixels are stored premultiplied; [`Surface::pixel`] and [`Surface::encode_png`] convert back to
/// straight alpha.
pub struct Surface {
    pixmap: tiny_skia::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> StripResult<Self> {
        let pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            StripError::render(format!("failed to allocate {width}x{height} surface"))
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width()), f64::from(self.height()))
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Paint the whole surface with `color`, blending over existing content.
    pub fn fill(&mut self, color: Rgba8) {
        let bounds = self.bounds();
        self.fill_rect(bounds, color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        let Some(r) = to_skia_rect(rect) else {
            return;
        };
        let paint = solid_paint(color);
        self.pixmap
            .fill_rect(r, &paint, tiny_skia::Transform::identity(), None);
    }

    pub fn fill_shape(&mut self, shape: &impl Shape, color: Rgba8) {
        let Some(path) = shape_to_skia(shape) else {
            return;
        };
        let paint = solid_paint(color);
        self.pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    pub fn stroke_shape(&mut self, shape: &impl Shape, color: Rgba8, width: f64) {
        let Some(path) = shape_to_skia(shape) else {
            return;
        };
        let paint = solid_paint(color);
        let stroke = tiny_skia::Stroke {
            width: width as f32,
            ..tiny_skia::Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    pub fn stroke_line(&mut self, p0: Point, p1: Point, color: Rgba8, width: f64) {
        self.stroke_shape(&kurbo::Line::new(p0, p1), color, width);
    }

    /// Two-stop linear gradient over the full surface, `top` at y = 0 and `bottom` at y = height.
    pub fn fill_vertical_gradient(&mut self, top: Rgba8, bottom: Rgba8) -> StripResult<()> {
        let h = self.height() as f32;
        let shader = tiny_skia::LinearGradient::new(
            tiny_skia::Point::from_xy(0.0, 0.0),
            tiny_skia::Point::from_xy(0.0, h),
            vec![
                tiny_skia::GradientStop::new(0.0, top.to_skia()),
                tiny_skia::GradientStop::new(1.0, bottom.to_skia()),
            ],
            tiny_skia::SpreadMode::Pad,
            tiny_skia::Transform::identity(),
        )
        .ok_or_else(|| StripError::render("invalid gradient parameters"))?;

        let rect = to_skia_rect(self.bounds())
            .ok_or_else(|| StripError::render("surface has no area"))?;
        let paint = tiny_skia::Paint {
            shader,
            anti_alias: true,
            ..tiny_skia::Paint::default()
        };
        self.pixmap
            .fill_rect(rect, &paint, tiny_skia::Transform::identity(), None);
        Ok(())
    }

    /// Fill `shape` with `image`, mapped into surface space by `image_to_surface`.
    ///
    /// Only pixels inside the shape are touched, so the shape acts as the clip.
    pub fn fill_shape_with_image(
        &mut self,
        shape: &impl Shape,
        image: &tiny_skia::Pixmap,
        image_to_surface: Affine,
    ) {
        let Some(path) = shape_to_skia(shape) else {
            return;
        };
        let shader = tiny_skia::Pattern::new(
            image.as_ref(),
            tiny_skia::SpreadMode::Pad,
            tiny_skia::FilterQuality::Bilinear,
            1.0,
            affine_to_skia(image_to_surface),
        );
        let paint = tiny_skia::Paint {
            shader,
            anti_alias: true,
            ..tiny_skia::Paint::default()
        };
        self.pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    /// Render a parsed SVG tree at its own coordinates (1 SVG unit = 1 surface pixel).
    pub fn render_svg(&mut self, tree: &usvg::Tree) {
        resvg::render(
            tree,
            tiny_skia::Transform::identity(),
            &mut self.pixmap.as_mut(),
        );
    }

    /// Straight-alpha color of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba8::rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }

    /// Serialize to PNG.
    pub fn encode_png(&self) -> StripResult<Vec<u8>> {
        let rgba = pixmap_to_rgba(&self.pixmap)?;
        let mut out = Cursor::new(Vec::new());
        rgba.write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| StripError::render(format!("encode png: {e}")))?;
        Ok(out.into_inner())
    }
}

fn solid_paint(color: Rgba8) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

fn to_skia_rect(r: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(r.x0 as f32, r.y0 as f32, r.x1 as f32, r.y1 as f32)
}

pub(crate) fn affine_to_skia(a: Affine) -> tiny_skia::Transform {
    let [sx, ky, kx, sy, tx, ty] = a.as_coeffs();
    tiny_skia::Transform::from_row(
        sx as f32, ky as f32, kx as f32, sy as f32, tx as f32, ty as f32,
    )
}

fn shape_to_skia(shape: &impl Shape) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in shape.path_elements(PATH_TOLERANCE) {
        match el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
