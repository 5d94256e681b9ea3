//! Per-kind background recipes.
//!
//! Every recipe paints the full `width x height` strip and depends only on its inputs, so the same
//! template always produces the same pixels. `image` is the one kind without a recipe here: it
//! needs the asynchronous loader and lives in [`crate::template::background`].

use kurbo::{BezPath, Circle, Point, Rect, Shape};

use crate::{
    foundation::{
        color::Rgba8,
        error::StripResult,
        math::{Fnv1a64, SplitMix64},
    },
    render::{
        surface::Surface,
        text::{TextRasterizer, TextRun},
    },
    template::model::{ColorSpec, Template, TemplateKind},
};

/// Inputs shared by all recipes.
#[derive(Clone, Copy, Debug)]
pub struct RecipeCtx<'a> {
    pub template: &'a Template,
    pub width: u32,
    pub height: u32,
    pub text: &'a TextRasterizer,
}

impl RecipeCtx<'_> {
    fn w(&self) -> f64 {
        f64::from(self.width)
    }

    fn h(&self) -> f64 {
        f64::from(self.height)
    }

    fn base(&self) -> Rgba8 {
        self.template.color.base_color()
    }
}

pub type RecipeFn = fn(&mut Surface, &RecipeCtx<'_>) -> StripResult<()>;

const RECIPES: &[(TemplateKind, RecipeFn)] = &[
    (TemplateKind::Solid, solid),
    (TemplateKind::Lined, lined),
    (TemplateKind::Dotted, dotted),
    (TemplateKind::Grid, grid),
    (TemplateKind::Gradient, gradient),
    (TemplateKind::Bordered, bordered),
    (TemplateKind::PatternStars, pattern_stars),
    (TemplateKind::Diagonal, diagonal),
    (TemplateKind::CanvasTexture, canvas_texture),
    (TemplateKind::Paper, paper),
    (TemplateKind::Retro, retro),
    (TemplateKind::DotBorder, dot_border),
    (TemplateKind::Unknown, white_fill),
];

/// Synchronous recipe for `kind`, or `None` for [`TemplateKind::Image`].
pub fn recipe_for(kind: TemplateKind) -> Option<RecipeFn> {
    RECIPES.iter().find(|(k, _)| *k == kind).map(|(_, f)| *f)
}

pub const LINE_SPACING: f64 = 20.0;
const LINE_COLOR: Rgba8 = Rgba8::rgb(0xe0, 0xe0, 0xe0);
const DOT_COLOR: Rgba8 = Rgba8::rgb(0xcc, 0xcc, 0xcc);
const GRID_COLOR: Rgba8 = Rgba8::rgb(0xdd, 0xdd, 0xdd);
const DIAGONAL_COLOR: Rgba8 = Rgba8::rgb(0xd0, 0xd0, 0xd0);
const BORDER_COLOR: Rgba8 = Rgba8::rgb(0x99, 0x99, 0x99);
const RETRO_COLOR: Rgba8 = Rgba8::rgb(0xc3, 0x8b, 0x00);
const STAR_COLOR: Rgba8 = Rgba8::rgb(0xff, 0xd7, 0x00);
const DOT_BORDER_COLOR: Rgba8 = Rgba8::rgb(0x88, 0x88, 0x88);

/// Yields `start, start + step, ...` while below `end`.
fn steps(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    (0u32..)
        .map(move |i| start + f64::from(i) * step)
        .take_while(move |v| *v < end)
}

fn solid(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    surface.fill(ctx.base());
    Ok(())
}

fn white_fill(surface: &mut Surface, _ctx: &RecipeCtx<'_>) -> StripResult<()> {
    surface.fill(Rgba8::WHITE);
    Ok(())
}

fn lined(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    surface.fill(ctx.base());
    for y in steps(LINE_SPACING, ctx.h(), LINE_SPACING) {
        surface.stroke_line(Point::new(0.0, y), Point::new(ctx.w(), y), LINE_COLOR, 1.0);
    }
    Ok(())
}

fn dotted(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    surface.fill(ctx.base());
    let mut dots = BezPath::new();
    for y in steps(10.0, ctx.h(), LINE_SPACING) {
        for x in steps(10.0, ctx.w(), LINE_SPACING) {
            dots.extend(Circle::new((x, y), 1.5).path_elements(0.1));
        }
    }
    surface.fill_shape(&dots, DOT_COLOR);
    Ok(())
}

fn grid(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    surface.fill(ctx.base());
    for y in steps(0.0, ctx.h(), LINE_SPACING) {
        surface.stroke_line(Point::new(0.0, y), Point::new(ctx.w(), y), GRID_COLOR, 1.0);
    }
    for x in steps(0.0, ctx.w(), LINE_SPACING) {
        surface.stroke_line(Point::new(x, 0.0), Point::new(x, ctx.h()), GRID_COLOR, 1.0);
    }
    Ok(())
}

fn gradient(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    match ctx.template.color {
        ColorSpec::Gradient([top, bottom]) => surface.fill_vertical_gradient(top, bottom),
        _ => {
            surface.fill(ctx.base());
            Ok(())
        }
    }
}

fn stroked_frame(surface: &mut Surface, ctx: &RecipeCtx<'_>, color: Rgba8, line_width: f64) {
    surface.fill(ctx.base());
    let half = line_width / 2.0;
    let frame = Rect::new(half, half, ctx.w() - half, ctx.h() - half);
    surface.stroke_shape(&frame, color, line_width);
}

fn bordered(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    stroked_frame(surface, ctx, BORDER_COLOR, 8.0);
    Ok(())
}

fn retro(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    stroked_frame(surface, ctx, RETRO_COLOR, 12.0);
    Ok(())
}

fn pattern_stars(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    surface.fill(ctx.base());
    let mut runs = Vec::new();
    for y in steps(20.0, ctx.h(), 40.0) {
        for x in steps(20.0, ctx.w(), 40.0) {
            runs.push(TextRun::starting_at(
                "\u{2b50}",
                Point::new(x, y),
                20.0,
                STAR_COLOR,
            ));
        }
    }
    ctx.text.draw(surface, &runs)
}

fn diagonal(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    surface.fill(ctx.base());
    let h = ctx.h();
    for i in steps(-h, ctx.w(), LINE_SPACING) {
        surface.stroke_line(
            Point::new(i, 0.0),
            Point::new(i + h, h),
            DIAGONAL_COLOR,
            1.0,
        );
    }
    Ok(())
}

fn canvas_texture(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    surface.fill(ctx.base());
    // Cells never overlap, so one path gives the same result as per-cell fills.
    let mut cells = BezPath::new();
    for (row, y) in steps(0.0, ctx.h(), 4.0).enumerate() {
        let x0 = if row % 2 == 0 { 0.0 } else { 2.0 };
        for x in steps(x0, ctx.w(), 4.0) {
            cells.extend(Rect::new(x, y, x + 2.0, y + 2.0).path_elements(0.1));
        }
    }
    surface.fill_shape(&cells, Rgba8::BLACK.with_alpha(0.05));
    Ok(())
}

/// Speckle count for a strip; 5000 on the 180x600 strip, scaled by area.
pub fn paper_speckle_count(width: u32, height: u32) -> usize {
    (5000.0 * (f64::from(width) / 180.0) * (f64::from(height) / 600.0)).floor() as usize
}

/// Seed of the paper noise. Depends on nothing but the template and strip size.
pub fn paper_seed(template_id: &str, width: u32, height: u32) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(template_id.as_bytes());
    h.write_u8(0);
    h.write_u32(width);
    h.write_u32(height);
    h.finish()
}

fn paper(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    surface.fill(ctx.base());
    let mut rng = SplitMix64::new(paper_seed(&ctx.template.id, ctx.width, ctx.height));
    for _ in 0..paper_speckle_count(ctx.width, ctx.height) {
        let x = rng.next_f64() * ctx.w();
        let y = rng.next_f64() * ctx.h();
        let alpha = rng.next_f64() * 0.03;
        surface.fill_rect(
            Rect::new(x, y, x + 1.0, y + 1.0),
            Rgba8::BLACK.with_alpha(alpha),
        );
    }
    Ok(())
}

fn dot_border(surface: &mut Surface, ctx: &RecipeCtx<'_>) -> StripResult<()> {
    const RADIUS: f64 = 2.0;
    const SPACING: f64 = 10.0;
    const INSET: f64 = RADIUS * 2.0 + 3.0;

    surface.fill(ctx.base());
    let (w, h) = (ctx.w(), ctx.h());
    let mut dots = BezPath::new();
    for x in steps(INSET, w - INSET / 2.0, SPACING) {
        dots.extend(Circle::new((x, INSET), RADIUS).path_elements(0.1));
        dots.extend(Circle::new((x, h - INSET), RADIUS).path_elements(0.1));
    }
    for y in steps(INSET + SPACING, h - INSET / 2.0 - SPACING / 2.0, SPACING) {
        dots.extend(Circle::new((INSET, y), RADIUS).path_elements(0.1));
        dots.extend(Circle::new((w - INSET, y), RADIUS).path_elements(0.1));
    }
    surface.fill_shape(&dots, DOT_BORDER_COLOR);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/template/recipes.rs"]
mod tests;
