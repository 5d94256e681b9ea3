use super::*;
use crate::template::catalog::TemplateCatalog;

fn render(template: &Template, width: u32, height: u32) -> Surface {
    let text = TextRasterizer::system();
    let mut surface = Surface::new(width, height).unwrap();
    let ctx = RecipeCtx {
        template,
        width,
        height,
        text: &text,
    };
    let recipe = recipe_for(template.kind).unwrap();
    recipe(&mut surface, &ctx).unwrap();
    surface
}

fn builtin(id: &str) -> Template {
    TemplateCatalog::builtin().get(id).unwrap().clone()
}

#[test]
fn every_kind_but_image_has_a_recipe() {
    for kind in TemplateKind::ALL {
        assert_eq!(recipe_for(kind).is_none(), kind == TemplateKind::Image, "{kind}");
    }
    assert!(recipe_for(TemplateKind::Unknown).is_some());
}

#[test]
fn every_builtin_template_paints_an_opaque_strip() {
    for t in TemplateCatalog::builtin().iter() {
        let s = render(t, 180, 600);
        for (x, y) in [(0, 0), (90, 300), (179, 599)] {
            assert_eq!(s.pixel(x, y).unwrap().a, 255, "{} at {x},{y}", t.id);
        }
    }
}

#[test]
fn solid_fills_with_the_template_color() {
    let s = render(&builtin("blue"), 180, 600);
    assert_eq!(s.pixel(50, 50), Some(Rgba8::rgb(0xcc, 0xe5, 0xff)));
}

#[test]
fn unknown_kind_is_plain_white() {
    let t = Template::solid("x", "X", TemplateKind::Unknown, "#ff0000");
    let s = render(&t, 40, 40);
    assert_eq!(s.pixel(20, 20), Some(Rgba8::WHITE));
}

#[test]
fn lined_draws_rules_every_twenty_pixels() {
    let s = render(&builtin("lined"), 180, 600);
    assert_ne!(s.pixel(90, 20), Some(Rgba8::WHITE));
    assert_eq!(s.pixel(90, 10), Some(Rgba8::WHITE));
    assert_eq!(s.pixel(90, 0), Some(Rgba8::WHITE));
}

#[test]
fn grid_includes_the_zero_lines() {
    let s = render(&builtin("grid"), 180, 600);
    assert_ne!(s.pixel(0, 50), Some(Rgba8::WHITE));
    assert_ne!(s.pixel(50, 0), Some(Rgba8::WHITE));
    assert_eq!(s.pixel(10, 10), Some(Rgba8::WHITE));
}

#[test]
fn dotted_places_dots_on_the_offset_lattice() {
    let s = render(&builtin("dots"), 180, 600);
    assert_ne!(s.pixel(10, 10), Some(Rgba8::WHITE));
    assert_ne!(s.pixel(30, 50), Some(Rgba8::WHITE));
    assert_eq!(s.pixel(20, 20), Some(Rgba8::WHITE));
}

#[test]
fn gradient_runs_from_first_to_second_stop() {
    let s = render(&builtin("gradient1"), 180, 600);
    let top = s.pixel(90, 0).unwrap();
    let bottom = s.pixel(90, 599).unwrap();
    assert!(top.r.abs_diff(0xff) <= 2 && top.g.abs_diff(0x9a) <= 2);
    assert!(bottom.g.abs_diff(0xd0) <= 2 && bottom.b.abs_diff(0xc4) <= 2);
}

#[test]
fn bordered_and_retro_stroke_inset_frames() {
    let s = render(&builtin("bordered-blue"), 180, 600);
    assert_eq!(s.pixel(1, 300), Some(Rgba8::rgb(0x99, 0x99, 0x99)));
    assert_eq!(s.pixel(90, 300), Some(Rgba8::rgb(0xe6, 0xf2, 0xff)));

    let s = render(&builtin("retro"), 180, 600);
    assert_eq!(s.pixel(90, 5), Some(Rgba8::rgb(0xc3, 0x8b, 0x00)));
    assert_eq!(s.pixel(90, 300), Some(Rgba8::rgb(0xf7, 0xe6, 0xa3)));
}

#[test]
fn dot_border_marks_the_perimeter_only() {
    let s = render(&builtin("dots-border"), 180, 600);
    assert_ne!(s.pixel(7, 7), Some(Rgba8::WHITE));
    assert_ne!(s.pixel(7, 593), Some(Rgba8::WHITE));
    assert_eq!(s.pixel(90, 300), Some(Rgba8::WHITE));
}

#[test]
fn canvas_texture_offsets_odd_rows() {
    let t = builtin("canvas");
    let base = Rgba8::rgb(0xfd, 0xf6, 0xe3);
    let s = render(&t, 180, 600);
    assert_ne!(s.pixel(0, 0), Some(base));
    assert_eq!(s.pixel(2, 0), Some(base));
    assert_eq!(s.pixel(0, 4), Some(base));
    assert_ne!(s.pixel(2, 4), Some(base));
}

#[test]
fn paper_noise_is_reproducible_and_keyed_by_template_and_size() {
    let t = builtin("paper");
    let a = render(&t, 180, 600);
    let b = render(&t, 180, 600);
    assert_eq!(a.pixmap().data(), b.pixmap().data());

    assert_ne!(paper_seed("paper", 180, 600), paper_seed("paper", 370, 600));
    assert_ne!(paper_seed("paper", 180, 600), paper_seed("paper2", 180, 600));
    assert_eq!(paper_speckle_count(180, 600), 5000);
    assert_eq!(paper_speckle_count(370, 600), 10277);
}
