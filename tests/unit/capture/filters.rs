use image::Rgba;

use super::*;

fn one(px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(1, 1, Rgba(px))
}

fn run(filter: FilterKind, px: [u8; 4]) -> [u8; 4] {
    filter.apply(one(px)).get_pixel(0, 0).0
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 1)
}

#[test]
fn none_is_identity() {
    assert_eq!(run(FilterKind::None, [12, 34, 56, 78]), [12, 34, 56, 78]);
}

#[test]
fn invert_flips_color_and_keeps_alpha() {
    assert_eq!(run(FilterKind::Invert, [10, 20, 30, 200]), [245, 235, 225, 200]);
}

#[test]
fn grayscale_uses_luma_weights() {
    assert_eq!(run(FilterKind::Grayscale, [255, 0, 0, 255]), [54, 54, 54, 255]);
    let [r, g, b, _] = run(FilterKind::Mono, [200, 30, 90, 255]);
    assert!(r == g && g == b);
}

#[test]
fn brightness_and_contrast_follow_css_formulas() {
    assert_eq!(run(FilterKind::Bright, [100, 0, 250, 255]), [125, 0, 255, 255]);
    assert_eq!(run(FilterKind::Contrast, [200, 128, 0, 255]), [236, 128, 0, 255]);
}

#[test]
fn sepia_tints_white() {
    assert_eq!(run(FilterKind::Sepia, [255, 255, 255, 255]), [255, 255, 239, 255]);
}

#[test]
fn hue_and_saturation_leave_grays_alone() {
    for filter in [FilterKind::Warm, FilterKind::Cool, FilterKind::Vivid] {
        let out = run(filter, [128, 128, 128, 255]);
        assert!(close(out, [128, 128, 128, 255]), "{filter}: {out:?}");
    }
}

#[test]
fn warm_and_cool_rotate_in_opposite_directions() {
    let warm = run(FilterKind::Warm, [200, 60, 60, 255]);
    let cool = run(FilterKind::Cool, [200, 60, 60, 255]);
    assert_ne!(warm, cool);
    // a positive hue rotation pushes red toward yellow (more green)
    assert!(cool[1] > warm[1], "warm {warm:?} cool {cool:?}");
}

#[test]
fn blur_softens_edges_and_keeps_size() {
    let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
    for y in 0..10 {
        for x in 5..10 {
            img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
    }
    let out = FilterKind::Blur.apply(img);
    assert_eq!(out.dimensions(), (10, 10));
    let near_edge = out.get_pixel(4, 5).0[0];
    assert!(near_edge > 0 && near_edge < 255);
}

#[test]
fn menu_metadata_and_lookup() {
    assert_eq!(FilterKind::ALL.len(), 11);
    assert_eq!(FilterKind::Cool.label(), "Cool Tone");
    assert_eq!(FilterKind::Mono.label(), "Monochrome");
    assert_eq!(FilterKind::None.label(), "Normal");
    for f in FilterKind::ALL {
        assert_eq!(FilterKind::from_value(f.as_str()), f);
        assert!(!f.icon().is_empty());
    }
    assert_eq!(FilterKind::from_value("polaroid"), FilterKind::None);
    assert_eq!(serde_json::to_string(&FilterKind::Vivid).unwrap(), "\"vivid\"");
}
