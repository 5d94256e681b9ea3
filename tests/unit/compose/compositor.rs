use super::*;
use crate::{
    assets::loader::MemoryImageLoader,
    compose::inputs::EmojiStamp,
    foundation::core::StripCapacity,
    template::catalog::TemplateCatalog,
};

fn png_of(w: u32, h: u32, px: [u8; 4]) -> CapturedFrame {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    CapturedFrame::from_encoded(out.into_inner())
}

fn compositor() -> Compositor {
    Compositor::new(Arc::new(MemoryImageLoader::new()))
}

fn inputs(capacity: StripCapacity, frames: Vec<CapturedFrame>) -> StripInputs {
    StripInputs {
        config: capacity.config(),
        frames,
        ..StripInputs::default()
    }
}

fn px(img: &image::RgbaImage, x: u32, y: u32) -> [u8; 4] {
    img.get_pixel(x, y).0
}

const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

#[tokio::test]
async fn empty_strip_draws_background_and_prompt_only() {
    let c = compositor();
    let preview = c.compose(&inputs(StripCapacity::Four, vec![])).await;
    assert_eq!((preview.width, preview.height), (180, 600));
    assert_eq!(preview.run, 1);

    let img = preview.to_rgba().unwrap();
    assert_eq!(img.dimensions(), (180, 600));
    // slot 0 would cover this pixel
    assert_eq!(px(&img, 90, 70), WHITE);
    assert_eq!(px(&img, 90, 460), WHITE);
}

#[tokio::test]
async fn frames_are_drawn_into_their_slots_in_index_order() {
    let c = compositor();
    let frames = vec![
        png_of(40, 30, RED),
        png_of(30, 40, [0, 255, 0, 255]),
        png_of(64, 48, [0, 0, 255, 255]),
    ];
    let img = c
        .compose(&inputs(StripCapacity::Four, frames))
        .await
        .to_rgba()
        .unwrap();
    assert_eq!(px(&img, 90, 70), RED);
    assert_eq!(px(&img, 90, 200), [0, 255, 0, 255]);
    assert_eq!(px(&img, 90, 330), [0, 0, 255, 255]);
    // slot 3 stays empty
    assert_eq!(px(&img, 90, 460), WHITE);
    // gap between slots
    assert_eq!(px(&img, 90, 135), WHITE);
}

#[tokio::test]
async fn one_bad_frame_becomes_a_placeholder() {
    let c = compositor();
    let frames = vec![
        png_of(40, 30, RED),
        CapturedFrame::from_encoded(b"definitely not an image".to_vec()),
        png_of(40, 30, RED),
    ];
    let img = c
        .compose(&inputs(StripCapacity::Four, frames))
        .await
        .to_rgba()
        .unwrap();
    assert_eq!(px(&img, 90, 70), RED);
    assert_eq!(px(&img, 30, 170), [0xdd, 0xdd, 0xdd, 255]);
    assert_eq!(px(&img, 90, 330), RED);
}

#[tokio::test]
async fn frames_beyond_capacity_are_ignored() {
    let c = compositor();
    let frames = (0..6).map(|_| png_of(8, 6, RED)).collect();
    let img = c
        .compose(&inputs(StripCapacity::Four, frames))
        .await
        .to_rgba()
        .unwrap();
    assert_eq!(px(&img, 90, 460), RED);
    // below the fourth slot nothing was drawn
    assert_eq!(px(&img, 90, 560), WHITE);
}

#[tokio::test]
async fn eight_frame_strip_uses_two_columns() {
    let c = compositor();
    let frames = (0..8).map(|_| png_of(8, 6, RED)).collect();
    let img = c
        .compose(&inputs(StripCapacity::Eight, frames))
        .await
        .to_rgba()
        .unwrap();
    assert_eq!(img.dimensions(), (370, 600));
    assert_eq!(px(&img, 95, 70), RED);
    assert_eq!(px(&img, 275, 70), RED);
    // column gap
    assert_eq!(px(&img, 185, 70), WHITE);
}

#[tokio::test]
async fn identical_inputs_give_identical_pixels() {
    let c = compositor();
    let paper = TemplateCatalog::builtin().get("paper").unwrap().clone();
    let snapshot = StripInputs {
        template: paper,
        stamps: vec![EmojiStamp::new("x", 50.0, 50.0)],
        caption: "hello".into(),
        ..inputs(StripCapacity::Four, vec![png_of(4, 3, RED)])
    };
    let a = c.compose(&snapshot).await;
    let b = c.compose(&snapshot).await;
    assert_eq!(a.png(), b.png());
    assert_eq!((a.run, b.run), (1, 2));
}

#[tokio::test]
async fn renderer_seam_shares_the_run_counter() {
    let c = compositor();
    let renderer: &dyn StripRenderer = &c;
    let preview = renderer.render(StripInputs::default()).await;
    assert_eq!(preview.run, 1);
    let clone = c.clone();
    let _ = clone.compose(&StripInputs::default()).await;
    assert_eq!(c.runs(), 2);
}

/// Pixels in `rows` x `cols` matching `pred`.
fn count_px(
    img: &image::RgbaImage,
    cols: std::ops::Range<u32>,
    rows: std::ops::Range<u32>,
    pred: impl Fn([u8; 4]) -> bool,
) -> usize {
    rows.flat_map(|y| cols.clone().map(move |x| (x, y)))
        .filter(|&(x, y)| pred(px(img, x, y)))
        .count()
}

fn with_template(id: &str, caption: &str) -> StripInputs {
    StripInputs {
        template: TemplateCatalog::builtin().get(id).unwrap().clone(),
        caption: caption.into(),
        ..inputs(StripCapacity::Four, vec![png_of(4, 3, RED)])
    }
}

#[tokio::test]
async fn caption_ink_follows_template_darkness() {
    let c = compositor();

    let dark = c
        .compose(&with_template("black", "MMMMMM"))
        .await
        .to_rgba()
        .unwrap();
    let white_ink = |p: [u8; 4]| p[0] > 200 && p[1] > 200 && p[2] > 200;
    assert!(count_px(&dark, 0..180, 560..585, white_ink) > 20);
    // baseline sits 20px above the bottom edge
    assert_eq!(count_px(&dark, 0..180, 585..600, white_ink), 0);
    assert_eq!(count_px(&dark, 0..180, 540..555, white_ink), 0);

    let light = c
        .compose(&with_template("white", "MMMMMM"))
        .await
        .to_rgba()
        .unwrap();
    let dark_ink = |p: [u8; 4]| p[0] < 100 && p[1] < 100 && p[2] < 100;
    assert!(count_px(&light, 0..180, 560..585, dark_ink) > 20);
    assert_eq!(count_px(&light, 0..180, 585..600, dark_ink), 0);

    // centred: ink on both sides of the middle column
    assert!(count_px(&light, 0..90, 560..585, dark_ink) > 5);
    assert!(count_px(&light, 90..180, 560..585, dark_ink) > 5);
}

#[tokio::test]
async fn stamps_are_drawn_over_frames() {
    let c = compositor();
    let snapshot = StripInputs {
        stamps: vec![EmojiStamp::new("M", 90.0, 70.0)],
        ..inputs(StripCapacity::Four, vec![png_of(40, 30, RED)])
    };
    let img = c.compose(&snapshot).await.to_rgba().unwrap();
    let glyph = |p: [u8; 4]| p[0] < 100;
    assert!(count_px(&img, 75..105, 55..85, glyph) > 10);
    // the rest of the frame is untouched
    assert_eq!(px(&img, 30, 30), RED);
}

#[tokio::test]
async fn failure_after_drawing_yields_the_error_image() {
    let mut c = compositor();
    c.fail_after_frames = true;
    let green = [0, 255, 0, 255];
    let snapshot = StripInputs {
        caption: "never drawn".into(),
        ..inputs(
            StripCapacity::Four,
            vec![png_of(40, 30, green), png_of(40, 30, green)],
        )
    };
    let preview = c.compose(&snapshot).await;
    assert_eq!((preview.width, preview.height), (180, 600));
    assert_eq!(preview.run, 1);

    let img = preview.to_rgba().unwrap();
    assert_eq!(img.dimensions(), (180, 600));
    for (x, y) in [(90, 70), (90, 200), (5, 5), (175, 595)] {
        let p = px(&img, x, y);
        assert!(p[0] >= 250 && p[1] <= 2 && p[2] <= 2, "({x},{y}) = {p:?}");
        assert!((178..=180).contains(&p[3]), "({x},{y}) = {p:?}");
    }
    assert_eq!(count_px(&img, 0..180, 0..600, |p| p == green), 0);
}

#[test]
fn stamps_clamp_to_the_inset_box() {
    let s = EmojiStamp::new("\u{1f600}", -50.0, 9999.0);
    assert_eq!(s.clamped(180.0, 600.0), Point::new(12.0, 588.0));
    let inside = EmojiStamp::new("a", 40.0, 41.0);
    assert_eq!(inside.clamped(180.0, 600.0), Point::new(40.0, 41.0));
    let nan = EmojiStamp::new("a", f64::NAN, 20.0);
    assert_eq!(nan.clamped(180.0, 600.0).x, 12.0);
}
