use super::*;

#[test]
fn kind_serde_uses_kebab_case_and_tolerates_unknown() {
    assert_eq!(
        serde_json::to_string(&TemplateKind::PatternStars).unwrap(),
        r#""pattern-stars""#
    );
    let k: TemplateKind = serde_json::from_str(r#""canvas-texture""#).unwrap();
    assert_eq!(k, TemplateKind::CanvasTexture);
    let k: TemplateKind = serde_json::from_str(r#""holographic""#).unwrap();
    assert_eq!(k, TemplateKind::Unknown);
    for kind in TemplateKind::ALL {
        let s = serde_json::to_string(&kind).unwrap();
        assert_eq!(s, format!("\"{}\"", kind.as_str()));
    }
}

#[test]
fn color_spec_accepts_all_three_json_forms() {
    let solid: ColorSpec = serde_json::from_str(r##""#000000""##).unwrap();
    assert_eq!(solid, ColorSpec::Solid(Rgba8::BLACK));

    let grad: ColorSpec = serde_json::from_str(r##"["#ff9a9e", "#fad0c4"]"##).unwrap();
    assert_eq!(
        grad,
        ColorSpec::Gradient([Rgba8::rgb(0xff, 0x9a, 0x9e), Rgba8::rgb(0xfa, 0xd0, 0xc4)])
    );

    let img: ColorSpec =
        serde_json::from_str(r#"{ "src": "/t/a.png", "eight": "/t/a8.png" }"#).unwrap();
    let ColorSpec::Image(refs) = img else {
        panic!("expected image refs");
    };
    assert_eq!(refs.for_capacity(StripCapacity::Four), Some("/t/a.png"));
    assert_eq!(refs.for_capacity(StripCapacity::Eight), Some("/t/a8.png"));
}

#[test]
fn image_refs_with_nothing_usable_resolve_to_none() {
    let refs = ImageRefs {
        src: None,
        four: Some(String::new()),
        eight: None,
    };
    assert_eq!(refs.for_capacity(StripCapacity::Four), None);
}

#[test]
fn darkness_follows_luminance_of_any_stop() {
    assert!(Template::solid("black", "Black", TemplateKind::Solid, "#000000").is_dark());
    assert!(!Template::solid("white", "White", TemplateKind::Solid, "#ffffff").is_dark());
    assert!(Template::gradient("g", "G", "#ffffff", "#101010").is_dark());
    assert!(!Template::gradient("g", "G", "#a1c4fd", "#c2e9fb").is_dark());
}

#[test]
fn template_json_round_trips() {
    let t = Template::gradient("gradient1", "Sunset", "#ff9a9e", "#fad0c4");
    let s = serde_json::to_string(&t).unwrap();
    let back: Template = serde_json::from_str(&s).unwrap();
    assert_eq!(back, t);
}
