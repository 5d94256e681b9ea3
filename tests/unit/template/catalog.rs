use super::*;
use crate::foundation::color::Rgba8;

#[test]
fn builtin_catalog_has_twenty_unique_entries_in_order() {
    let cat = TemplateCatalog::builtin();
    assert_eq!(cat.len(), 20);
    let ids: Vec<&str> = cat.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.first(), Some(&"white"));
    assert_eq!(ids.last(), Some(&"dots-border"));
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 20);
    cat.validate().unwrap();
}

#[test]
fn lookup_by_id() {
    let cat = TemplateCatalog::builtin();
    let sunset = cat.get("gradient1").unwrap();
    assert_eq!(sunset.label, "Sunset");
    assert_eq!(sunset.kind, TemplateKind::Gradient);
    assert_eq!(
        cat.get("black").unwrap().color,
        ColorSpec::Solid(Rgba8::BLACK)
    );
    assert_eq!(cat.get("dots").unwrap().kind, TemplateKind::Dotted);
    assert!(cat.get("nope").is_none());
    assert_eq!(cat.default_template().id, DEFAULT_TEMPLATE_ID);
}

#[test]
fn only_black_is_dark_in_the_builtin_set() {
    let dark: Vec<_> = TemplateCatalog::builtin()
        .iter()
        .filter(|t| t.is_dark())
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(dark, vec!["black".to_owned()]);
}

#[test]
fn json_catalog_loads_image_and_unknown_kinds() {
    let json = r##"[
        { "id": "floral", "label": "Floral", "kind": "image",
          "color": { "src": "/templates/floral.png", "four": "/templates/floral-4.png" } },
        { "id": "neon", "label": "Neon", "kind": "neon-glow", "color": "#00ff00" }
    ]"##;
    let cat = TemplateCatalog::from_json_str(json).unwrap();
    assert_eq!(cat.len(), 2);
    assert_eq!(cat.get("neon").unwrap().kind, TemplateKind::Unknown);
    // no "white" entry: the first template is the default
    assert_eq!(cat.default_template().id, "floral");
}

#[test]
fn json_catalog_rejects_inconsistent_entries() {
    let dup = r##"[
        { "id": "a", "label": "A", "kind": "solid", "color": "#ffffff" },
        { "id": "a", "label": "B", "kind": "solid", "color": "#000000" }
    ]"##;
    assert!(matches!(
        TemplateCatalog::from_json_str(dup),
        Err(StripError::Validation(_))
    ));

    let bad_gradient = r##"[{ "id": "g", "label": "G", "kind": "gradient", "color": "#ffffff" }]"##;
    assert!(TemplateCatalog::from_json_str(bad_gradient).is_err());

    assert!(matches!(
        TemplateCatalog::from_json_str("[]"),
        Err(StripError::Validation(_))
    ));
    assert!(matches!(
        TemplateCatalog::from_json_str("{"),
        Err(StripError::Serde(_))
    ));
}

#[test]
fn json_catalog_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("templates.json");
    let json =
        serde_json::to_string(&TemplateCatalog::builtin().iter().collect::<Vec<_>>()).unwrap();
    std::fs::write(&path, json).unwrap();
    let cat = TemplateCatalog::from_json_file(&path).unwrap();
    assert_eq!(cat, TemplateCatalog::builtin());
}

#[test]
fn empty_catalog_still_has_a_default() {
    let cat = TemplateCatalog { templates: vec![] };
    let t = cat.default_template();
    assert_eq!(t.id, DEFAULT_TEMPLATE_ID);
    assert_eq!(t, &default_template());
}
