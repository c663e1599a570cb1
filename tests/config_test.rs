use glass_logo::{LogoConfig, color::Rgb};

#[test]
fn should_default_from_empty_object() {
    let config = LogoConfig::from_json("{}").unwrap();
    assert_eq!(config, LogoConfig::default());
    assert_eq!(config.model, "studiocms-logo.glb");
    assert_eq!(config.fov, 75.0);
    assert_eq!(config.clear_colour, Rgb::from_u32(0x101010));
    assert_eq!(config.ambient, Rgb::from_u32(0x606060));
    assert!(config.post.outline);
    assert!(!config.post.bloom);
    assert!(config.post.fxaa);
    assert!(config.track_pointer);
    assert!(!config.panel);
}

#[test]
fn should_override_nested_fields_only() {
    let config = LogoConfig::from_json(
        r##"{
            "assetBase": "https://cdn.example.com/logo/",
            "clearColour": "#000000",
            "post": { "bloom": true },
            "glass": { "roughness": 0.2 },
            "outline": { "visibleEdgeColor": "#ffffff", "edgeGlow": 3.0 },
            "background": { "background": "grid-2" },
            "resize": { "minPageWidth": 700 },
            "panel": true
        }"##,
    )
    .unwrap();

    assert_eq!(config.asset_base.as_deref(), Some("https://cdn.example.com/logo/"));
    assert_eq!(config.clear_colour, Rgb::from_u32(0));
    assert!(config.post.bloom);
    assert!(config.post.outline);
    assert_eq!(config.glass.roughness, 0.2);
    assert_eq!(config.glass.transmission, 1.0);
    assert_eq!(config.outline.visible_edge_color, Rgb::WHITE);
    assert_eq!(config.outline.edge_glow, 3.0);
    assert_eq!(config.outline.edge_strength, 1.5);
    assert_eq!(config.background.background, "grid-2");
    assert_eq!(config.resize.min_page_width, 700.0);
    assert_eq!(config.resize.compact_page_width, 1100.0);
    assert!(config.panel);
}

#[test]
fn should_reject_invalid_json() {
    assert!(LogoConfig::from_json("{ \"fov\": \"wide\" }").is_err());
    assert!(LogoConfig::from_json("not json").is_err());
    assert!(LogoConfig::from_json("{ \"clearColour\": \"#12\" }").is_err());
}

#[test]
fn should_fall_back_to_defaults_for_missing_file() {
    let config = futures::executor::block_on(LogoConfig::load("does-not-exist.json"));
    assert_eq!(config, LogoConfig::default());
}
