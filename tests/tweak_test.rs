use glass_logo::{
    postprocess::PassSetting,
    tweak::{Control, Effect, LogoParams, Pane, ParamKey, Value},
};

/// Run `frames` UI frames and return the changes and shape count of the last.
fn show(pane: &mut Pane, params: &LogoParams, frames: usize) -> (Vec<(ParamKey, Value)>, usize) {
    let ctx = egui::Context::default();
    let mut last = (Vec::new(), 0);
    for _ in 0..frames {
        let mut changes = Vec::new();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            changes = pane.show(ctx, params);
        });
        last = (changes, output.shapes.len());
    }
    last
}

#[test]
fn should_group_bindings_into_folders() {
    let pane = Pane::new(false);
    let titles: Vec<_> = pane.folders.iter().map(|f| f.title).collect();
    assert_eq!(
        titles,
        ["Background", "Frosted Glass Material", "Model Outline", "Bloom", "Site"]
    );
    assert_eq!(pane.title, "Dev Settings");
    let glow = pane.bindings().find(|b| b.key == ParamKey::EdgeGlow).unwrap();
    assert_eq!(glow.control, Control::Slider { min: 0.0, max: 25.0 });
    let href = pane.bindings().find(|b| b.key == ParamKey::CustomImageHref).unwrap();
    assert_eq!(href.control, Control::Text);
}

#[test]
fn should_draw_nothing_while_hidden() {
    let mut pane = Pane::new(false);
    let params = LogoParams::default();
    let (changes, shapes) = show(&mut pane, &params, 2);
    assert!(changes.is_empty());
    assert_eq!(shapes, 0);
}

#[test]
fn should_draw_window_once_toggled() {
    let mut pane = Pane::new(false);
    let params = LogoParams::default();
    pane.toggle();
    assert!(pane.visible);

    // the first frame only measures the window
    let (changes, shapes) = show(&mut pane, &params, 2);
    assert!(changes.is_empty());
    assert!(shapes > 0);
}

#[test]
fn should_seed_text_drafts_from_params() {
    let mut pane = Pane::new(true);
    let mut params = LogoParams::default();
    params.background.custom_image_href = "https://example.com/a.jpg".to_string();

    assert_eq!(
        pane.draft_mut(ParamKey::CustomImageHref, &params).as_str(),
        "https://example.com/a.jpg"
    );
    assert_eq!(pane.commit(ParamKey::CustomImageHref, &params), None);
}

#[test]
fn should_commit_edited_image_url() {
    let mut pane = Pane::new(true);
    let mut params = LogoParams::default();
    params.set(ParamKey::Background, Value::Text("custom".to_string()));

    *pane.draft_mut(ParamKey::CustomImageHref, &params) = " https://example.com/b.jpg ".to_string();
    let (key, value) = pane.commit(ParamKey::CustomImageHref, &params).unwrap();
    assert_eq!(key, ParamKey::CustomImageHref);
    assert_eq!(value, Value::Text("https://example.com/b.jpg".to_string()));

    assert_eq!(params.set(key, value), Effect::ReloadBackground);
    assert_eq!(params.background.custom_image_href, "https://example.com/b.jpg");
    assert_eq!(pane.commit(ParamKey::CustomImageHref, &params), None);
}

#[test]
fn should_not_commit_untouched_bindings() {
    let mut pane = Pane::new(true);
    let params = LogoParams::default();
    assert_eq!(pane.commit(ParamKey::CustomImageHref, &params), None);
}

#[test]
fn should_route_changes_to_their_target() {
    let mut params = LogoParams::default();

    match params.set(ParamKey::EdgeStrength, Value::Number(3.0)) {
        Effect::ConfigurePass(PassSetting::Outline(outline)) => assert_eq!(outline.edge_strength, 3.0),
        other => panic!("unexpected {:?}", other),
    }
    match params.set(ParamKey::BloomThreshold, Value::Number(0.5)) {
        Effect::ConfigurePass(PassSetting::Bloom(bloom)) => assert_eq!(bloom.threshold, 0.5),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        params.set(ParamKey::Transparent, Value::Bool(false)),
        Effect::RebuildMaterial
    );
    assert!(!params.glass.transparent);
    assert_eq!(
        params.set(ParamKey::LightMode, Value::Bool(true)),
        Effect::SetLightMode(true)
    );
}

#[test]
fn should_reload_custom_image_only_when_selected() {
    let mut params = LogoParams::default();
    let href = Value::Text("https://example.com/b.jpg".to_string());
    assert_eq!(params.set(ParamKey::CustomImageHref, href.clone()), Effect::None);
    assert_eq!(params.background.custom_image_href, "https://example.com/b.jpg");

    params.set(ParamKey::Background, Value::Text("custom".to_string()));
    assert_eq!(params.set(ParamKey::CustomImageHref, href), Effect::ReloadBackground);
}

#[test]
fn should_ignore_invalid_values() {
    let mut params = LogoParams::default();
    assert_eq!(
        params.set(ParamKey::Background, Value::Text("nope".to_string())),
        Effect::None
    );
    assert_eq!(params.background.background, "skyline");
    assert_eq!(params.set(ParamKey::Roughness, Value::Bool(true)), Effect::None);
    assert_eq!(params, LogoParams::default());
}

