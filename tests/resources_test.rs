use std::path::PathBuf;

use glass_logo::resources::texture::{AssetLocation, is_remote, resolve_location};

#[test]
fn should_keep_absolute_urls() {
    let location = resolve_location("https://images.example.com/a.jpg", Some("somewhere")).unwrap();
    assert_eq!(location, AssetLocation::Url("https://images.example.com/a.jpg".to_string()));
    assert!(is_remote("http://localhost/x.png"));
    assert!(!is_remote("grid-1.png"));
}

#[test]
fn should_join_remote_base() {
    let location = resolve_location("skyline.png", Some("https://cdn.example.com/logo")).unwrap();
    assert_eq!(
        location,
        AssetLocation::Url("https://cdn.example.com/logo/skyline.png".to_string())
    );
    let trailing = resolve_location("skyline.png", Some("https://cdn.example.com/logo/")).unwrap();
    assert_eq!(location, trailing);
}

#[test]
fn should_join_local_base() {
    let location = resolve_location("studiocms-logo.glb", Some("/srv/assets")).unwrap();
    assert_eq!(
        location,
        AssetLocation::Path(PathBuf::from("/srv/assets/studiocms-logo.glb"))
    );
}

#[test]
fn should_default_to_assets_directory() {
    let location = resolve_location("studiocms-logo.glb", None).unwrap();
    assert_eq!(
        location,
        AssetLocation::Path(PathBuf::from("./assets/studiocms-logo.glb"))
    );
}

#[test]
fn should_report_missing_files() {
    let result = futures::executor::block_on(glass_logo::resources::load_binary(
        "missing.glb",
        Some("/definitely/not/here"),
    ));
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("missing.glb"), "{}", message);
}
