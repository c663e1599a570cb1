use approx::assert_relative_eq;
use glass_logo::viewport::ResizePolicy;
use proptest::prelude::*;

#[test]
fn should_ignore_narrow_pages() {
    let policy = ResizePolicy::default();
    assert!(policy.resolve(850.0, 900.0, Some(3.0)).is_none());
    assert!(policy.resolve(400.0, 900.0, None).is_none());
    assert!(!policy.is_enabled_for(850.0));
    assert!(policy.is_enabled_for(851.0));
}

#[test]
fn should_size_canvas_to_half_page() {
    let policy = ResizePolicy::default();
    let update = policy.resolve(1600.0, 900.0, Some(3.0)).unwrap();
    assert_eq!(update.surface_width, 800);
    assert_eq!(update.surface_height, 900);
    assert_relative_eq!(update.aspect, 800.0 / 900.0);
    assert_eq!(update.camera_z, Some(3.0));
}

#[test]
fn should_pull_camera_back_on_compact_pages() {
    let policy = ResizePolicy::default();
    let update = policy.resolve(1000.0, 900.0, Some(3.0)).unwrap();
    assert_eq!(update.camera_z, Some(8.0));
    assert_relative_eq!(update.aspect, 500.0 / 900.0);

    let at_threshold = policy.resolve(1100.0, 900.0, Some(3.0)).unwrap();
    assert_eq!(at_threshold.camera_z, Some(3.0));
}

#[test]
fn should_keep_camera_before_model_is_fitted() {
    let policy = ResizePolicy::default();
    let update = policy.resolve(1000.0, 900.0, None).unwrap();
    assert_eq!(update.camera_z, None);
}

#[test]
fn should_treat_window_as_half_page() {
    let policy = ResizePolicy::default();
    assert_relative_eq!(policy.page_width_for_canvas(640.0), 1280.0);
}

proptest! {
    #[test]
    fn aspect_is_half_page_over_height(w in 851f32..5000.0, h in 1f32..5000.0) {
        let policy = ResizePolicy::default();
        let update = policy.resolve(w, h, None).unwrap();
        prop_assert!((update.aspect - (w / 2.0) / h).abs() < 1e-4);
    }
}
