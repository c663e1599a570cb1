use approx::assert_relative_eq;
use glass_logo::background::{
    BACKGROUND_Z, BACKGROUNDS, BackgroundImage, BackgroundParams, ImageSource, frustum_height,
    plane_geometry, plane_size,
};

#[test]
fn should_list_catalog_in_order() {
    let names: Vec<_> = BACKGROUNDS.iter().map(|image| image.name).collect();
    assert_eq!(
        names,
        [
            "skyline",
            "grid-1",
            "grid-2",
            "astro-layers",
            "astro-rays",
            "studiocms-blobs",
            "studiocms-blobs-light",
            "studiocms-curves",
            "studiocms-curves-light",
            "custom",
        ]
    );
}

#[test]
fn should_locate_catalog_images() {
    let params = BackgroundParams::default();
    let grid = BackgroundImage::find("grid-1").unwrap();
    assert_eq!(grid.location(&params), "grid-1.png");
    assert_eq!(grid.format_hint(), Some("png"));

    let custom = BackgroundImage::find("custom").unwrap();
    assert_eq!(custom.source, ImageSource::Web);
    assert_eq!(custom.location(&params), params.custom_image_href);
    assert_eq!(custom.format_hint(), None);

    assert!(BackgroundImage::find("nope").is_none());
}

#[test]
fn should_fall_back_to_first_entry() {
    let params = BackgroundParams {
        background: "unknown".to_string(),
        ..Default::default()
    };
    assert_eq!(params.selected(), BACKGROUNDS[0]);
}

#[test]
fn should_cover_frustum_from_camera_at_origin() {
    let height = frustum_height(75.0, 0.0, BACKGROUND_Z);
    let expected = 9.0 * (37.5f32).to_radians().tan() * 5.0;
    assert_relative_eq!(height, expected, epsilon = 1e-4);
}

#[test]
fn should_keep_image_aspect() {
    let (w, h) = plane_size(10.0, (1920, 1080));
    assert_relative_eq!(h, 10.0);
    assert_relative_eq!(w, 10.0 * 1920.0 / 1080.0);
}

#[test]
fn should_build_centred_quad() {
    let (vertices, indices) = plane_geometry(4.0, 2.0);
    assert_eq!(indices.len(), 6);
    let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
    let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
    assert_relative_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 2.0);
    assert_relative_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -2.0);
    assert_relative_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 1.0);
    assert!(vertices.iter().all(|v| v.position[2] == 0.0 && v.normal == [0.0, 0.0, 1.0]));
}
