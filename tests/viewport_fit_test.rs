use approx::assert_relative_eq;
use cgmath::{Deg, Point3, Vector3};
use glass_logo::{
    camera::{Camera, Projection},
    data_structures::{bounds::Aabb, scene_graph::SceneNode},
    fit::{FIT_MARGIN, ViewportFit, fit_model_to_viewport},
};
use proptest::prelude::*;

mod common;

use common::test_utils::BoxNode;

fn camera_at_origin() -> (Camera, Projection) {
    let camera = Camera::new([0.0, 0.0, 0.0]);
    let projection = Projection::new(640, 800, Deg(75.0), 0.01, 10000.0);
    (camera, projection)
}

#[test]
fn should_centre_unit_cube_and_pull_camera_back() {
    let mut node = BoxNode::cube(Vector3::new(5.0, 5.0, 5.0), 1.0);
    let (mut camera, mut projection) = camera_at_origin();

    let depth = fit_model_to_viewport(&mut node, &mut camera, &mut projection)
        .expect("a cube has bounds");

    let expected = 2.5 * 0.5 / (37.5f32).to_radians().tan();
    assert_relative_eq!(depth, expected, epsilon = 1e-4);
    assert_relative_eq!(depth, 1.629, epsilon = 1e-3);
    assert_relative_eq!(camera.position.z, depth);

    let centre = node.get_world_bounds().unwrap().center();
    assert_relative_eq!(centre.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(centre.y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(centre.z, 0.0, epsilon = 1e-5);
}

#[test]
fn should_derive_clip_planes_from_depth() {
    let mut node = BoxNode::cube(Vector3::new(5.0, 5.0, 5.0), 1.0);
    let (mut camera, mut projection) = camera_at_origin();

    let depth = fit_model_to_viewport(&mut node, &mut camera, &mut projection).unwrap();

    assert_relative_eq!(projection.znear, depth / 100.0);
    // far face of the recentred cube is at z = -0.5
    assert_relative_eq!(projection.zfar, 3.0 * (depth + 0.5), epsilon = 1e-5);
    assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));
}

#[test]
fn should_leave_camera_untouched_without_bounds() {
    let mut node = BoxNode::empty();
    let (mut camera, mut projection) = camera_at_origin();

    assert!(fit_model_to_viewport(&mut node, &mut camera, &mut projection).is_none());
    assert_eq!(camera.position, Point3::new(0.0, 0.0, 0.0));
    assert_relative_eq!(projection.znear, 0.01);
    assert_relative_eq!(projection.zfar, 10000.0);
}

#[test]
fn should_leave_camera_untouched_for_point_bounds() {
    let mut node = BoxNode::cube(Vector3::new(1.0, 2.0, 3.0), 0.0);
    let (mut camera, mut projection) = camera_at_origin();

    assert!(fit_model_to_viewport(&mut node, &mut camera, &mut projection).is_none());
    assert_eq!(camera.position, Point3::new(0.0, 0.0, 0.0));
    assert_relative_eq!(projection.znear, 0.01);
    assert_relative_eq!(projection.zfar, 10000.0);
}

#[test]
fn should_include_children_in_bounds() {
    let mut root = BoxNode::empty();
    root.add_child(Box::new(BoxNode::cube(Vector3::new(-2.0, 0.0, 0.0), 1.0)));
    root.add_child(Box::new(BoxNode::cube(Vector3::new(2.0, 0.0, 0.0), 1.0)));
    let (mut camera, mut projection) = camera_at_origin();

    let depth = fit_model_to_viewport(&mut root, &mut camera, &mut projection).unwrap();

    // the two cubes span 5 units along x
    let expected = FIT_MARGIN * 2.5 / (37.5f32).to_radians().tan();
    assert_relative_eq!(depth, expected, epsilon = 1e-4);
}

proptest! {
    #[test]
    fn fit_depth_scales_with_largest_side(
        sx in 0.01f32..100.0,
        sy in 0.01f32..100.0,
        sz in 0.01f32..100.0,
    ) {
        let bounds = Aabb::new(
            Point3::new(-sx / 2.0, -sy / 2.0, -sz / 2.0),
            Point3::new(sx / 2.0, sy / 2.0, sz / 2.0),
        );
        let projection = Projection::new(640, 800, Deg(75.0), 0.01, 10000.0);
        let fit = ViewportFit::for_bounds(&bounds, &projection);
        let largest = sx.max(sy).max(sz);
        let expected = FIT_MARGIN * (largest / 2.0) / (37.5f32).to_radians().tan();
        prop_assert!((fit.depth - expected).abs() <= expected * 1e-4);
        prop_assert!(fit.znear < fit.depth);
        prop_assert!(fit.zfar > fit.depth);
    }

    #[test]
    fn fit_recentres_anywhere(x in -1000f32..1000.0, y in -1000f32..1000.0, z in -1000f32..1000.0) {
        let mut node = BoxNode::cube(Vector3::new(x, y, z), 2.0);
        let (mut camera, mut projection) = camera_at_origin();
        fit_model_to_viewport(&mut node, &mut camera, &mut projection).unwrap();
        let centre = node.get_world_bounds().unwrap().center();
        prop_assert!(centre.x.abs() < 1e-2);
        prop_assert!(centre.y.abs() < 1e-2);
        prop_assert!(centre.z.abs() < 1e-2);
    }
}
