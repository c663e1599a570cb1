use approx::assert_relative_eq;
use cgmath::{Deg, Quaternion, Rotation3, Vector3};
use glass_logo::{
    data_structures::scene_graph::{SceneNode, scene_root},
    motion::REST_ROTATION,
};

mod common;

use common::test_utils::BoxNode;

fn assert_quat_eq(a: Quaternion<f32>, b: Quaternion<f32>) {
    // q and -q describe the same rotation
    let sign = if a.s * b.s + a.v.x * b.v.x + a.v.y * b.v.y + a.v.z * b.v.z < 0.0 {
        -1.0
    } else {
        1.0
    };
    assert_relative_eq!(a.s, sign * b.s, epsilon = 1e-5);
    assert_relative_eq!(a.v.x, sign * b.v.x, epsilon = 1e-5);
    assert_relative_eq!(a.v.y, sign * b.v.y, epsilon = 1e-5);
    assert_relative_eq!(a.v.z, sign * b.v.z, epsilon = 1e-5);
}

fn rotated_cube() -> BoxNode {
    let mut node = BoxNode::cube(Vector3::new(0.0, 0.0, 0.0), 1.0);
    node.get_local_transform_mut().rotation = Quaternion::from_angle_y(Deg(90.0));
    node
}

#[test]
fn should_wrap_a_single_root() {
    let root = scene_root(vec![Box::new(rotated_cube())]);

    assert_eq!(root.get_children().len(), 1);
    assert_quat_eq(root.get_local_transform().rotation, Quaternion::new(1.0, 0.0, 0.0, 0.0));
}

#[test]
fn should_keep_the_authored_root_rotation_under_the_pose() {
    let mut root = scene_root(vec![Box::new(rotated_cube())]);

    root.get_local_transform_mut().rotation = REST_ROTATION.to_quaternion();
    root.update_world_transform_all();

    let child = &root.get_children()[0];
    assert_quat_eq(child.get_local_transform().rotation, Quaternion::from_angle_y(Deg(90.0)));
    assert_quat_eq(
        child.get_world_transform().rotation,
        Quaternion::from_angle_x(Deg(90.0)) * Quaternion::from_angle_y(Deg(90.0)),
    );
}

#[test]
fn should_group_several_roots() {
    let root = scene_root(vec![
        Box::new(BoxNode::cube(Vector3::new(-1.0, 0.0, 0.0), 1.0)),
        Box::new(BoxNode::cube(Vector3::new(1.0, 0.0, 0.0), 1.0)),
    ]);

    assert_eq!(root.get_children().len(), 2);
    assert!(root.get_local_bounds().is_none());
}
