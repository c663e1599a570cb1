use std::f32::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use glass_logo::motion::{
    ANGULAR_RANGE, LERP_FACTOR, ModelMotion, PointerState, REST_ROTATION, TargetRotation, lerp,
};
use proptest::prelude::*;

#[test]
fn should_start_in_resting_pose() {
    let motion = ModelMotion::new();
    assert_eq!(motion.rotation, REST_ROTATION);
    assert_relative_eq!(motion.rotation.x, FRAC_PI_2);
    assert_relative_eq!(motion.factor, 0.035);
}

#[test]
fn should_map_unset_pointer_to_rest() {
    let target = TargetRotation::from_pointer(PointerState::default(), (800.0, 600.0));
    assert_relative_eq!(target.x, FRAC_PI_2);
    assert_relative_eq!(target.y, 0.0);
}

#[test]
fn should_map_horizontal_centre_to_no_turn() {
    let pointer = PointerState { x: 400.0, y: 10.0 };
    let target = TargetRotation::from_pointer(pointer, (800.0, 600.0));
    assert_relative_eq!(target.y, 0.0, epsilon = 1e-6);
}

#[test]
fn should_map_pointer_edges_to_angular_range() {
    let viewport = (800.0, 600.0);
    let bottom_right = TargetRotation::from_pointer(PointerState { x: 800.0, y: 600.0 }, viewport);
    assert_relative_eq!(bottom_right.x, FRAC_PI_2 + ANGULAR_RANGE * FRAC_PI_2, epsilon = 1e-6);
    assert_relative_eq!(bottom_right.y, ANGULAR_RANGE * FRAC_PI_2, epsilon = 1e-6);

    let mid = TargetRotation::from_pointer(PointerState { x: 200.0, y: 150.0 }, viewport);
    assert_relative_eq!(mid.x, 0.1 * ((150.0 / 600.0) * PI - FRAC_PI_2) + FRAC_PI_2, epsilon = 1e-6);
    assert_relative_eq!(mid.y, 0.1 * ((200.0 / 800.0) * PI - FRAC_PI_2), epsilon = 1e-6);
}

#[test]
fn should_ease_one_step_towards_target() {
    let mut motion = ModelMotion::new();
    let target = TargetRotation { x: 2.0, y: 0.3 };
    let before = motion.rotation;

    let after = motion.step(target);

    assert_relative_eq!(after.x, before.x + LERP_FACTOR * (2.0 - before.x));
    assert_relative_eq!(after.y, 0.0);
    assert_relative_eq!(after.z, LERP_FACTOR * -0.3);
}

#[test]
fn should_converge_when_target_is_held() {
    let mut motion = ModelMotion::new();
    let target = TargetRotation { x: 1.2, y: -0.15 };
    for _ in 0..1000 {
        motion.step(target);
    }
    assert_relative_eq!(motion.rotation.x, 1.2, epsilon = 1e-4);
    assert_relative_eq!(motion.rotation.y, 0.0, epsilon = 1e-4);
    assert_relative_eq!(motion.rotation.z, 0.15, epsilon = 1e-4);
}

proptest! {
    #[test]
    fn lerp_matches_definition(a in -10f32..10.0, b in -10f32..10.0, t in 0f32..1.0) {
        let expected = a + t * (b - a);
        prop_assert!((lerp(a, b, t) - expected).abs() < 1e-5);
    }

    #[test]
    fn step_never_overshoots(x in -PI..PI, y in -PI..PI) {
        let mut motion = ModelMotion::new();
        let target = TargetRotation { x, y };
        let start = motion.rotation.x;
        let after = motion.step(target);
        prop_assert!((after.x - x).abs() <= (start - x).abs() + 1e-6);
    }

    #[test]
    fn target_stays_within_angular_range(
        px in 1f64..2000.0,
        py in 1f64..2000.0,
    ) {
        let target = TargetRotation::from_pointer(PointerState { x: px, y: py }, (2000.0, 2000.0));
        let limit = ANGULAR_RANGE * FRAC_PI_2 + 1e-5;
        prop_assert!((target.x - FRAC_PI_2).abs() <= limit);
        prop_assert!(target.y.abs() <= limit);
    }
}
