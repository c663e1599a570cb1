use glass_logo::postprocess::{BloomParams, OutlineParams, PostSelection, Slot, ping_pong_plan};

#[test]
fn should_blit_without_passes() {
    assert_eq!(ping_pong_plan(0), vec![(Slot::A, Slot::Surface)]);
}

#[test]
fn should_write_single_pass_to_surface() {
    assert_eq!(ping_pong_plan(1), vec![(Slot::A, Slot::Surface)]);
}

#[test]
fn should_alternate_targets() {
    assert_eq!(
        ping_pong_plan(3),
        vec![(Slot::A, Slot::B), (Slot::B, Slot::A), (Slot::A, Slot::Surface)]
    );
}

#[test]
fn should_read_what_the_previous_step_wrote() {
    for n in 1..8 {
        let plan = ping_pong_plan(n);
        assert_eq!(plan.len(), n);
        assert_eq!(plan[0].0, Slot::A);
        assert_eq!(plan[n - 1].1, Slot::Surface);
        for pair in plan.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
            assert_ne!(pair[1].0, pair[1].1);
        }
    }
}

#[test]
fn should_default_to_outline_and_fxaa() {
    let selection = PostSelection::default();
    assert!(selection.outline && selection.fxaa && !selection.bloom);
    let outline = OutlineParams::default();
    assert_eq!(outline.edge_strength, 1.5);
    assert_eq!(outline.edge_glow, 0.0);
    assert!(outline.radius_px() >= 1.0);
    let bloom = BloomParams::default();
    assert!(bloom.threshold > 0.0 && bloom.threshold < 1.0);
}
