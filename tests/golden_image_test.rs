#[cfg(feature = "integration-tests")]
mod common;

/// With nothing loaded, every pass of the chain keeps a flat clear colour.
#[test]
#[cfg(feature = "integration-tests")]
fn should_present_clear_colour_through_post_chain() {
    use crate::common::test_utils::TestRender;
    use glass_logo::{LogoConfig, color::Rgb, flow::ImageTestResult};

    let mut config = LogoConfig::default();
    config.clear_colour = Rgb::from_u32(0x101010);
    config.post.bloom = true;

    golden_image_test!(
        TestRender {
            setup: Box::new(|ctx| {
                log::info!("Post chain: {:?}", ctx.post.describe());
            }),
            validate: Box::new(|ctx, state, texture| {
                if state.frame() == 0 {
                    return Ok(ImageTestResult::Waiting);
                }
                let width = ctx.config.width;
                for (x, y, pixel) in texture.enumerate_pixels() {
                    if x >= width {
                        continue;
                    }
                    for channel in &pixel.0[..3] {
                        assert!(
                            channel.abs_diff(0x10) <= 2,
                            "pixel {:?} at ({}, {}) is not #101010",
                            pixel,
                            x,
                            y
                        );
                    }
                }
                Ok(ImageTestResult::Passed)
            }),
        },
        config
    );
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_present_without_any_pass() {
    use crate::common::test_utils::TestRender;
    use glass_logo::{
        LogoConfig,
        color::Rgb,
        flow::ImageTestResult,
        postprocess::PostSelection,
    };

    let mut config = LogoConfig::default();
    config.clear_colour = Rgb::WHITE;
    config.post = PostSelection {
        outline: false,
        bloom: false,
        fxaa: false,
    };

    golden_image_test!(
        TestRender {
            setup: Box::new(|ctx| assert!(ctx.post.describe().is_empty())),
            validate: Box::new(|ctx, state, texture| {
                if state.frame() == 0 {
                    return Ok(ImageTestResult::Waiting);
                }
                let width = ctx.config.width;
                for (x, _, pixel) in texture.enumerate_pixels() {
                    if x < width {
                        assert_eq!(&pixel.0[..3], &[255, 255, 255]);
                    }
                }
                Ok(ImageTestResult::Passed)
            }),
        },
        config
    );
}

/// Glass material goes onto every mesh of the hierarchy, again on every rebuild.
#[test]
#[cfg(feature = "integration-tests")]
fn should_apply_glass_material_to_every_mesh() {
    use crate::common::test_utils::{BoxNode, TestRender};
    use glass_logo::{
        LogoConfig,
        data_structures::{
            model::{Model, ModelVertex},
            scene_graph::{SceneNode, mk_mesh},
        },
        flow::ImageTestResult,
        material::{GlassParams, apply_glass_material},
    };

    golden_image_test!(
        TestRender {
            setup: Box::new(|ctx| {
                let vertices = [
                    ModelVertex {
                        position: [0.0, 0.0, 0.0],
                        ..Default::default()
                    },
                    ModelVertex {
                        position: [1.0, 0.0, 0.0],
                        ..Default::default()
                    },
                    ModelVertex {
                        position: [0.0, 1.0, 0.0],
                        ..Default::default()
                    },
                ];
                let mesh = |name| mk_mesh(&ctx.device, name, &vertices, &[0, 1, 2]);
                let mut root = BoxNode::empty().with_model(Model {
                    meshes: vec![mesh("a"), mesh("b")],
                });
                root.add_child(Box::new(BoxNode::empty().with_model(Model {
                    meshes: vec![mesh("c")],
                })));

                let mut params = GlassParams::default();
                let applied =
                    apply_glass_material(&mut root, &params, &ctx.device, &ctx.layouts.material);
                assert_eq!(applied, 3);

                params.roughness = 0.9;
                let rebuilt =
                    apply_glass_material(&mut root, &params, &ctx.device, &ctx.layouts.material);
                assert_eq!(rebuilt, applied);

                let mut without_material = 0;
                root.traverse_models_mut(&mut |model| {
                    without_material += model.meshes.iter().filter(|m| m.material.is_none()).count();
                });
                assert_eq!(without_material, 0);
            }),
            validate: Box::new(|_, _, _| Ok(ImageTestResult::Passed)),
        },
        LogoConfig::default()
    );
}
