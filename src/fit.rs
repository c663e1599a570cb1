//! Viewport fitting: place the camera so a model fills the frame.
//!
//! The model hierarchy is recentred on the origin, then the camera is pulled
//! back along +z until the largest side of the bounding box fits into the
//! vertical field of view, with a fixed margin.

use cgmath::{Angle, EuclideanSpace, Point3};

use crate::{
    camera::{Camera, Projection},
    data_structures::{bounds::Aabb, scene_graph::SceneNode},
};

/// Multiplier on the exact fitting distance.
pub const FIT_MARGIN: f32 = 2.5;

/// Camera placement derived from a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFit {
    pub depth: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl ViewportFit {
    /// Placement for a box that is already centred on the origin.
    pub fn for_bounds(bounds: &Aabb, projection: &Projection) -> Self {
        let half_fov = projection.fovy / 2.0;
        let depth = (FIT_MARGIN * (bounds.max_dimension() / 2.0) / half_fov.tan()).abs();
        let min_z = bounds.min.z;
        let camera_to_far_edge = if min_z < 0.0 {
            -min_z + depth
        } else {
            depth - min_z
        };
        Self {
            depth,
            znear: depth / 100.0,
            zfar: camera_to_far_edge * 3.0,
        }
    }

    pub fn apply(&self, camera: &mut Camera, projection: &mut Projection) {
        camera.position.z = self.depth;
        camera.look_at(Point3::new(0.0, 0.0, 0.0));
        projection.znear = self.znear;
        projection.zfar = self.zfar;
    }
}

/// Recentre `node` on the origin and fit the camera to it.
///
/// Returns the computed camera depth, or `None` when the hierarchy has no
/// finite geometry or collapses to a point (the camera is left untouched then).
pub fn fit_model_to_viewport(
    node: &mut dyn SceneNode,
    camera: &mut Camera,
    projection: &mut Projection,
) -> Option<f32> {
    node.update_world_transform_all();
    let bounds = node
        .get_world_bounds()
        .filter(|bounds| bounds.is_finite() && bounds.max_dimension() > 0.0)?;
    let center = bounds.center();

    node.get_local_transform_mut().position -= center.to_vec();
    node.update_world_transform_all();

    let recentred = Aabb::new(
        Point3::from_vec(bounds.min - center),
        Point3::from_vec(bounds.max - center),
    );
    let fit = ViewportFit::for_bounds(&recentred, projection);
    fit.apply(camera, projection);
    log::info!(
        "Fitted model of size {:?}: camera z {:.3}, near {:.4}, far {:.3}",
        bounds.size(),
        fit.depth,
        fit.znear,
        fit.zfar
    );
    Some(fit.depth)
}
