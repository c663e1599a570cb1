//! Pointer-follow motion of the logo.
//!
//! The pointer position inside the viewport is mapped to a target rotation in a
//! narrow angular range around the resting pose, and every frame the current
//! rotation moves a fixed fraction of the remaining way towards it. There is no
//! velocity state: repeated lerping alone produces the easing.

use std::f32::consts::{FRAC_PI_2, PI};

use crate::data_structures::instance::EulerXyz;

/// Fraction of the remaining distance covered per frame.
pub const LERP_FACTOR: f32 = 0.035;

/// Share of the half turn the pointer can sweep across the viewport.
pub const ANGULAR_RANGE: f32 = 0.1;

/// The resting pose of a freshly loaded logo: stood up around the x axis.
pub const REST_ROTATION: EulerXyz = EulerXyz {
    x: FRAC_PI_2,
    y: 0.0,
    z: 0.0,
};

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + t * (to - from)
}

/// Last known pointer position in physical pixels of the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f64,
    pub y: f64,
}

/// Rotation the model eases towards for a pointer position.
///
/// A coordinate of exactly zero means "no pointer seen yet" and maps to the
/// resting pose on that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRotation {
    /// Tilt around x, driven by the vertical pointer position.
    pub x: f32,
    /// Turn driven by the horizontal pointer position; applied around z.
    pub y: f32,
}

impl TargetRotation {
    pub fn from_pointer(pointer: PointerState, viewport: (f32, f32)) -> Self {
        let (width, height) = (viewport.0.max(1.0), viewport.1.max(1.0));
        let x = if pointer.y == 0.0 {
            FRAC_PI_2
        } else {
            ANGULAR_RANGE * ((pointer.y as f32 / height) * PI - FRAC_PI_2) + FRAC_PI_2
        };
        let y = if pointer.x == 0.0 {
            0.0
        } else {
            ANGULAR_RANGE * ((pointer.x as f32 / width) * PI - FRAC_PI_2)
        };
        Self { x, y }
    }
}

/// Per-frame rotation update of the loaded model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelMotion {
    pub rotation: EulerXyz,
    pub factor: f32,
}

impl ModelMotion {
    pub fn new() -> Self {
        Self {
            rotation: REST_ROTATION,
            factor: LERP_FACTOR,
        }
    }

    /// Move one easing step towards `target` and return the new rotation.
    pub fn step(&mut self, target: TargetRotation) -> EulerXyz {
        self.rotation.x = lerp(self.rotation.x, target.x, self.factor);
        self.rotation.y = lerp(self.rotation.y, 0.0, self.factor);
        self.rotation.z = lerp(self.rotation.z, -target.y, self.factor);
        self.rotation
    }
}

impl Default for ModelMotion {
    fn default() -> Self {
        Self::new()
    }
}
