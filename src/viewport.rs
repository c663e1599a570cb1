//! Page layout and the resize policy.
//!
//! The logo canvas fills half of the page next to the login form. Below a
//! minimum page width the canvas is hidden by the page and nothing 3D is set up
//! or touched; between that and a second threshold the logo is drawn smaller by
//! pulling the camera back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizePolicy {
    /// Page widths at or below this do not get a 3D logo at all.
    pub min_page_width: f32,
    /// Page widths below this use the pulled back camera.
    pub compact_page_width: f32,
    /// Extra camera depth in compact layouts.
    pub compact_depth_offset: f32,
    /// Share of the page width taken by the canvas.
    pub canvas_fraction: f32,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            min_page_width: 850.0,
            compact_page_width: 1100.0,
            compact_depth_offset: 5.0,
            canvas_fraction: 0.5,
        }
    }
}

/// Everything a resize changes, computed before anything is mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportUpdate {
    pub surface_width: u32,
    pub surface_height: u32,
    pub aspect: f32,
    /// New camera depth; `None` while no fitted baseline exists.
    pub camera_z: Option<f32>,
}

impl ResizePolicy {
    /// Whether the logo should be created at all for this page width.
    pub fn is_enabled_for(&self, page_width: f32) -> bool {
        page_width > self.min_page_width
    }

    /// Page width for a canvas of the given width.
    pub fn page_width_for_canvas(&self, canvas_width: f32) -> f32 {
        canvas_width / self.canvas_fraction
    }

    /// Resolve a page resize; `None` means leave camera and renderer untouched.
    pub fn resolve(
        &self,
        page_width: f32,
        page_height: f32,
        baseline_depth: Option<f32>,
    ) -> Option<ViewportUpdate> {
        if !self.is_enabled_for(page_width) || page_height <= 0.0 {
            return None;
        }
        let canvas_width = page_width * self.canvas_fraction;
        let camera_z = baseline_depth.map(|depth| {
            if page_width < self.compact_page_width {
                depth + self.compact_depth_offset
            } else {
                depth
            }
        });
        Some(ViewportUpdate {
            surface_width: canvas_width.round().max(1.0) as u32,
            surface_height: page_height.round().max(1.0) as u32,
            aspect: canvas_width / page_height,
            camera_z,
        })
    }
}
