//! Render pipelines of the base scene.
//!
//! - `basic` builds the background, glass, silhouette and fullscreen pipelines
//! - `light` holds the light uniform and its bind group

pub mod basic;
pub mod light;
