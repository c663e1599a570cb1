//! Engine data structures: bounds, models, textures, scene graphs, and transforms.
//!
//! - `bounds` axis-aligned bounding boxes used for viewport fitting
//! - `instance` node transforms and their GPU representation
//! - `model` mesh geometry, materials slots and draw helpers
//! - `scene_graph` hierarchical organisation of a loaded model
//! - `texture` GPU texture wrapper and creation utilities

pub mod bounds;
pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
