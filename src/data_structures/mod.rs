//! Scene data: meshes, textures, transforms and the scene graph.
//!
//! - `model` holds vertex layouts, GPU meshes and the draw helpers
//! - `texture` wraps GPU textures and their creation from images
//! - `instance` holds node transforms and their raw GPU form
//! - `scene_graph` organizes the loaded asset hierarchically

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
