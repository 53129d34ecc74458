//! matcap-flow
//!
//! A small wgpu flow engine with one scene on top of it: a dog model shaded
//! with matcaps that cross-fades between matcap variants on hover, follows a
//! scroll-linked timeline and drifts with the pointer. Runs natively and as
//! WASM in a web page.
//!
//! High-level modules
//! - `camera`: camera, projection and the camera uniform
//! - `context`: GPU and window context that owns device/queue/pipelines
//! - `data_structures`: meshes, instances, textures and the scene graph
//! - `flow`: flows, the event loop and host event delivery
//! - `pipelines`: matcap pipelines and the shader template they are built from
//! - `resources`: helpers to load textures/models and create GPU resources
//! - `render`: render composition for efficient pipeline reuse
//! - `material`, `transition`: matcap library and the cross-fade state machine
//! - `timeline`, `parallax`, `tween`: scroll, pointer and tween animation
//! - `scene`: the dog scene flow
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod material;
pub mod parallax;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod timeline;
pub mod transition;
pub mod tween;
#[cfg(target_arch = "wasm32")]
pub mod web;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Quaternion, Vector2, Vector3};
pub use winit::dpi::PhysicalPosition;
pub use winit::event::WindowEvent;
