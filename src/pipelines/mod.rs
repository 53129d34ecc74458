//! Render pipelines and the WGSL templates they are built from.

pub mod matcap;
pub mod template;
