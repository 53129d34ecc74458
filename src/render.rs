//! Render composition and pipeline batching.
//!
//! Flows describe what they want drawn with a [`Render`] value. The engine
//! sorts the contained draws into batches for the flat and the blended matcap
//! pipelines so each pipeline is bound once per frame.
//!
//! # Key types
//!
//! - [`Render<'a, 'pass>`] is the primary enum describing render operations
//! - [`Instanced<'a>`] contains data for instanced rendering (model, instance
//!   buffer and material bind groups)
//!

use wgpu::RenderPass;

use crate::{context::Context, data_structures::model::Model};

/// Data for instanced object rendering.
///
/// `material` is bound at group 0. Draws that carry a `blend` bind group go
/// through the blended pipeline, which binds it at group 2.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
    pub material: &'a wgpu::BindGroup,
    pub blend: Option<&'a wgpu::BindGroup>,
}

/// Specifies how a scene object should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Matcap(Instanced)` renders a single instanced object
/// - `Matcaps(Vec<Instanced>)` renders a batch of instanced objects
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
/// - `Custom(...)` invokes a user-defined closure for custom rendering
///
pub enum Render<'a, 'pass>
where
    'pass: 'a,
{
    None,
    Matcap(Instanced<'a>),
    Matcaps(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a, 'pass>>),
    Custom(Box<dyn 'a + FnOnce(&Context, &mut wgpu::RenderPass<'pass>)>),
}

impl<'a, 'pass> Render<'a, 'pass> {
    pub(crate) fn set_pipelines(
        self,
        ctx: &Context,
        render_pass: &mut RenderPass<'pass>,
        flats: &mut Vec<Instanced<'a>>,
        blendeds: &mut Vec<Instanced<'a>>,
    ) {
        match self {
            Render::Matcap(instanced) => sort_into(instanced, flats, blendeds),
            Render::Matcaps(vec) => vec
                .into_iter()
                .for_each(|instanced| sort_into(instanced, flats, blendeds)),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(ctx, render_pass, flats, blendeds)),
            Render::Custom(f) => f(ctx, render_pass),
            Render::None => (),
        }
    }
}

fn sort_into<'a>(
    instanced: Instanced<'a>,
    flats: &mut Vec<Instanced<'a>>,
    blendeds: &mut Vec<Instanced<'a>>,
) {
    if instanced.blend.is_some() {
        blendeds.push(instanced);
    } else {
        flats.push(instanced);
    }
}
