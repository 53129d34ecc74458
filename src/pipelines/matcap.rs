//! The two matcap pipelines.
//!
//! Both are rendered from the same base template. The flat pipeline samples
//! the material's own matcap; the blended pipeline is patched to sample the
//! two shared transition matcaps and wipe between them.

use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{self, Vertex},
        texture::Texture,
    },
    error::SetupError,
    material::MatcapLayouts,
    pipelines::template::{ShaderPatch, ShaderTemplate},
};

const BASE: &str = include_str!("matcap.wgsl");
const BLEND_BINDINGS: &str = include_str!("matcap_blend_bindings.wgsl");
const BLEND_COLOR: &str = include_str!("matcap_blend_color.wgsl");

const SINGLE_SAMPLE: &str = "let matcap_color = textureSample(t_matcap, s_matcap, uv);";

pub fn base_template() -> Result<ShaderTemplate, SetupError> {
    ShaderTemplate::parse("matcap", BASE)?.with_default("matcap_color", SINGLE_SAMPLE)
}

/// Replaces the single matcap sample with the two-matcap wipe.
pub fn blend_patch() -> ShaderPatch {
    ShaderPatch::new("matcap cross-fade")
        .insert("bindings", BLEND_BINDINGS)
        .insert("matcap_color", BLEND_COLOR)
}

pub fn flat_source() -> Result<String, SetupError> {
    base_template()?.render(&[])
}

pub fn blended_source() -> Result<String, SetupError> {
    base_template()?.render(&[&blend_patch()])
}

#[derive(Debug)]
pub struct MatcapPipelines {
    /// Cross-fades the shared transition matcaps (groups 0, 1, 2).
    pub blended: wgpu::RenderPipeline,
    /// Samples the material's own matcap (groups 0, 1).
    pub flat: wgpu::RenderPipeline,
}

impl MatcapPipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        layouts: &MatcapLayouts,
    ) -> Result<Self, SetupError> {
        let flat_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Flat Matcap Pipeline Layout"),
            bind_group_layouts: &[&layouts.material, &layouts.camera],
            push_constant_ranges: &[],
        });
        let blended_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blended Matcap Pipeline Layout"),
            bind_group_layouts: &[&layouts.material, &layouts.camera, &layouts.transition],
            push_constant_ranges: &[],
        });

        let flat = mk_matcap_pipeline(
            device,
            config,
            &flat_layout,
            "Flat Matcap Pipeline",
            flat_source()?,
        );
        let blended = mk_matcap_pipeline(
            device,
            config,
            &blended_layout,
            "Blended Matcap Pipeline",
            blended_source()?,
        );
        Ok(Self { blended, flat })
    }
}

/// Opaque triangle lists with back-face culling and a depth test.
fn mk_matcap_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    layout: &wgpu::PipelineLayout,
    label: &str,
    source: String,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let buffers = [model::ModelVertex::desc(), InstanceRaw::desc()];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: config.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
    })
}
