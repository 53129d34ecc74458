//! Matcap references, material classification and the GPU bindings of the
//! two material variants.

use std::fmt;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::{self, Texture, TextureOptions},
    error::SetupError,
    resources::texture::load_texture,
    transition::TransitionState,
};

/// 1-based index into the matcap library (`mat-1` .. `mat-20`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatcapId(pub u32);

impl MatcapId {
    /// Asset path of this matcap, relative to the asset root.
    pub fn path(&self) -> String {
        format!("matcap/mat-{}.png", self.0)
    }
}

impl fmt::Display for MatcapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mat-{}", self.0)
    }
}

/// Which of the two materials a scene node is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialVariant {
    /// The hero object, matched by the marker token.
    PrimaryObject,
    /// Everything else (branches, leaves).
    Environment,
}

/// Nodes whose name contains `marker` are the primary object. Matching is
/// case sensitive.
pub fn classify(name: &str, marker: &str) -> MaterialVariant {
    if !marker.is_empty() && name.contains(marker) {
        MaterialVariant::PrimaryObject
    } else {
        MaterialVariant::Environment
    }
}

/// Hover anchor names and the matcap each one fades to, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantTable {
    entries: Vec<(String, MatcapId)>,
}

impl VariantTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds or replaces an entry.
    pub fn with(mut self, name: &str, matcap: MatcapId) -> Self {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = matcap,
            None => self.entries.push((name.to_string(), matcap)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<MatcapId> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, matcap)| *matcap)
    }

    /// The `index`-th entry in declaration order.
    pub fn nth(&self, index: usize) -> Option<(&str, MatcapId)> {
        self.entries
            .get(index)
            .map(|(name, matcap)| (name.as_str(), *matcap))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, MatcapId)> {
        self.entries
            .iter()
            .map(|(name, matcap)| (name.as_str(), *matcap))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for VariantTable {
    fn default() -> Self {
        Self::new()
            .with("tomorrowland", MatcapId(19))
            .with("navy-pier", MatcapId(8))
            .with("msi-chicago", MatcapId(9))
            .with("phone", MatcapId(12))
            .with("kikk", MatcapId(10))
            .with("kennedy", MatcapId(8))
            .with("opera", MatcapId(13))
    }
}

/// The loaded matcap textures, `mat-1` first.
pub struct MatcapLibrary {
    textures: Vec<Texture>,
}

impl MatcapLibrary {
    /// Loads `mat-1` .. `mat-{count}` concurrently.
    pub async fn load(
        count: u32,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Self, SetupError> {
        // The shader flips v, so matcaps are uploaded unflipped
        let loads = (1..=count).map(|n| {
            let path = MatcapId(n).path();
            async move { load_texture(&path, TextureOptions::COLOR, device, queue).await }
        });
        let textures = futures::future::join_all(loads)
            .await
            .into_iter()
            .map(|result| {
                result.map(|mut texture| {
                    texture.sampler = texture::create_clamped_sampler(device);
                    texture
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("loaded {} matcaps", textures.len());
        Ok(Self { textures })
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn contains(&self, id: MatcapId) -> bool {
        id.0 >= 1 && (id.0 as usize) <= self.textures.len()
    }

    pub fn get(&self, id: MatcapId) -> Result<&Texture, SetupError> {
        if !self.contains(id) {
            return Err(SetupError::UnknownMatcap(id));
        }
        Ok(&self.textures[id.0 as usize - 1])
    }
}

/// Bind group layouts shared by the matcap pipelines and their materials.
#[derive(Clone, Debug)]
pub struct MatcapLayouts {
    pub material: wgpu::BindGroupLayout,
    pub camera: wgpu::BindGroupLayout,
    pub transition: wgpu::BindGroupLayout,
}

/// GPU state of both material variants.
///
/// Each variant owns a material bind group (group 0: normal map + flat
/// matcap). Both share a single transition bind group (group 2: the two faded
/// matcaps + the sweep uniform), so one uniform write animates all of them.
pub struct MatcapMaterials {
    material_layout: wgpu::BindGroupLayout,
    transition_layout: wgpu::BindGroupLayout,
    primary_normal: Texture,
    environment_normal: Texture,
    uniform_buffer: wgpu::Buffer,
    primary: wgpu::BindGroup,
    environment: wgpu::BindGroup,
    transition: wgpu::BindGroup,
    bound: BoundMatcaps,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BoundMatcaps {
    primary: MatcapId,
    secondary: MatcapId,
    environment: MatcapId,
}

impl MatcapMaterials {
    pub fn new(
        device: &wgpu::Device,
        layouts: &MatcapLayouts,
        library: &MatcapLibrary,
        primary_normal: Texture,
        environment_normal: Texture,
        state: &TransitionState,
        environment: MatcapId,
    ) -> Result<Self, SetupError> {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transition Buffer"),
            contents: bytemuck::cast_slice(&[state.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bound = BoundMatcaps {
            primary: state.primary,
            secondary: state.secondary,
            environment,
        };
        let primary = material_bind_group(
            device,
            &layouts.material,
            "primary material",
            &primary_normal,
            library.get(bound.primary)?,
        );
        let environment = material_bind_group(
            device,
            &layouts.material,
            "environment material",
            &environment_normal,
            library.get(bound.environment)?,
        );
        let transition = transition_bind_group(
            device,
            &layouts.transition,
            library.get(bound.primary)?,
            library.get(bound.secondary)?,
            &uniform_buffer,
        );
        Ok(Self {
            material_layout: layouts.material.clone(),
            transition_layout: layouts.transition.clone(),
            primary_normal,
            environment_normal,
            uniform_buffer,
            primary,
            environment,
            transition,
            bound,
        })
    }

    /// Brings the GPU side in line with the transition state. Bind groups are
    /// only rebuilt when the matcaps they reference change; the sweep uniform
    /// is written every call.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        library: &MatcapLibrary,
        state: &TransitionState,
        environment: MatcapId,
    ) -> Result<(), SetupError> {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[state.to_uniform()]),
        );
        let wanted = BoundMatcaps {
            primary: state.primary,
            secondary: state.secondary,
            environment,
        };
        if wanted == self.bound {
            return Ok(());
        }
        if (wanted.primary, wanted.secondary) != (self.bound.primary, self.bound.secondary) {
            log::debug!(
                "rebinding transition matcaps {} -> {}",
                wanted.secondary,
                wanted.primary
            );
            self.transition = transition_bind_group(
                device,
                &self.transition_layout,
                library.get(wanted.primary)?,
                library.get(wanted.secondary)?,
                &self.uniform_buffer,
            );
        }
        if wanted.primary != self.bound.primary {
            self.primary = material_bind_group(
                device,
                &self.material_layout,
                "primary material",
                &self.primary_normal,
                library.get(wanted.primary)?,
            );
        }
        if wanted.environment != self.bound.environment {
            log::debug!("environment matcap is now {}", wanted.environment);
            self.environment = material_bind_group(
                device,
                &self.material_layout,
                "environment material",
                &self.environment_normal,
                library.get(wanted.environment)?,
            );
        }
        self.bound = wanted;
        Ok(())
    }

    pub fn bind_group(&self, variant: MaterialVariant) -> &wgpu::BindGroup {
        match variant {
            MaterialVariant::PrimaryObject => &self.primary,
            MaterialVariant::Environment => &self.environment,
        }
    }

    pub fn transition_bind_group(&self) -> &wgpu::BindGroup {
        &self.transition
    }
}

fn material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    normal: &Texture,
    matcap: &Texture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&normal.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&normal.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&matcap.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(&matcap.sampler),
            },
        ],
        label: Some(label),
    })
}

fn transition_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    primary: &Texture,
    secondary: &Texture,
    uniform: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&primary.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&primary.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&secondary.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(&secondary.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: uniform.as_entire_binding(),
            },
        ],
        label: Some("matcap transition bind group"),
    })
}
