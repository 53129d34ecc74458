//! Scene graph of the loaded asset.
//!
//! Every node has a rest transform (as authored), a local transform (rest or
//! animated) and a world transform derived from its parents. Nodes that carry
//! geometry are [`ModelNode`]s and own a one-instance GPU buffer with their
//! world matrix; pure grouping nodes are [`ContainerNode`]s.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        model::{self, Model},
    },
    material::MaterialVariant,
    resources::{animation::NodeAnimation, mesh::compute_tangents},
};

/// State shared by all node kinds.
#[derive(Default)]
pub struct NodeCore {
    pub name: String,
    pub rest: Instance,
    pub local: Instance,
    pub world: Instance,
    pub animations: Vec<NodeAnimation>,
    pub children: Vec<Box<dyn SceneNode>>,
}

impl NodeCore {
    pub fn new(name: &str, rest: Instance, animations: Vec<NodeAnimation>) -> Self {
        Self {
            name: name.to_string(),
            rest,
            local: rest,
            world: rest,
            animations,
            children: Vec::new(),
        }
    }
}

/// One draw the scene graph asks for: geometry, its instance buffer and the
/// material it was classified into.
pub struct NodeDraw<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub variant: MaterialVariant,
}

pub trait SceneNode {
    fn core(&self) -> &NodeCore;

    fn core_mut(&mut self) -> &mut NodeCore;

    /// The material this node is drawn with, if it draws anything.
    fn material(&self) -> Option<MaterialVariant> {
        None
    }

    fn set_material(&mut self, _variant: MaterialVariant) {}

    /// Uploads the world transforms of this subtree.
    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        self.core_mut()
            .children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn collect_draws<'a>(&'a self, draws: &mut Vec<NodeDraw<'a>>) {
        self.core()
            .children
            .iter()
            .for_each(|child| child.collect_draws(draws));
    }

    fn name(&self) -> &str {
        &self.core().name
    }

    fn local_transform(&self) -> Instance {
        self.core().local
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.core_mut().local = instance;
    }

    fn world_transform(&self) -> Instance {
        self.core().world
    }

    fn children(&self) -> &[Box<dyn SceneNode>] {
        &self.core().children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.core_mut().children.push(child);
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        let core = self.core_mut();
        core.world = parent * &core.local;
        let world = core.world;
        core.children
            .iter_mut()
            .for_each(|child| child.update_world_transforms(&world));
    }

    /// Poses the subtree at `time` seconds into `clip`. Nodes without a
    /// channel for the clip return to their rest transform.
    fn animate(&mut self, clip: &str, time: f32) {
        let core = self.core_mut();
        core.local = core
            .animations
            .iter()
            .find(|animation| animation.name == clip)
            .map_or(core.rest, |animation| animation.sample(time, &core.rest));
        core.children
            .iter_mut()
            .for_each(|child| child.animate(clip, time));
    }

    /// Longest channel of `clip` anywhere in the subtree.
    fn clip_duration(&self, clip: &str) -> f32 {
        let own = self
            .core()
            .animations
            .iter()
            .filter(|animation| animation.name == clip)
            .map(NodeAnimation::duration)
            .fold(0.0, f32::max);
        self.children()
            .iter()
            .map(|child| child.clip_duration(clip))
            .fold(own, f32::max)
    }

    /// Classifies every node of the subtree by its name.
    fn assign_materials(&mut self, classify: &dyn Fn(&str) -> MaterialVariant) {
        let variant = classify(self.name());
        self.set_material(variant);
        self.core_mut()
            .children
            .iter_mut()
            .for_each(|child| child.assign_materials(classify));
    }

    /// Calls `f` for this node and all descendants, parents first.
    fn visit(&self, f: &mut dyn FnMut(&dyn SceneNode)) {
        f(self.as_dyn());
        self.children().iter().for_each(|child| child.visit(f));
    }

    fn as_dyn(&self) -> &dyn SceneNode;
}

pub struct ContainerNode {
    core: NodeCore,
}

impl ContainerNode {
    pub fn new(name: &str, rest: Instance, animations: Vec<NodeAnimation>) -> Self {
        Self {
            core: NodeCore::new(name, rest, animations),
        }
    }
}

impl SceneNode for ContainerNode {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn as_dyn(&self) -> &dyn SceneNode {
        self
    }
}

pub struct ModelNode {
    core: NodeCore,
    model: Model,
    instance_buffer: wgpu::Buffer,
    variant: MaterialVariant,
}

impl ModelNode {
    pub fn from_model(
        device: &wgpu::Device,
        name: &str,
        rest: Instance,
        model: Model,
        animations: Vec<NodeAnimation>,
    ) -> Self {
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Instance Buffer", name)),
            contents: bytemuck::cast_slice(&[rest.to_raw()]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            core: NodeCore::new(name, rest, animations),
            model,
            instance_buffer,
            variant: MaterialVariant::Environment,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}

impl SceneNode for ModelNode {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    fn material(&self) -> Option<MaterialVariant> {
        Some(self.variant)
    }

    fn set_material(&mut self, variant: MaterialVariant) {
        self.variant = variant;
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        let raw: [InstanceRaw; 1] = [self.core.world.to_raw()];
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&raw));
        self.core
            .children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn collect_draws<'a>(&'a self, draws: &mut Vec<NodeDraw<'a>>) {
        if !self.model.meshes.is_empty() {
            draws.push(NodeDraw {
                instance: &self.instance_buffer,
                model: &self.model,
                variant: self.variant,
            });
        }
        self.core
            .children
            .iter()
            .for_each(|child| child.collect_draws(draws));
    }

    fn as_dyn(&self) -> &dyn SceneNode {
        self
    }
}

/// Builds the subtree rooted at a glTF node.
pub fn to_scene_node(
    node: gltf::scene::Node,
    buffers: &[Vec<u8>],
    device: &wgpu::Device,
    animations: &HashMap<usize, Vec<NodeAnimation>>,
) -> Box<dyn SceneNode> {
    let name = node
        .name()
        .or_else(|| node.mesh().and_then(|mesh| mesh.name()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));
    let node_animations = animations.get(&node.index()).cloned().unwrap_or_default();
    let (position, rotation, scale) = node.transform().decomposed();
    let rest = Instance {
        position: position.into(),
        rotation: cgmath::Quaternion::new(rotation[3], rotation[0], rotation[1], rotation[2]),
        scale: scale.into(),
    };

    let mut scene_node: Box<dyn SceneNode> = match node.mesh() {
        Some(mesh) => {
            let meshes = mesh
                .primitives()
                .filter_map(|primitive| read_primitive(&primitive, &name, buffers, device))
                .collect();
            let model = Model { meshes };
            Box::new(ModelNode::from_model(device, &name, rest, model, node_animations))
        }
        None => Box::new(ContainerNode::new(&name, rest, node_animations)),
    };
    for child in node.children() {
        scene_node.add_child(to_scene_node(child, buffers, device, animations));
    }
    scene_node
}

fn read_primitive(
    primitive: &gltf::Primitive,
    name: &str,
    buffers: &[Vec<u8>],
    device: &wgpu::Device,
) -> Option<model::Mesh> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let Some(positions) = reader.read_positions() else {
        log::warn!("primitive of `{}` has no positions and is skipped", name);
        return None;
    };
    let mut vertices: Vec<model::ModelVertex> = positions
        .map(|position| model::ModelVertex {
            position,
            ..Default::default()
        })
        .collect();
    if let Some(normals) = reader.read_normals() {
        vertices
            .iter_mut()
            .zip(normals)
            .for_each(|(vertex, normal)| vertex.normal = normal);
    }
    if let Some(tex_coords) = reader.read_tex_coords(0).map(|v| v.into_f32()) {
        vertices
            .iter_mut()
            .zip(tex_coords)
            .for_each(|(vertex, uv)| vertex.tex_coords = uv);
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };

    match reader.read_tangents() {
        Some(tangents) => vertices.iter_mut().zip(tangents).for_each(|(vertex, tangent)| {
            // glTF stores the bitangent sign in w
            let tangent: cgmath::Vector4<f32> = tangent.into();
            let normal: cgmath::Vector3<f32> = vertex.normal.into();
            vertex.tangent = tangent.truncate().into();
            vertex.bitangent = (normal.cross(tangent.truncate()) * tangent.w).into();
        }),
        None => compute_tangents(&mut vertices, &indices),
    }

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Index Buffer", name)),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    Some(model::Mesh {
        name: name.to_string(),
        vertex_buffer,
        index_buffer,
        num_elements: indices.len() as u32,
    })
}
