use std::collections::HashMap;

use crate::{
    data_structures::scene_graph::{ContainerNode, SceneNode, to_scene_node},
    data_structures::instance::Instance,
    error::SetupError,
    resources::{
        animation::{Keyframes, NodeAnimation},
        texture::load_binary,
    },
};

/**
 * This module contains all logic for loading meshes, textures and animations from
 * external files.
 */
pub mod animation;
pub mod mesh;
pub mod texture;

/// Loads a binary or embedded glTF file into a scene graph.
///
/// The returned root is always a [`ContainerNode`] named after the file, so
/// callers can transform the whole asset without touching authored nodes.
/// Node animations of every clip are attached to the nodes they target.
pub async fn load_model_gltf(
    file_name: &str,
    device: &wgpu::Device,
) -> Result<Box<dyn SceneNode>, SetupError> {
    let gltf_bytes = load_binary(file_name)
        .await
        .map_err(|e| SetupError::asset(file_name, e))?;
    let gltf = gltf::Gltf::from_slice(&gltf_bytes).map_err(|e| SetupError::asset(file_name, e))?;

    if gltf
        .extensions_required()
        .any(|ext| ext == "KHR_draco_mesh_compression")
    {
        return Err(SetupError::asset(
            file_name,
            anyhow::anyhow!("Draco compressed meshes are not supported, export an uncompressed glb"),
        ));
    }

    // Load buffers
    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => match gltf.blob.as_deref() {
                Some(blob) => buffer_data.push(blob.into()),
                None => {
                    return Err(SetupError::asset(
                        file_name,
                        anyhow::anyhow!("buffer {} points to a missing binary chunk", buffer.index()),
                    ));
                }
            },
            gltf::buffer::Source::Uri(uri) => {
                // external buffers sit next to the model
                let path = match file_name.rsplit_once('/') {
                    Some((dir, _)) => format!("{}/{}", dir, uri),
                    None => uri.to_string(),
                };
                let bin = load_binary(&path)
                    .await
                    .map_err(|e| SetupError::asset(path.as_str(), e))?;
                buffer_data.push(bin);
            }
        }
    }

    let animations = read_animations(&gltf, &buffer_data);

    let mut root = ContainerNode::new(file_name, Instance::new(), Vec::new());
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            root.add_child(to_scene_node(node, &buffer_data, device, &animations));
        }
    }
    log::info!(
        "loaded `{}` with {} root nodes and {} animation clips",
        file_name,
        root.children().len(),
        gltf.animations().len()
    );

    Ok(Box::new(root))
}

/// Groups every animation channel by the node it targets. Channels of one
/// clip that target the same node are merged into one [`NodeAnimation`].
fn read_animations(
    gltf: &gltf::Gltf,
    buffer_data: &[Vec<u8>],
) -> HashMap<usize, Vec<NodeAnimation>> {
    let mut animations: HashMap<usize, Vec<NodeAnimation>> = HashMap::new();
    for animation in gltf.animations() {
        let name = animation.name().unwrap_or("Default");
        for channel in animation.channels() {
            let reader = channel.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
            let timestamps: Vec<f32> = match reader.read_inputs() {
                Some(gltf::accessor::Iter::Standard(times)) => times.collect(),
                Some(gltf::accessor::Iter::Sparse(_)) => {
                    log::warn!("sparse timestamps in clip `{}` are not supported", name);
                    Vec::new()
                }
                None => {
                    log::warn!("no timestamps in channel {} of `{}`", channel.index(), name);
                    Vec::new()
                }
            };
            let keyframes = match reader.read_outputs() {
                Some(gltf::animation::util::ReadOutputs::Translations(translations)) => {
                    Keyframes::Translation(translations.map(Into::into).collect())
                }
                Some(gltf::animation::util::ReadOutputs::Rotations(rotations)) => {
                    Keyframes::Rotation(
                        rotations
                            .into_f32()
                            .map(|[x, y, z, w]| cgmath::Quaternion::new(w, x, y, z))
                            .collect(),
                    )
                }
                Some(gltf::animation::util::ReadOutputs::Scales(scales)) => {
                    Keyframes::Scale(scales.map(Into::into).collect())
                }
                Some(gltf::animation::util::ReadOutputs::MorphTargetWeights(_)) | None => {
                    Keyframes::Other
                }
            };

            let targets = animations.entry(channel.target().node().index()).or_default();
            let index = match targets.iter().position(|a| a.name == name) {
                Some(index) => index,
                None => {
                    targets.push(NodeAnimation::new(name));
                    targets.len() - 1
                }
            };
            targets[index].add_channel(timestamps, keyframes);
        }
    }
    animations
}
