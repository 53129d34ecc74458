use cgmath::{InnerSpace, Quaternion, Rad, Rotation3, Vector3};
use matcap_flow::{
    data_structures::{
        instance::Instance,
        model::ModelVertex,
        scene_graph::{ContainerNode, SceneNode},
    },
    material::classify,
    resources::{
        animation::{Channel, Keyframes, NodeAnimation},
        mesh::compute_tangents,
    },
};

use crate::common::test_utils::{assert_close, assert_vec3_close};

mod common;

fn slide(name: &str) -> NodeAnimation {
    let mut animation = NodeAnimation::new(name);
    animation.add_channel(
        vec![0.0, 2.0],
        Keyframes::Translation(vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0)]),
    );
    animation
}

#[test]
fn channel_interpolates_and_holds_its_ends() {
    let channel = Channel::new(
        vec![0.0, 1.0],
        vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 0.0, 0.0)],
    );
    assert_vec3_close(channel.sample(0.5).unwrap(), Vector3::new(1.0, 0.0, 0.0));
    assert_vec3_close(channel.sample(-1.0).unwrap(), Vector3::new(0.0, 0.0, 0.0));
    assert_vec3_close(channel.sample(3.0).unwrap(), Vector3::new(2.0, 0.0, 0.0));
}

#[test]
fn empty_channel_has_no_value() {
    let channel: Channel<Vector3<f32>> = Channel::new(vec![], vec![]);
    assert!(channel.sample(0.0).is_none());
    assert_eq!(channel.duration(), 0.0);
}

#[test]
fn mismatched_channel_is_truncated() {
    let channel = Channel::new(vec![0.0, 1.0, 2.0], vec![Vector3::new(1.0, 1.0, 1.0)]);
    assert_eq!(channel.times.len(), 1);
    assert_eq!(channel.values.len(), 1);
}

#[test]
fn rotation_takes_the_short_way() {
    let q = Quaternion::from_angle_y(Rad(0.3));
    let channel = Channel::new(vec![0.0, 1.0], vec![q, -q]);
    let mid = channel.sample(0.5).unwrap();
    assert_close(mid.dot(q).abs(), 1.0);
}

#[test]
fn node_animation_keeps_rest_values_without_channels() {
    let animation = slide("Take 001");
    let rest = Instance {
        scale: Vector3::new(3.0, 3.0, 3.0),
        ..Instance::new()
    };
    let posed = animation.sample(1.0, &rest);
    assert_vec3_close(posed.position, Vector3::new(1.0, 0.0, 0.0));
    assert_vec3_close(posed.scale, rest.scale);
    assert_eq!(animation.duration(), 2.0);
}

#[test]
fn scene_graph_poses_and_composes_world_transforms() {
    let mut root = ContainerNode::new("dog.glb", Instance::new(), vec![]);
    let child_rest = Instance {
        position: Vector3::new(0.0, 1.0, 0.0),
        ..Instance::new()
    };
    root.add_child(Box::new(ContainerNode::new(
        "DOG_body",
        child_rest,
        vec![slide("Take 001")],
    )));
    assert_eq!(root.clip_duration("Take 001"), 2.0);
    assert_eq!(root.clip_duration("other"), 0.0);

    root.animate("Take 001", 1.0);
    root.set_local_transform(Instance {
        position: Vector3::new(0.0, 0.0, -1.0),
        ..Instance::new()
    });
    root.update_world_transforms(&Instance::new());
    assert_vec3_close(
        root.children()[0].world_transform().position,
        Vector3::new(1.0, 0.0, -1.0),
    );

    // a clip the node has no channel for returns it to rest
    root.animate("other", 1.0);
    assert_eq!(root.children()[0].local_transform(), child_rest);
}

#[test]
fn containers_are_visited_but_draw_nothing() {
    let mut root = ContainerNode::new("root", Instance::new(), vec![]);
    root.add_child(Box::new(ContainerNode::new("DOG", Instance::new(), vec![])));
    root.assign_materials(&|name| classify(name, "DOG"));

    let mut names = Vec::new();
    root.visit(&mut |node| names.push((node.name().to_string(), node.material())));
    assert_eq!(
        names,
        vec![("root".to_string(), None), ("DOG".to_string(), None)]
    );
}

fn vertex(position: [f32; 3], tex_coords: [f32; 2]) -> ModelVertex {
    ModelVertex {
        position,
        tex_coords,
        normal: [0.0, 0.0, 1.0],
        ..Default::default()
    }
}

#[test]
fn tangents_follow_the_uv_layout() {
    let mut vertices = vec![
        vertex([0.0, 0.0, 0.0], [0.0, 0.0]),
        vertex([1.0, 0.0, 0.0], [1.0, 0.0]),
        vertex([0.0, 1.0, 0.0], [0.0, 1.0]),
        // not referenced by any triangle
        vertex([5.0, 5.0, 0.0], [0.0, 0.0]),
    ];
    compute_tangents(&mut vertices, &[0, 1, 2, 0, 1, 9]);

    for v in &vertices[..3] {
        assert_vec3_close(v.tangent.into(), Vector3::new(1.0, 0.0, 0.0));
        assert_vec3_close(v.bitangent.into(), Vector3::new(0.0, -1.0, 0.0));
    }
    let unused = vertices[3];
    let tangent: Vector3<f32> = unused.tangent.into();
    let normal: Vector3<f32> = unused.normal.into();
    assert_close(tangent.magnitude(), 1.0);
    assert_close(tangent.dot(normal), 0.0);
}
