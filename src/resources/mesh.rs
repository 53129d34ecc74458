use cgmath::{InnerSpace, Vector2, Vector3};

use crate::data_structures::model;

/**
 * Exports without a TANGENT attribute still need tangents and bitangents for the
 * normal maps to work. They are derived from the UV layout of every triangle and
 * averaged per vertex.
 */
pub fn compute_tangents(vertices: &mut [model::ModelVertex], indices: &[u32]) {
    let mut tangents = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
    let mut bitangents = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
    let mut triangles_included = vec![0u32; vertices.len()];

    for c in indices.chunks_exact(3) {
        let [i0, i1, i2] = [c[0] as usize, c[1] as usize, c[2] as usize];
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }
        let (v0, v1, v2) = (vertices[i0], vertices[i1], vertices[i2]);

        let pos0: Vector3<f32> = v0.position.into();
        let pos1: Vector3<f32> = v1.position.into();
        let pos2: Vector3<f32> = v2.position.into();

        let uv0: Vector2<f32> = v0.tex_coords.into();
        let uv1: Vector2<f32> = v1.tex_coords.into();
        let uv2: Vector2<f32> = v2.tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // Solves
        //     delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        //     delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // Flipped: glTF normal maps point green up, wgpu UVs point down
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for i in [i0, i1, i2] {
            tangents[i] += tangent;
            bitangents[i] += bitangent;
            triangles_included[i] += 1;
        }
    }

    for (i, vertex) in vertices.iter_mut().enumerate() {
        let n = triangles_included[i];
        if n == 0 {
            // No usable UVs, any basis perpendicular to the normal will do
            let (tangent, bitangent) = fallback_basis(vertex.normal.into());
            vertex.tangent = tangent.into();
            vertex.bitangent = bitangent.into();
            continue;
        }
        let denom = 1.0 / n as f32;
        vertex.tangent = (tangents[i] * denom).into();
        vertex.bitangent = (bitangents[i] * denom).into();
    }
}

fn fallback_basis(normal: Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    if normal.magnitude2() < f32::EPSILON {
        return (Vector3::unit_x(), Vector3::unit_y());
    }
    let normal = normal.normalize();
    let helper = if normal.x.abs() < 0.9 {
        Vector3::unit_x()
    } else {
        Vector3::unit_y()
    };
    let tangent = helper.cross(normal).cross(normal).normalize() * -1.0;
    let bitangent = normal.cross(tangent);
    (tangent, bitangent)
}
