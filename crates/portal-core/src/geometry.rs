use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// Torus in the XY plane around the origin, facing +Z.
///
/// `radial_segments` run around the tube, `tubular_segments` around the ring.
/// Seam vertices are duplicated so the index layout stays a plain grid.
pub fn torus(
    major_radius: f32,
    tube_radius: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> Mesh {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let mut vertices = Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = major_radius + tube_radius * v.cos();
            let position = [ring * u.cos(), ring * u.sin(), tube_radius * v.sin()];
            let centre = [major_radius * u.cos(), major_radius * u.sin(), 0.0];
            let n = [
                position[0] - centre[0],
                position[1] - centre[1],
                position[2] - centre[2],
            ];
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt().max(1e-12);
            vertices.push(MeshVertex {
                position,
                normal: [n[0] / len, n[1] / len, n[2] / len],
            });
        }
    }

    let row = tubular + 1;
    let mut indices = Vec::with_capacity((radial * tubular * 6) as usize);
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    Mesh { vertices, indices }
}

/// Flat disc at `z`, normal +Z, as a triangle fan around a centre vertex.
pub fn disk(radius: f32, segments: u32, z: f32) -> Mesh {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity(segments as usize + 2);
    vertices.push(MeshVertex {
        position: [0.0, 0.0, z],
        normal: [0.0, 0.0, 1.0],
    });
    for s in 0..=segments {
        let a = s as f32 / segments as f32 * TAU;
        vertices.push(MeshVertex {
            position: [radius * a.cos(), radius * a.sin(), z],
            normal: [0.0, 0.0, 1.0],
        });
    }
    let mut indices = Vec::with_capacity(segments as usize * 3);
    for s in 1..=segments {
        indices.extend_from_slice(&[0, s, s + 1]);
    }
    Mesh { vertices, indices }
}
