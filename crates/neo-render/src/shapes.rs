//! Unit meshes for bodies: an icosphere and an eight-sided cone.
//!
//! Both are centered on the origin with radius 1 and emitted as plain
//! triangle lists (counter-clockwise, outward facing).

use std::collections::HashMap;

use glam::Vec3;
use neo_orbit::BodyShape;

/// One corner of a triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Triangle list for a unit shape.
#[derive(Clone, Debug)]
pub struct UnitMesh {
    pub vertices: Vec<ShapeVertex>,
}

impl UnitMesh {
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn for_shape(shape: BodyShape) -> Self {
        match shape {
            BodyShape::Sphere => icosphere(2),
            BodyShape::Cone => cone(8),
        }
    }
}

/// Icosahedron subdivided `subdivisions` times, smooth normals.
pub fn icosphere(subdivisions: u32) -> UnitMesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions: Vec<Vec3> = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(Vec3::normalize)
    .collect();

    let mut indices: Vec<u32> = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7,
        1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9,
        8, 1,
    ];

    for _ in 0..subdivisions {
        subdivide(&mut positions, &mut indices);
    }

    let vertices = indices
        .iter()
        .map(|&i| {
            let p = positions[i as usize];
            ShapeVertex {
                position: p,
                normal: p,
            }
        })
        .collect();

    UnitMesh { vertices }
}

fn subdivide(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>) {
    let mut cache: HashMap<(u32, u32), u32> = HashMap::new();
    let mut next = Vec::with_capacity(indices.len() * 4);

    let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        *cache.entry(key).or_insert_with(|| {
            let mid = (positions[a as usize] + positions[b as usize]).normalize();
            positions.push(mid);
            (positions.len() - 1) as u32
        })
    };

    for tri in indices.chunks(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = midpoint(a, b, positions);
        let bc = midpoint(b, c, positions);
        let ca = midpoint(c, a, positions);

        next.extend_from_slice(&[a, ab, ca]);
        next.extend_from_slice(&[b, bc, ab]);
        next.extend_from_slice(&[c, ca, bc]);
        next.extend_from_slice(&[ab, bc, ca]);
    }

    *indices = next;
}

/// Cone with its apex at +Y and base at -Y, flat-shaded.
pub fn cone(segments: u32) -> UnitMesh {
    let segments = segments.max(3);
    let apex = Vec3::Y;
    let center = Vec3::NEG_Y;
    let rim = |i: u32| {
        let a = i as f32 / segments as f32 * std::f32::consts::TAU;
        Vec3::new(a.cos(), -1.0, a.sin())
    };

    let mut vertices = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let (b0, b1) = (rim(i), rim(i + 1));
        push_flat(&mut vertices, [apex, b1, b0]);
        push_flat(&mut vertices, [center, b0, b1]);
    }

    UnitMesh { vertices }
}

fn push_flat(out: &mut Vec<ShapeVertex>, tri: [Vec3; 3]) {
    let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
    out.extend(tri.map(|position| ShapeVertex { position, normal }));
}
