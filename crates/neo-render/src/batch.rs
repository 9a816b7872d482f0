//! CPU-side vertex generation for one frame of the scene.
//!
//! Everything here is plain data in, vertices out. The renderer uploads the
//! results; nothing in this module touches the GPU.

use glam::{EulerRot, Mat3, Quat, Vec3};
use neo_orbit::{Body, BodyShape, CentralBody, LightRig, SceneGraph, Star, rgb};

use crate::buffer::VertexPositionColor;
use crate::shapes::{UnitMesh, icosphere};

const OCEAN_NORTH: [f32; 3] = rgb(0x1a2980);
const OCEAN_EQUATOR: [f32; 3] = rgb(0x0f4c81);
const OCEAN_SOUTH: [f32; 3] = rgb(0x0a2540);
const LAND: [f32; 3] = rgb(0x2a5c3f);
const PLANET_EMISSIVE: [f32; 3] = [0.0118, 0.0365, 0.0718]; // 0x0a1f3d at 0.3
const ATMOSPHERE_COLOR: Vec3 = Vec3::new(0.3, 0.6, 1.0);

/// Unit meshes shared by every frame.
pub struct ShapeSet {
    pub sphere: UnitMesh,
    pub cone: UnitMesh,
    pub planet: UnitMesh,
}

impl Default for ShapeSet {
    fn default() -> Self {
        Self {
            sphere: UnitMesh::for_shape(BodyShape::Sphere),
            cone: UnitMesh::for_shape(BodyShape::Cone),
            planet: icosphere(4),
        }
    }
}

impl ShapeSet {
    pub fn for_shape(&self, shape: BodyShape) -> &UnitMesh {
        match shape {
            BodyShape::Sphere => &self.sphere,
            BodyShape::Cone => &self.cone,
        }
    }
}

/// Point vertices for the star cloud. Star colors already carry brightness.
pub fn star_vertices(stars: &[Star]) -> Vec<VertexPositionColor> {
    stars
        .iter()
        .map(|star| {
            let [r, g, b] = star.color;
            VertexPositionColor::new(star.position, [r, g, b, 1.0])
        })
        .collect()
}

/// Line-list vertices for every orbit curve, in pair order.
pub fn orbit_line_vertices(scene: &SceneGraph) -> Vec<VertexPositionColor> {
    let mut out = Vec::new();
    for pair in scene.pairs() {
        let Some(curve) = scene.orbit(pair.orbit) else {
            continue;
        };
        let [r, g, b] = curve.color;
        let color = [r, g, b, curve.opacity];
        for segment in curve.points.windows(2) {
            out.push(VertexPositionColor::new(segment[0], color));
            out.push(VertexPositionColor::new(segment[1], color));
        }
    }
    out
}

/// Orientation of a body from its accumulated tumble.
pub fn tumble_rotation(body: &Body) -> Quat {
    Quat::from_euler(EulerRot::XYZ, body.tumble.x, body.tumble.y, 0.0)
}

/// Lit triangles for every live body, appended to `out`.
pub fn body_vertices(
    scene: &SceneGraph,
    shapes: &ShapeSet,
    out: &mut Vec<VertexPositionColor>,
) {
    let lights = &scene.world().lights;
    for body in scene.bodies() {
        let mesh = shapes.for_shape(body.style.shape);
        let rotation = tumble_rotation(body);
        let scale = body.placement.size;
        for v in &mesh.vertices {
            let world = body.position + rotation * (v.position * scale);
            let normal = rotation * v.normal;
            let color = lights.shade(world, normal, body.style.color, body.style.emissive);
            out.push(VertexPositionColor::new(world, color));
        }
    }
}

/// Ocean or land color at a point on the unrotated unit planet.
pub fn planet_albedo(local: Vec3) -> [f32; 3] {
    if is_land(local) {
        return LAND;
    }
    let lat = local.y.clamp(-1.0, 1.0);
    let (from, to, t) = if lat >= 0.0 {
        (OCEAN_EQUATOR, OCEAN_NORTH, lat)
    } else {
        (OCEAN_EQUATOR, OCEAN_SOUTH, -lat)
    };
    Vec3::from(from).lerp(Vec3::from(to), t).to_array()
}

/// Procedural continents: a fixed sum of low-frequency waves.
fn is_land(n: Vec3) -> bool {
    let w = (n.x * 3.1 + 0.4).sin() * (n.z * 2.3 - 0.7).cos() + 0.5 * (n.y * 4.7 + n.x * 1.3).sin();
    w > 0.45
}

/// Lit, spinning planet triangles, appended to `out`.
pub fn planet_vertices(
    central: &CentralBody,
    lights: &LightRig,
    mesh: &UnitMesh,
    out: &mut Vec<VertexPositionColor>,
) {
    let spin = Mat3::from_rotation_y(central.spin);
    for v in &mesh.vertices {
        let world = spin * (v.position * central.radius);
        let normal = spin * v.normal;
        let color = lights.shade(world, normal, planet_albedo(v.position), PLANET_EMISSIVE);
        out.push(VertexPositionColor::new(world, color));
    }
}

/// Rim-glow shell around the planet, brightest where it faces away from the
/// camera. Drawn translucent.
pub fn atmosphere_vertices(
    central: &CentralBody,
    camera_position: Vec3,
    mesh: &UnitMesh,
    out: &mut Vec<VertexPositionColor>,
) {
    for v in &mesh.vertices {
        let world = v.position * central.atmosphere_radius;
        let to_camera = (camera_position - world).normalize_or_zero();
        let intensity = (0.7 - v.normal.dot(to_camera)).max(0.0).powi(2).min(1.0);
        let c = ATMOSPHERE_COLOR * intensity;
        out.push(VertexPositionColor::new(world, [c.x, c.y, c.z, intensity]));
    }
}
