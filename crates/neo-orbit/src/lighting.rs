//! Light rig of the scene: ambient fill, a distant sun and a point light at
//! the central body. Shading is evaluated per vertex on the CPU.

use glam::Vec3;

/// Infinitely distant light.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Normalized direction pointing FROM the light toward the scene.
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

/// Localized light whose contribution fades smoothly to zero at `radius`.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// Beyond this distance the contribution is zero.
    pub radius: f32,
}

/// Falloff of a point light at `distance`, in `[0, 1]`.
///
/// Smooth window `(1 - (d/r)²)²` that reaches exactly zero at `radius`.
pub fn range_falloff(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }
    let ratio = distance / radius;
    let t = (1.0 - ratio * ratio).max(0.0);
    t * t
}

/// Ambient, sun and point light together.
#[derive(Clone, Debug, PartialEq)]
pub struct LightRig {
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub sun: DirectionalLight,
    pub point: PointLight,
}

impl Default for LightRig {
    fn default() -> Self {
        // Sun sits at (100, 50, 100) shining toward the origin.
        Self {
            ambient_color: Vec3::ONE,
            ambient_intensity: 0.4,
            sun: DirectionalLight {
                direction: -Vec3::new(100.0, 50.0, 100.0).normalize(),
                color: Vec3::ONE,
                intensity: 1.5,
            },
            point: PointLight {
                position: Vec3::ZERO,
                color: Vec3::ONE,
                intensity: 1.0,
                radius: 1000.0,
            },
        }
    }
}

impl LightRig {
    /// Lambert shading of a surface point. Emissive is added unlit.
    pub fn shade(
        &self,
        position: Vec3,
        normal: Vec3,
        albedo: [f32; 3],
        emissive: [f32; 3],
    ) -> [f32; 4] {
        let n = normal.normalize_or_zero();
        let mut light = self.ambient_color * self.ambient_intensity;

        let n_dot_sun = n.dot(-self.sun.direction).max(0.0);
        light += self.sun.color * self.sun.intensity * n_dot_sun;

        let to_point = self.point.position - position;
        let dist = to_point.length();
        if dist > 1e-4 {
            let n_dot_point = n.dot(to_point / dist).max(0.0);
            light += self.point.color
                * self.point.intensity
                * n_dot_point
                * range_falloff(dist, self.point.radius);
        }

        let base = Vec3::from(albedo) * light + Vec3::from(emissive);
        let c = base.clamp(Vec3::ZERO, Vec3::ONE);
        [c.x, c.y, c.z, 1.0]
    }
}
