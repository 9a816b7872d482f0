//! Background star cloud: a deterministic set of colored points scattered
//! through a cube around the scene origin.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One background star.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: Vec3,
    /// Brightness in `[0, 1]`.
    pub brightness: f32,
    /// RGB already scaled by brightness.
    pub color: [f32; 3],
}

/// Parameters of the star cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct StarfieldSpec {
    pub seed: u64,
    pub count: u32,
    /// Edge length of the cube the stars are scattered in.
    pub extent: f32,
}

impl Default for StarfieldSpec {
    fn default() -> Self {
        Self {
            seed: 0x0005_1000,
            count: 10_000,
            extent: 2000.0,
        }
    }
}

impl StarfieldSpec {
    /// Generate the stars. Same seed, same stars.
    pub fn generate(&self) -> Vec<Star> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let half = self.extent * 0.5;

        (0..self.count)
            .map(|_| {
                let position = Vec3::new(
                    (rng.random::<f32>() * 2.0 - 1.0) * half,
                    (rng.random::<f32>() * 2.0 - 1.0) * half,
                    (rng.random::<f32>() * 2.0 - 1.0) * half,
                );
                // Many dim, few bright.
                let raw: f32 = rng.random();
                let brightness = 0.35 + raw.powf(4.0) * 0.65;
                let tint = blackbody_to_rgb(3500.0 + raw * 9000.0);
                Star {
                    position,
                    brightness,
                    color: tint.map(|c| c * brightness),
                }
            })
            .collect()
    }
}

/// Approximate sRGB color of a blackbody at `temperature_k` Kelvin.
pub fn blackbody_to_rgb(temperature_k: f32) -> [f32; 3] {
    let t = temperature_k / 100.0;
    let r = if t <= 66.0 {
        1.0
    } else {
        (329.698_73 * (t - 60.0).powf(-0.133_204_76) / 255.0).clamp(0.0, 1.0)
    };
    let g = if t <= 66.0 {
        (99.470_8 * t.ln() - 161.119_57).clamp(0.0, 255.0) / 255.0
    } else {
        (288.122_17 * (t - 60.0).powf(-0.075_514_85) / 255.0).clamp(0.0, 1.0)
    };
    let b = if t >= 66.0 {
        1.0
    } else if t <= 19.0 {
        0.0
    } else {
        (138.517_73 * (t - 10.0).ln() - 305.044_8).clamp(0.0, 255.0) / 255.0
    };
    [r, g, b]
}
