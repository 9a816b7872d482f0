//! Orbit geometry: maps an approach record to a visual placement and a closed
//! orbit polyline.
//!
//! None of this is orbital mechanics. Distance is a log-compressed miss
//! distance so near and far objects share one screen, size is a clamped
//! diameter, and angular speed is a pacing knob that stays monotonic in
//! velocity.

use std::f64::consts::TAU;

use glam::Vec3;

use crate::record::{ApproachRecord, ObjectKind};

/// Tuning values for placement and path generation.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitTuning {
    /// Distance of a 1 km miss distance; keeps bodies outside the central body.
    pub base_offset: f32,
    /// Scene units per decade of miss distance.
    pub distance_scale: f32,
    /// Scene units per km of diameter before clamping.
    pub size_factor: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// km/s of relative velocity per radian per simulated second.
    pub velocity_normalization: f64,
    /// Amplitude of the vertical wobble as a fraction of distance.
    pub vertical_factor: f32,
    /// Samples on each orbit polyline.
    pub orbit_segments: u32,
}

impl Default for OrbitTuning {
    fn default() -> Self {
        Self {
            base_offset: 50.0,
            distance_scale: 10.0,
            size_factor: 0.3,
            size_min: 0.5,
            size_max: 3.0,
            velocity_normalization: 500.0,
            vertical_factor: 0.1,
            orbit_segments: 64,
        }
    }
}

/// Derived per-record rendering state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitPlacement {
    /// Radial distance from the central body in scene units.
    pub distance: f32,
    /// Visual radius in scene units, within `[size_min, size_max]`.
    pub size: f32,
    /// Angular position in radians, kept in `[0, 2π)`.
    pub angle: f64,
    /// Radians per simulated second.
    pub angular_speed: f64,
}

/// Mesh shape used for a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyShape {
    Sphere,
    Cone,
}

/// Presentation rule derived from the hazard flag and kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyStyle {
    /// Linear RGB body color.
    pub color: [f32; 3],
    /// Self-illumination added after lighting.
    pub emissive: [f32; 3],
    /// Orbit line color.
    pub path_color: [f32; 3],
    /// Orbit line opacity.
    pub path_opacity: f32,
    pub shape: BodyShape,
}

/// Convert a packed `0xRRGGBB` color to linear-ish float RGB.
pub const fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

impl BodyStyle {
    /// Style for a record. Depends only on the hazard flag and the kind.
    pub fn for_record(record: &ApproachRecord) -> Self {
        let shape = match record.kind {
            ObjectKind::Asteroid => BodyShape::Sphere,
            ObjectKind::Comet => BodyShape::Cone,
        };
        if record.hazardous {
            Self {
                color: rgb(0xff3333),
                emissive: rgb(0x661111),
                path_color: rgb(0xff6666),
                path_opacity: 0.45,
                shape,
            }
        } else {
            Self {
                color: rgb(0xaaaaaa),
                emissive: rgb(0x222222),
                path_color: rgb(0x4444ff),
                path_opacity: 0.3,
                shape,
            }
        }
    }
}

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

impl OrbitTuning {
    /// Radial distance for a miss distance in km. Strictly increasing for
    /// inputs above 1 km; anything at or below 1 km (including garbage) maps
    /// to `base_offset`.
    pub fn distance_for(&self, miss_distance_km: f64) -> f32 {
        let miss = if miss_distance_km.is_finite() {
            miss_distance_km.max(1.0)
        } else {
            1.0
        };
        self.base_offset + miss.log10() as f32 * self.distance_scale
    }

    /// Size clamp in ascending order. Reversed bounds are swapped; a
    /// non-finite bound falls back to the defaults.
    pub fn size_bounds(&self) -> (f32, f32) {
        let (a, b) = (self.size_min, self.size_max);
        if !(a.is_finite() && b.is_finite()) {
            let defaults = Self::default();
            return (defaults.size_min, defaults.size_max);
        }
        (a.min(b), a.max(b))
    }

    /// Visual size for a diameter in km.
    pub fn size_for(&self, diameter_km: f64) -> f32 {
        let (min, max) = self.size_bounds();
        let raw = diameter_km as f32 * self.size_factor;
        if raw.is_nan() {
            return min;
        }
        raw.clamp(min, max)
    }

    /// Angular speed for a velocity in km/s.
    pub fn angular_speed_for(&self, velocity_km_s: f64) -> f64 {
        if !velocity_km_s.is_finite() || self.velocity_normalization <= 0.0 {
            return 0.0;
        }
        velocity_km_s / self.velocity_normalization
    }

    /// Initial angle of record `index` out of `count`, spread evenly.
    pub fn initial_angle(index: usize, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        wrap_angle(index as f64 / count as f64 * TAU)
    }

    /// Build the placement of record `index` among `count` displayed records.
    pub fn place(&self, record: &ApproachRecord, index: usize, count: usize) -> OrbitPlacement {
        OrbitPlacement {
            distance: self.distance_for(record.miss_distance_km),
            size: self.size_for(record.diameter_km),
            angle: Self::initial_angle(index, count),
            angular_speed: self.angular_speed_for(record.velocity_km_s),
        }
    }

    /// Position on an orbit of radius `distance` at `angle`.
    pub fn position(&self, angle: f64, distance: f32) -> Vec3 {
        let a = angle as f32;
        Vec3::new(
            a.cos() * distance,
            (a * 0.5).sin() * distance * self.vertical_factor,
            a.sin() * distance,
        )
    }

    /// Closed orbit polyline: `orbit_segments + 1` points, the last equal to
    /// the first.
    ///
    /// Sampled over `[0, 2π)`. The `sin(angle / 2)` lift is zero at both
    /// ends, so wrapped body angles stay on the curve.
    pub fn orbit_path(&self, distance: f32) -> Vec<Vec3> {
        let segments = self.orbit_segments.max(3);
        let mut points: Vec<Vec3> = (0..segments)
            .map(|i| {
                let a = i as f64 / segments as f64 * TAU;
                self.position(a, distance)
            })
            .collect();
        points.push(points[0]);
        points
    }
}

impl OrbitPlacement {
    /// Advance the angle by `dt_sim` simulated seconds, wrapping into
    /// `[0, 2π)`.
    pub fn advance(&mut self, dt_sim: f64) {
        self.angle = wrap_angle(self.angle + self.angular_speed * dt_sim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::sample_catalog;

    fn record(miss: f64, diameter: f64, velocity: f64, hazardous: bool) -> ApproachRecord {
        ApproachRecord {
            id: "t".into(),
            name: "t".into(),
            diameter_km: diameter,
            velocity_km_s: velocity,
            miss_distance_km: miss,
            magnitude: 20.0,
            hazardous,
            close_approach_date: String::new(),
            kind: ObjectKind::Asteroid,
        }
    }

    #[test]
    fn test_distance_monotonic_in_miss_distance() {
        let tuning = OrbitTuning::default();
        let misses = [2.0, 10.0, 480_000.0, 26_758_428.0, 31_860_000.0, 96_000_000.0];
        for pair in misses.windows(2) {
            let near = tuning.distance_for(pair[0]);
            let far = tuning.distance_for(pair[1]);
            assert!(near < far, "{} -> {near} not < {} -> {far}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_distance_floor_handles_zero_and_negative() {
        let tuning = OrbitTuning::default();
        assert_eq!(tuning.distance_for(0.0), tuning.base_offset);
        assert_eq!(tuning.distance_for(-5.0), tuning.base_offset);
        assert_eq!(tuning.distance_for(f64::NAN), tuning.base_offset);
    }

    #[test]
    fn test_size_clamped_for_extreme_diameters() {
        let tuning = OrbitTuning::default();
        for d in [0.0, 1e-9, 1e9, f64::INFINITY, f64::MAX] {
            let s = tuning.size_for(d);
            assert!(
                (tuning.size_min..=tuning.size_max).contains(&s),
                "diameter {d} -> size {s} outside clamp"
            );
        }
        assert_eq!(tuning.size_for(1e-9), tuning.size_min);
        assert_eq!(tuning.size_for(1e9), tuning.size_max);
    }

    #[test]
    fn test_size_bounds_are_ordered() {
        let tuning = OrbitTuning {
            size_min: 3.0,
            size_max: 0.5,
            ..Default::default()
        };
        assert_eq!(tuning.size_bounds(), (0.5, 3.0));
        assert_eq!(tuning.size_for(1e9), 3.0);
        assert_eq!(tuning.size_for(0.0), 0.5);

        let broken = OrbitTuning {
            size_max: f32::NAN,
            ..Default::default()
        };
        let defaults = OrbitTuning::default();
        assert_eq!(broken.size_bounds(), (defaults.size_min, defaults.size_max));
    }

    #[test]
    fn test_angular_speed_monotonic_in_velocity() {
        let tuning = OrbitTuning::default();
        assert!(tuning.angular_speed_for(6.5) < tuning.angular_speed_for(30.73));
        assert_eq!(tuning.angular_speed_for(0.0), 0.0);
    }

    #[test]
    fn test_initial_angles_spread_evenly() {
        let n = 4;
        let angles: Vec<f64> = (0..n).map(|i| OrbitTuning::initial_angle(i, n)).collect();
        for (i, a) in angles.iter().enumerate() {
            let expected = i as f64 * std::f64::consts::FRAC_PI_2;
            assert!((a - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_position_lies_on_orbit_radius() {
        let tuning = OrbitTuning::default();
        let p = tuning.position(1.0, 100.0);
        let horizontal = (p.x * p.x + p.z * p.z).sqrt();
        assert!((horizontal - 100.0).abs() < 1e-3);
        assert!(p.y.abs() <= 100.0 * tuning.vertical_factor + 1e-4);
    }

    #[test]
    fn test_orbit_path_is_closed() {
        let tuning = OrbitTuning::default();
        let path = tuning.orbit_path(120.0);
        assert_eq!(path.len(), tuning.orbit_segments as usize + 1);
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn test_hazard_style_differs() {
        let hazardous = BodyStyle::for_record(&record(1e6, 1.0, 20.0, true));
        let benign = BodyStyle::for_record(&record(1e6, 1.0, 20.0, false));
        assert_ne!(hazardous.color, benign.color);
        assert_ne!(hazardous.path_color, benign.path_color);
        assert!(hazardous.path_opacity > benign.path_opacity);
    }

    #[test]
    fn test_comet_uses_cone() {
        let mut r = record(1e6, 1.0, 20.0, false);
        r.kind = ObjectKind::Comet;
        assert_eq!(BodyStyle::for_record(&r).shape, BodyShape::Cone);
    }

    #[test]
    fn test_place_is_deterministic() {
        let tuning = OrbitTuning::default();
        let records = sample_catalog();
        for (i, r) in records.iter().enumerate() {
            assert_eq!(tuning.place(r, i, records.len()), tuning.place(r, i, records.len()));
        }
    }

    #[test]
    fn test_wrap_angle_range() {
        for a in [-1e-18, -TAU, 0.0, TAU, 3.0 * TAU + 0.5, -7.25, 1e15] {
            let w = wrap_angle(a);
            assert!((0.0..TAU).contains(&w), "{a} wrapped to {w}");
        }
    }
}
