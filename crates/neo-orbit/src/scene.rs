//! Scene graph: the single owner of every visual object in the view.
//!
//! The static world (star cloud, central body, light rig) is built once in
//! [`SceneGraph::new`]. Per-record bodies and their orbit curves live in two
//! slot maps and are torn down and rebuilt wholesale by
//! [`SceneGraph::rebuild`]. Callers only ever see [`BodyKey`]s and
//! [`OrbitKey`]s; a key from before a rebuild resolves to `None`.

use glam::{Vec2, Vec3};
use slotmap::SlotMap;
use tracing::debug;

use crate::geometry::{BodyStyle, OrbitPlacement, OrbitTuning};
use crate::lighting::LightRig;
use crate::record::ApproachRecord;
use crate::starfield::{Star, StarfieldSpec};

slotmap::new_key_type! {
    /// Key of a [`Body`] in the scene graph.
    pub struct BodyKey;
    /// Key of an [`OrbitCurve`] in the scene graph.
    pub struct OrbitKey;
}

/// An orbiting body, one per displayed record.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub record_id: String,
    pub name: String,
    pub hazardous: bool,
    pub placement: OrbitPlacement,
    /// World position derived from the placement.
    pub position: Vec3,
    pub style: BodyStyle,
    /// Accumulated tumble around the body's x and y axes, radians.
    pub tumble: Vec2,
}

/// Static polyline of a body's path.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCurve {
    pub points: Vec<Vec3>,
    pub color: [f32; 3],
    pub opacity: f32,
}

/// One record's body and orbit curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScenePair {
    pub body: BodyKey,
    pub orbit: OrbitKey,
}

/// The planet at the origin, with a translucent atmosphere shell.
#[derive(Clone, Debug, PartialEq)]
pub struct CentralBody {
    pub radius: f32,
    pub atmosphere_radius: f32,
    /// Spin in radians per wall-clock second.
    pub spin_rate: f32,
    /// Current rotation about +Y, kept in `[0, 2π)`.
    pub spin: f32,
}

impl Default for CentralBody {
    fn default() -> Self {
        Self {
            radius: 15.0,
            atmosphere_radius: 16.2,
            spin_rate: 0.06,
            spin: 0.0,
        }
    }
}

/// Everything the scene needs to build itself.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSettings {
    pub orbit: OrbitTuning,
    pub stars: StarfieldSpec,
    pub central: CentralBody,
    pub lights: LightRig,
    /// Body tumble in radians per wall-clock second, applied while playing.
    pub tumble_rate: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            orbit: OrbitTuning::default(),
            stars: StarfieldSpec::default(),
            central: CentralBody::default(),
            lights: LightRig::default(),
            tumble_rate: 0.6,
        }
    }
}

/// Static elements, created once and never touched by data changes.
#[derive(Clone, Debug)]
pub struct StaticWorld {
    pub stars: Vec<Star>,
    pub central: CentralBody,
    pub lights: LightRig,
}

/// Owner of the static world and of all per-record objects.
pub struct SceneGraph {
    tuning: OrbitTuning,
    tumble_rate: f32,
    world: StaticWorld,
    bodies: SlotMap<BodyKey, Body>,
    orbits: SlotMap<OrbitKey, OrbitCurve>,
    /// Pairs in record order.
    pairs: Vec<ScenePair>,
    /// Bumped on every rebuild so renderers know when to re-upload curves.
    revision: u64,
}

impl SceneGraph {
    /// Build the static world. The scene starts with no records.
    pub fn new(settings: SceneSettings) -> Self {
        let stars = settings.stars.generate();
        debug!(stars = stars.len(), "static world built");
        Self {
            tuning: settings.orbit,
            tumble_rate: settings.tumble_rate,
            world: StaticWorld {
                stars,
                central: settings.central,
                lights: settings.lights,
            },
            bodies: SlotMap::with_key(),
            orbits: SlotMap::with_key(),
            pairs: Vec::new(),
            revision: 0,
        }
    }

    /// Replace every per-record object with a fresh one built from `records`,
    /// in the same order. The static world is left alone.
    pub fn rebuild(&mut self, records: &[ApproachRecord]) {
        self.bodies.clear();
        self.orbits.clear();
        self.pairs.clear();

        let count = records.len();
        for (index, record) in records.iter().enumerate() {
            let placement = self.tuning.place(record, index, count);
            let style = BodyStyle::for_record(record);
            let orbit = self.orbits.insert(OrbitCurve {
                points: self.tuning.orbit_path(placement.distance),
                color: style.path_color,
                opacity: style.path_opacity,
            });
            let body = self.bodies.insert(Body {
                record_id: record.id.clone(),
                name: record.name.clone(),
                hazardous: record.hazardous,
                placement,
                position: self.tuning.position(placement.angle, placement.distance),
                style,
                tumble: Vec2::ZERO,
            });
            self.pairs.push(ScenePair { body, orbit });
        }

        self.revision = self.revision.wrapping_add(1);
        debug!(count, revision = self.revision, "scene rebuilt");
    }

    /// Number of live body/orbit pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn live_bodies(&self) -> usize {
        self.bodies.len()
    }

    pub fn live_orbits(&self) -> usize {
        self.orbits.len()
    }

    pub fn pairs(&self) -> &[ScenePair] {
        &self.pairs
    }

    pub fn body(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key)
    }

    pub fn orbit(&self, key: OrbitKey) -> Option<&OrbitCurve> {
        self.orbits.get(key)
    }

    /// Bodies in record order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.pairs.iter().filter_map(|p| self.bodies.get(p.body))
    }

    /// Orbit curves in record order.
    pub fn orbits(&self) -> impl Iterator<Item = &OrbitCurve> {
        self.pairs.iter().filter_map(|p| self.orbits.get(p.orbit))
    }

    /// Snapshot of every placement, in record order.
    pub fn placements(&self) -> Vec<OrbitPlacement> {
        self.bodies().map(|b| b.placement).collect()
    }

    pub fn world(&self) -> &StaticWorld {
        &self.world
    }

    pub fn tuning(&self) -> &OrbitTuning {
        &self.tuning
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Move every body along its orbit by `dt_sim` simulated seconds.
    pub fn advance_bodies(&mut self, dt_sim: f64) {
        for pair in &self.pairs {
            if let Some(body) = self.bodies.get_mut(pair.body) {
                body.placement.advance(dt_sim);
                body.position = self
                    .tuning
                    .position(body.placement.angle, body.placement.distance);
            }
        }
    }

    /// Put every body back at its initial angle, as a fresh rebuild would.
    pub fn reset_angles(&mut self) {
        let count = self.pairs.len();
        for (index, pair) in self.pairs.iter().enumerate() {
            if let Some(body) = self.bodies.get_mut(pair.body) {
                body.placement.angle = OrbitTuning::initial_angle(index, count);
                body.position = self
                    .tuning
                    .position(body.placement.angle, body.placement.distance);
            }
        }
        debug!(count, "orbit angles reset");
    }

    /// Spin the central body and, unless paused, tumble every body.
    /// Both run on wall-clock time.
    pub fn animate(&mut self, dt_wall: f32, paused: bool) {
        let central = &mut self.world.central;
        central.spin =
            (central.spin + central.spin_rate * dt_wall).rem_euclid(std::f32::consts::TAU);

        if paused {
            return;
        }
        let step = self.tumble_rate * dt_wall;
        for pair in &self.pairs {
            if let Some(body) = self.bodies.get_mut(pair.body) {
                let t = body.tumble + Vec2::splat(step);
                body.tumble = Vec2::new(
                    t.x.rem_euclid(std::f32::consts::TAU),
                    t.y.rem_euclid(std::f32::consts::TAU),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::sample_catalog;

    fn small_scene() -> SceneGraph {
        SceneGraph::new(SceneSettings {
            stars: StarfieldSpec {
                count: 32,
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_new_scene_is_empty_with_static_world() {
        let scene = small_scene();
        assert!(scene.is_empty());
        assert_eq!(scene.world().stars.len(), 32);
        assert_eq!(scene.revision(), 0);
    }

    #[test]
    fn test_rebuild_creates_one_pair_per_record() {
        let mut scene = small_scene();
        let records = sample_catalog();
        scene.rebuild(&records);
        assert_eq!(scene.len(), records.len());
        assert_eq!(scene.live_bodies(), records.len());
        assert_eq!(scene.live_orbits(), records.len());
        let ids: Vec<&str> = scene.bodies().map(|b| b.record_id.as_str()).collect();
        let expected: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_rebuild_invalidates_old_keys() {
        let mut scene = small_scene();
        scene.rebuild(&sample_catalog());
        let old = scene.pairs()[0];
        scene.rebuild(&sample_catalog());
        assert!(scene.body(old.body).is_none());
        assert!(scene.orbit(old.orbit).is_none());
        assert!(scene.body(scene.pairs()[0].body).is_some());
    }

    #[test]
    fn test_shrinking_rebuild_leaves_no_orphans() {
        let mut scene = small_scene();
        let records = sample_catalog();
        scene.rebuild(&records);
        scene.rebuild(&records[..3]);
        assert_eq!(scene.live_bodies(), 3);
        assert_eq!(scene.live_orbits(), 3);
        scene.rebuild(&[]);
        assert_eq!(scene.live_bodies(), 0);
        assert_eq!(scene.live_orbits(), 0);
    }

    #[test]
    fn test_rebuild_keeps_static_world() {
        let mut scene = small_scene();
        let stars_before = scene.world().stars.clone();
        scene.rebuild(&sample_catalog());
        assert_eq!(scene.world().stars, stars_before);
    }

    #[test]
    fn test_revision_bumps_on_rebuild() {
        let mut scene = small_scene();
        scene.rebuild(&[]);
        scene.rebuild(&[]);
        assert_eq!(scene.revision(), 2);
    }

    #[test]
    fn test_advance_moves_positions() {
        let mut scene = small_scene();
        scene.rebuild(&sample_catalog());
        let before: Vec<Vec3> = scene.bodies().map(|b| b.position).collect();
        scene.advance_bodies(1.0);
        let after: Vec<Vec3> = scene.bodies().map(|b| b.position).collect();
        assert!(before.iter().zip(&after).all(|(a, b)| a != b));
    }

    #[test]
    fn test_reset_angles_restores_initial_placements() {
        let mut scene = small_scene();
        scene.rebuild(&sample_catalog());
        let fresh = scene.placements();
        let fresh_positions: Vec<Vec3> = scene.bodies().map(|b| b.position).collect();
        scene.advance_bodies(250.0);
        assert_ne!(scene.placements(), fresh);
        scene.reset_angles();
        assert_eq!(scene.placements(), fresh);
        let positions: Vec<Vec3> = scene.bodies().map(|b| b.position).collect();
        assert_eq!(positions, fresh_positions);
    }

    #[test]
    fn test_reversed_size_bounds_do_not_panic() {
        let mut scene = SceneGraph::new(SceneSettings {
            orbit: OrbitTuning {
                size_min: 3.0,
                size_max: 0.5,
                ..Default::default()
            },
            stars: StarfieldSpec {
                count: 4,
                ..Default::default()
            },
            ..Default::default()
        });
        scene.rebuild(&sample_catalog());
        assert!(scene.bodies().all(|b| (0.5..=3.0).contains(&b.placement.size)));
    }

    #[test]
    fn test_paused_animate_skips_tumble_but_spins_planet() {
        let mut scene = small_scene();
        scene.rebuild(&sample_catalog());
        scene.animate(0.5, true);
        assert!(scene.bodies().all(|b| b.tumble == Vec2::ZERO));
        assert!(scene.world().central.spin > 0.0);
        scene.animate(0.5, false);
        assert!(scene.bodies().all(|b| b.tumble.x > 0.0));
    }
}
