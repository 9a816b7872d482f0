use std::f64::consts::TAU;

use neo_orbit::{
    ApproachRecord, ControlCommand, ControlState, Frame, FrameError, FrameSink, OrbitView,
    RawApproachRecord, RenderLoop, SceneGraph, SceneSettings, StarfieldSpec, StepOutcome,
    ViewSettings, ViewportController, ViewportSettings, sample_catalog,
};

struct CountingSink {
    frames: usize,
    last_pair_count: usize,
}

impl FrameSink for CountingSink {
    fn submit(&mut self, frame: &Frame<'_>) -> Result<(), FrameError> {
        self.frames += 1;
        self.last_pair_count = frame.scene.len();
        Ok(())
    }
}

fn sink() -> CountingSink {
    CountingSink {
        frames: 0,
        last_pair_count: 0,
    }
}

fn scene() -> SceneGraph {
    SceneGraph::new(SceneSettings {
        stars: StarfieldSpec {
            count: 16,
            ..Default::default()
        },
        ..Default::default()
    })
}

fn raw(id: &str, diameter: f64, velocity: f64, miss: f64, hazardous: bool) -> RawApproachRecord {
    RawApproachRecord {
        id: Some(id.to_string()),
        diameter: Some(diameter),
        velocity: Some(velocity),
        miss_distance: Some(miss),
        hazardous: Some(hazardous),
        ..Default::default()
    }
}

/// Smallest angle between two wrapped angles.
fn angular_gap(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

#[test]
fn test_eros_and_apophis_placements() {
    let records: Vec<ApproachRecord> = [
        raw("433", 16.84, 24.36, 26_758_428.0, true),
        raw("99942", 0.37, 30.73, 31_860_000.0, true),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, r)| ApproachRecord::from_raw(r, i))
    .collect();

    let mut scene = scene();
    scene.rebuild(&records);
    let placements = scene.placements();
    assert_eq!(placements.len(), 2);

    let (eros, apophis) = (placements[0], placements[1]);
    assert!(eros.distance < apophis.distance, "{} !< {}", eros.distance, apophis.distance);
    assert!(eros.size > apophis.size, "{} !> {}", eros.size, apophis.size);

    let tuning = scene.tuning();
    for p in &placements {
        assert!((tuning.size_min..=tuning.size_max).contains(&p.size));
    }
    assert!(apophis.angular_speed > eros.angular_speed);
    assert!((apophis.angle - std::f64::consts::PI).abs() < 1e-12);
}

#[test]
fn test_pair_count_matches_record_count() {
    let catalog = sample_catalog();
    for n in [0, 1, 10] {
        let mut scene = scene();
        scene.rebuild(&catalog[..n]);
        assert_eq!(scene.len(), n);
        assert_eq!(scene.live_bodies(), n);
        assert_eq!(scene.live_orbits(), n);
        assert_eq!(scene.bodies().count(), n);
        assert_eq!(scene.orbits().count(), n);
    }
}

#[test]
fn test_empty_set_renders() {
    let mut view = OrbitView::new(ViewSettings {
        scene: SceneSettings {
            stars: StarfieldSpec {
                count: 16,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    });
    view.set_records(Vec::new());
    let mut out = sink();
    for _ in 0..5 {
        assert!(matches!(view.frame(0.016, &mut out), StepOutcome::Presented { .. }));
    }
    assert_eq!(out.frames, 5);
    assert_eq!(out.last_pair_count, 0);
    assert_eq!(view.readout().to_string(), "0 objects in orbit · 0 hazardous");
}

#[test]
fn test_reverse_playback_returns_to_start() {
    let mut scene = scene();
    scene.rebuild(&sample_catalog());
    let start = scene.placements();
    let mut viewport = ViewportController::new(ViewportSettings::default());
    let mut lp = RenderLoop::new();
    let mut out = sink();
    let mut controls = ControlState::default();

    controls.apply(ControlCommand::SetSpeed(-250.0));
    for _ in 0..120 {
        lp.step(0.05, controls.snapshot(), &mut scene, &mut viewport, &mut out);
    }
    let midway = scene.placements();
    assert!(
        start.iter().zip(&midway).any(|(a, b)| angular_gap(a.angle, b.angle) > 1e-3),
        "reverse speed did not move anything"
    );

    controls.apply(ControlCommand::Reverse);
    for _ in 0..120 {
        lp.step(0.05, controls.snapshot(), &mut scene, &mut viewport, &mut out);
    }
    for (a, b) in start.iter().zip(scene.placements()) {
        assert!(
            angular_gap(a.angle, b.angle) < 1e-9,
            "angle {} did not return to {}",
            b.angle,
            a.angle
        );
    }
    assert!(lp.clock().sim_time().abs() < 1e-9);
}

#[test]
fn test_reverse_moves_backwards() {
    let mut forward = scene();
    let mut backward = scene();
    let records = sample_catalog();
    forward.rebuild(&records);
    backward.rebuild(&records);
    forward.advance_bodies(0.5);
    backward.advance_bodies(-0.5);
    let start = scene_with(&records).placements();
    for ((s, f), b) in start.iter().zip(forward.placements()).zip(backward.placements()) {
        let ahead = (f.angle - s.angle).rem_euclid(TAU);
        let behind = (s.angle - b.angle).rem_euclid(TAU);
        assert!((ahead - behind).abs() < 1e-9);
    }
}

fn scene_with(records: &[ApproachRecord]) -> SceneGraph {
    let mut s = scene();
    s.rebuild(records);
    s
}

#[test]
fn test_pause_freezes_every_angle() {
    let mut scene = scene_with(&sample_catalog());
    let start = scene.placements();
    let mut viewport = ViewportController::new(ViewportSettings::default());
    let mut lp = RenderLoop::new();
    let mut out = sink();
    for speed in [-1000.0, -1.0, 0.5, 1000.0] {
        let mut controls = ControlState::default();
        controls.apply(ControlCommand::SetSpeed(speed));
        controls.apply(ControlCommand::TogglePause);
        for _ in 0..30 {
            lp.step(0.02, controls.snapshot(), &mut scene, &mut viewport, &mut out);
        }
    }
    assert_eq!(scene.placements(), start);
    assert_eq!(lp.clock().sim_time(), 0.0);
}

#[test]
fn test_idempotent_rebuild() {
    let records = sample_catalog();
    let mut scene = scene();
    scene.rebuild(&records);
    let first = scene.placements();
    let first_keys = scene.pairs().to_vec();
    scene.rebuild(&records);
    assert_eq!(scene.placements(), first);
    assert_eq!(scene.len(), first_keys.len());
    for old in first_keys {
        assert!(scene.body(old.body).is_none(), "stale key still resolves");
    }
}

#[test]
fn test_rebuild_after_motion_resets_angles() {
    let records = sample_catalog();
    let mut scene = scene_with(&records);
    let fresh = scene.placements();
    scene.advance_bodies(1234.5);
    scene.rebuild(&records);
    assert_eq!(scene.placements(), fresh);
}

#[test]
fn test_long_run_stays_bounded() {
    let mut scene = scene_with(&sample_catalog());
    for _ in 0..10_000 {
        scene.advance_bodies(1.0e6);
    }
    let tuning = scene.tuning().clone();
    for body in scene.bodies() {
        let p = body.placement;
        assert!((0.0..TAU).contains(&p.angle), "angle {} escaped [0, 2π)", p.angle);
        assert!(body.position.is_finite());
        let horizontal = (body.position.x.powi(2) + body.position.z.powi(2)).sqrt();
        assert!((horizontal - p.distance).abs() < 1e-2 * p.distance);
        assert!(body.position.y.abs() <= p.distance * tuning.vertical_factor + 1e-3);
    }
}

#[test]
fn test_malformed_records_still_build() {
    let records: Vec<ApproachRecord> = vec![
        RawApproachRecord::default(),
        raw("neg", -4.0, -1.0, -10.0, false),
        raw("nan", f64::NAN, f64::INFINITY, f64::NAN, true),
        raw("ok", 1.0, 10.0, 1.0e7, false),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, r)| ApproachRecord::from_raw(r, i))
    .collect();
    let scene = scene_with(&records);
    assert_eq!(scene.len(), 4);
    for p in scene.placements() {
        assert!(p.distance.is_finite() && p.size.is_finite());
        assert!(p.angular_speed.is_finite());
    }
}

#[test]
fn test_snapshot_is_taken_once_per_frame() {
    let mut view = OrbitView::new(ViewSettings {
        scene: SceneSettings {
            stars: StarfieldSpec {
                count: 4,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    });
    view.set_records(sample_catalog());
    view.command(ControlCommand::SetSpeed(2.0));
    let mut out = sink();
    match view.frame(0.1, &mut out) {
        StepOutcome::Presented { dt_sim } => assert!((dt_sim - 0.2).abs() < 1e-12),
        other => panic!("unexpected outcome {other:?}"),
    }
}
