//! Mapping from the persisted [`Config`] to engine settings.

use std::path::PathBuf;
use std::time::Duration;

use glam::Vec3;
use neo_config::{CliArgs, Config};
use neo_orbit::{
    CentralBody, LightRig, OrbitTuning, SceneSettings, SpeedRange, StarfieldSpec, ViewSettings,
    ViewportSettings,
};
use tracing::{info, warn};

pub fn scene_settings(config: &Config) -> SceneSettings {
    let s = &config.scene;
    SceneSettings {
        orbit: OrbitTuning {
            base_offset: s.base_offset,
            distance_scale: s.distance_scale,
            size_factor: s.size_factor,
            size_min: s.size_min,
            size_max: s.size_max,
            velocity_normalization: s.velocity_normalization,
            vertical_factor: s.vertical_factor,
            orbit_segments: s.orbit_segments,
        },
        stars: StarfieldSpec {
            seed: s.star_seed,
            count: s.star_count,
            extent: s.star_extent,
        },
        central: CentralBody {
            radius: s.central_radius,
            atmosphere_radius: s.atmosphere_radius,
            spin_rate: s.spin_rate,
            spin: 0.0,
        },
        lights: LightRig::default(),
        tumble_rate: s.tumble_rate,
    }
}

pub fn viewport_settings(config: &Config) -> ViewportSettings {
    let v = &config.view;
    ViewportSettings {
        fov_y_degrees: v.fov_y_degrees,
        near: v.near,
        far: v.far,
        start_position: Vec3::from(v.start_position),
        min_distance: v.min_distance,
        max_distance: v.max_distance,
        damping: v.damping,
        rotate_sensitivity: v.rotate_sensitivity,
        pan_sensitivity: v.pan_sensitivity,
        zoom_sensitivity: v.zoom_sensitivity,
    }
}

pub fn view_settings(config: &Config) -> ViewSettings {
    let p = &config.playback;
    ViewSettings {
        scene: scene_settings(config),
        viewport: viewport_settings(config),
        initial_speed: p.initial_speed,
        speed_range: SpeedRange::new(p.min_speed, p.max_speed),
        speed_presets: p.presets.clone(),
        start_paused: p.start_paused,
    }
}

/// Zero disables the refresh timer.
pub fn refresh_interval(config: &Config) -> Duration {
    Duration::from_secs(config.data.refresh_interval_secs)
}

/// Watches `config.ron` for edits made while the viewer runs.
///
/// Change detection compares against the file as last read, so CLI
/// overrides never count as a change; they are re-applied to every new
/// version of the file.
#[derive(Debug)]
pub struct ConfigWatch {
    dir: PathBuf,
    on_disk: Config,
    overrides: CliArgs,
}

impl ConfigWatch {
    pub fn new(dir: PathBuf, on_disk: Config, overrides: CliArgs) -> Self {
        Self {
            dir,
            on_disk,
            overrides,
        }
    }

    /// The effective config if the file changed since the last poll.
    /// A missing or unreadable file keeps the current settings.
    pub fn poll(&mut self) -> Option<Config> {
        match self.on_disk.reload(&self.dir) {
            Ok(Some(new)) => {
                info!(dir = %self.dir.display(), "config file changed");
                self.on_disk = new.clone();
                let mut effective = new;
                effective.apply_cli_overrides(&self.overrides);
                Some(effective)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "config reload failed, keeping current settings");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_engine_defaults() {
        let config = Config::default();
        let view = view_settings(&config);
        let engine = ViewSettings::default();
        assert_eq!(view.scene.orbit, engine.scene.orbit);
        assert_eq!(view.scene.central, engine.scene.central);
        assert_eq!(view.viewport, engine.viewport);
        assert_eq!(view.initial_speed, engine.initial_speed);
        assert_eq!(view.speed_range, engine.speed_range);
        assert_eq!(view.speed_presets, engine.speed_presets);
        assert_eq!(view.start_paused, engine.start_paused);
    }

    #[test]
    fn test_overrides_flow_through() {
        let mut config = Config::default();
        config.scene.star_count = 42;
        config.scene.orbit_segments = 128;
        config.view.max_distance = 900.0;
        config.playback.min_speed = 5.0;
        config.playback.max_speed = -5.0;
        let view = view_settings(&config);
        assert_eq!(view.scene.stars.count, 42);
        assert_eq!(view.scene.orbit.orbit_segments, 128);
        assert!((view.viewport.max_distance - 900.0).abs() < 1e-6);
        assert_eq!(view.speed_range, SpeedRange::new(-5.0, 5.0));
    }

    #[test]
    fn test_config_watch_reports_edits_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let on_disk = Config::default();
        on_disk.save(dir.path()).unwrap();
        let overrides = CliArgs {
            width: Some(640),
            ..Default::default()
        };
        let mut watch = ConfigWatch::new(dir.path().to_path_buf(), on_disk.clone(), overrides);
        assert!(watch.poll().is_none());

        let mut edited = on_disk;
        edited.scene.star_count = 500;
        edited.save(dir.path()).unwrap();
        let effective = watch.poll().unwrap();
        assert_eq!(effective.scene.star_count, 500);
        assert_eq!(effective.window.width, 640);
        assert!(watch.poll().is_none());
    }

    #[test]
    fn test_config_watch_survives_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut watch = ConfigWatch::new(
            dir.path().to_path_buf(),
            Config::default(),
            CliArgs::default(),
        );
        std::fs::write(dir.path().join(neo_config::CONFIG_FILE_NAME), "(((").unwrap();
        assert!(watch.poll().is_none());
    }

    #[test]
    fn test_refresh_interval() {
        let mut config = Config::default();
        assert_eq!(refresh_interval(&config), Duration::from_secs(300));
        config.data.refresh_interval_secs = 0;
        assert_eq!(refresh_interval(&config), Duration::ZERO);
    }
}
