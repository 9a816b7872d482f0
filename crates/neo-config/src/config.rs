//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use neo_orbit::{KindFilter, SortOrder};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// Camera framing and input response.
    pub view: ViewConfig,
    /// Playback speed and pause.
    pub playback: PlaybackConfig,
    /// Placement tuning and static world.
    pub scene: SceneConfig,
    /// Record source and refresh.
    pub data: DataConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
    /// Base title; the object readout is appended at runtime.
    pub title: String,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial camera position, looking at the origin.
    pub start_position: [f32; 3],
    pub min_distance: f32,
    pub max_distance: f32,
    /// Share of pending camera motion applied per 60 Hz frame. 0 disables damping.
    pub damping: f32,
    pub rotate_sensitivity: f32,
    pub pan_sensitivity: f32,
    pub zoom_sensitivity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Speed multiplier at startup (simulated seconds per wall-clock second).
    pub initial_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Ladder used by the preset-step keys.
    pub presets: Vec<f64>,
    pub start_paused: bool,
    /// Kind filter at startup.
    pub filter: KindFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Distance of the closest possible orbit.
    pub base_offset: f32,
    /// Scene units per decade of miss distance.
    pub distance_scale: f32,
    pub size_factor: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// km/s per radian per simulated second.
    pub velocity_normalization: f64,
    pub vertical_factor: f32,
    pub orbit_segments: u32,
    pub star_count: u32,
    pub star_seed: u64,
    /// Edge length of the star cube.
    pub star_extent: f32,
    pub central_radius: f32,
    pub atmosphere_radius: f32,
    /// Central body spin, radians per second.
    pub spin_rate: f32,
    /// Body tumble, radians per second.
    pub tumble_rate: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// JSON file of approach records. `None` uses the bundled sample catalog.
    pub source_path: Option<PathBuf>,
    /// Seconds between source pulls. 0 disables refreshing.
    pub refresh_interval_secs: u64,
    /// Records kept from each pull.
    pub max_records: usize,
    /// Order applied to each pull. `None` keeps source order.
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "NEO Orbit Viewer".to_string(),
            vsync: true,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 10_000.0,
            start_position: [0.0, 100.0, 200.0],
            min_distance: 50.0,
            max_distance: 500.0,
            damping: 0.05,
            rotate_sensitivity: 0.005,
            pan_sensitivity: 0.0015,
            zoom_sensitivity: 0.05,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_speed: 10.0,
            min_speed: -1000.0,
            max_speed: 1000.0,
            presets: vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0],
            start_paused: false,
            filter: KindFilter::All,
        }
    }
}

impl Default for SceneConfig {
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
            star_count: 10_000,
            star_seed: 0x0005_1000,
            star_extent: 2000.0,
            central_radius: 15.0,
            atmosphere_radius: 16.2,
            spin_rate: 0.06,
            tumble_rate: 0.6,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source_path: None,
            refresh_interval_secs: 300,
            max_records: 10,
            sort: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE_NAME), serialized)
            .map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Returns `Some(new_config)` if the file on disk differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let contents = std::fs::read_to_string(config_dir.join(CONFIG_FILE_NAME))
            .map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
