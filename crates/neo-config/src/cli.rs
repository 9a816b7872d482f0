//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use neo_orbit::{KindFilter, SortOrder};

use crate::Config;

/// NEO orbit viewer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "neo-orbit", about = "Near-Earth-Object orbit viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Initial playback speed; negative runs time backwards.
    #[arg(long, allow_hyphen_values = true)]
    pub speed: Option<f64>,

    /// Start paused.
    #[arg(long)]
    pub paused: bool,

    /// Object kind filter (all, asteroid, comet).
    #[arg(long)]
    pub filter: Option<KindFilter>,

    /// Record order (closest, largest).
    #[arg(long)]
    pub sort: Option<SortOrder>,

    /// JSON file of approach records.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(speed) = args.speed {
            self.playback.initial_speed = speed;
        }
        if args.paused {
            self.playback.start_paused = true;
        }
        if let Some(filter) = args.filter {
            self.playback.filter = filter;
        }
        if let Some(sort) = args.sort {
            self.data.sort = Some(sort);
        }
        if let Some(ref path) = args.data {
            self.data.source_path = Some(path.clone());
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            speed: Some(-50.0),
            filter: Some(KindFilter::Asteroid),
            data: Some(PathBuf::from("neo.json")),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.playback.initial_speed, -50.0);
        assert_eq!(config.playback.filter, KindFilter::Asteroid);
        assert_eq!(config.data.source_path, Some(PathBuf::from("neo.json")));
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert!(!config.playback.start_paused);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_negative_speed_and_filter() {
        let args = CliArgs::try_parse_from([
            "neo-orbit",
            "--speed",
            "-250",
            "--filter",
            "comet",
            "--sort",
            "largest",
            "--paused",
        ])
        .unwrap();
        assert_eq!(args.speed, Some(-250.0));
        assert_eq!(args.filter, Some(KindFilter::Comet));
        assert_eq!(args.sort, Some(SortOrder::LargestFirst));
        assert!(args.paused);
    }

    #[test]
    fn test_cli_rejects_unknown_filter() {
        assert!(CliArgs::try_parse_from(["neo-orbit", "--filter", "moons"]).is_err());
    }
}
