//! The binary entry point for the NEO orbit viewer.

use clap::Parser;
use neo_app::platform::PlatformDirs;
use neo_app::settings::ConfigWatch;
use neo_app::source::{Selection, source_for};
use neo_config::{CliArgs, Config};
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(root) => PlatformDirs::with_root(root),
        None => match PlatformDirs::resolve() {
            Ok(dirs) => dirs,
            Err(e) => {
                eprintln!("Failed to resolve platform directories: {e}");
                std::process::exit(1);
            }
        },
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create {}: {e}", dirs.config_dir.display());
    }

    let on_disk = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    let mut config = on_disk.clone();
    config.apply_cli_overrides(&args);

    neo_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(config = %dirs.config_dir.display(), "NEO orbit viewer");

    let selection = Selection {
        max_records: config.data.max_records,
        sort: config.data.sort,
    };
    let source = source_for(config.data.source_path.as_deref(), selection);
    let watch = ConfigWatch::new(dirs.config_dir.clone(), on_disk, args);

    if let Err(e) = neo_app::window::run(config, source, Some(watch)) {
        error!("Event loop failed: {e}");
        std::process::exit(1);
    }
}
