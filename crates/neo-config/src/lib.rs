//! Configuration for the NEO orbit viewer.
//!
//! Settings persist to disk as `config.ron` in the platform config directory.
//! Every section carries `#[serde(default)]`, so older or partial files keep
//! loading. Command-line flags override what was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DataConfig, DebugConfig, PlaybackConfig, SceneConfig, ViewConfig,
    WindowConfig,
};
pub use error::ConfigError;
