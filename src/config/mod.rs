//! Configuration module for websync
//!
//! Layers, lowest priority first:
//! 1. User config (`<config dir>/websync/config.toml`)
//! 2. Working directory config (`./websync.toml`)
//! 3. Files passed with `--config`, in order
//! 4. Environment variables (`WEBSYNC_*`)
//!
//! Missing files are skipped. A required key absent from every layer is a
//! startup error.

mod loader;
mod types;

pub use loader::{
    absolute_path, default_layer_paths, expand_home, with_env_overrides, ConfigWarning,
};
pub use types::{
    Config, ConfigFile, LocalSection, RemoteConfig, RemoteSection, RouteConfig, SyncSection,
    DEFAULT_IGNORE, DEFAULT_POLL_INTERVAL_MS,
};
