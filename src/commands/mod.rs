pub mod convert;
pub mod push;
pub mod seed;
pub mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use websync::Config;

use crate::output::print_config_warnings;

/// Load every config layer and report unknown keys on stderr
pub fn load_config(extra: &[PathBuf]) -> Result<Config> {
    let (config, warnings) = Config::load(extra).context("failed to load configuration")?;
    print_config_warnings(&warnings);
    tracing::debug!(
        source = %config.source_root.display(),
        mirror = %config.mirror_root.display(),
        routes = config.routes.len(),
        "configuration loaded"
    );
    Ok(config)
}
