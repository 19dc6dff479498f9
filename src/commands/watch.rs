use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use websync::{FtpsConnector, SyncDaemon};

use crate::output::printing_sink;

pub fn cmd_watch(config_paths: &[PathBuf], json: bool) -> Result<()> {
    let config = super::load_config(config_paths)?;

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl+C handler")?;

    let daemon = SyncDaemon::from_config(&config, Arc::new(FtpsConnector::new()), printing_sink(json));
    daemon.run(running).context("watcher failed to start")?;

    Ok(())
}
