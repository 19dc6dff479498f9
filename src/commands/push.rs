use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use websync::watcher::null_sink;
use websync::{DaemonEvent, FtpsConnector, MirrorOutcome, MirrorWatcher};

use crate::output::print_event;

pub fn cmd_push(config_paths: &[PathBuf], file: &Path, json: bool) -> Result<()> {
    let config = super::load_config(config_paths)?;
    let watcher = MirrorWatcher::from_config(&config, Arc::new(FtpsConnector::new()), null_sink());
    let local = websync::config::absolute_path(file);

    match watcher.push(&local)? {
        MirrorOutcome::Synced { remote } => print_event(
            &DaemonEvent::Synced {
                local: local.display().to_string(),
                url: watcher.public_url(&remote),
                remote,
            },
            json,
        ),
        MirrorOutcome::Ignored => bail!("{} matches the ignore list", local.display()),
        MirrorOutcome::NotAFile => bail!("{} is not a file", local.display()),
        MirrorOutcome::Offline { message } => {
            print_event(
                &DaemonEvent::Offline {
                    host: config.remote.host.clone(),
                    message,
                },
                json,
            );
            bail!("remote store unreachable");
        }
    }
    Ok(())
}
