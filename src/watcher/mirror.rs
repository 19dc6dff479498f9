//! Mirror-tree watcher
//!
//! Pushes every content change under the mirror root to the remote store.
//! Create, delete and rename events are not mirrored. A failed connection
//! drops the event; nothing is queued for later.

use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::config::{absolute_path, Config, RemoteConfig};
use crate::error::{WebsyncError, WebsyncResult};
use crate::transport::{ensure_remote_dirs, Connector, Transport};

use super::daemon::EventHandler;
use super::event::{ChangeEvent, DaemonEvent, EventSink};

/// Result of mirroring one local path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorOutcome {
    Synced { remote: String },
    /// Path contains an ignore-list substring
    Ignored,
    /// Path is gone or is not a regular file
    NotAFile,
    /// Session could not be opened; event dropped
    Offline { message: String },
}

pub struct MirrorWatcher {
    mirror_root: PathBuf,
    remote: RemoteConfig,
    ignore: Vec<String>,
    connector: Arc<dyn Connector>,
    sink: EventSink,
}

impl MirrorWatcher {
    pub fn new(
        mirror_root: PathBuf,
        remote: RemoteConfig,
        ignore: Vec<String>,
        connector: Arc<dyn Connector>,
        sink: EventSink,
    ) -> Self {
        Self {
            mirror_root: absolute_path(&mirror_root),
            remote,
            ignore,
            connector,
            sink,
        }
    }

    pub fn from_config(config: &Config, connector: Arc<dyn Connector>, sink: EventSink) -> Self {
        Self::new(
            config.mirror_root.clone(),
            config.remote.clone(),
            config.ignore.clone(),
            connector,
            sink,
        )
    }

    pub fn is_ignored(&self, local: &Path) -> bool {
        let local = local.to_string_lossy();
        self.ignore
            .iter()
            .any(|pattern| local.contains(pattern.as_str()))
    }

    /// Remote path of `local`: the mirror root prefix removed, `/`-separated
    pub fn remote_path(&self, local: &Path) -> WebsyncResult<String> {
        let relative =
            local
                .strip_prefix(&self.mirror_root)
                .map_err(|_| WebsyncError::OutsideMirror {
                    path: local.to_path_buf(),
                    root: self.mirror_root.clone(),
                })?;

        let mut remote = String::new();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                remote.push('/');
                remote.push_str(&part.to_string_lossy());
            }
        }
        if remote.is_empty() {
            remote.push('/');
        }
        Ok(remote)
    }

    /// Public URL shown for a pushed file, when a base is configured
    pub fn public_url(&self, remote: &str) -> Option<String> {
        self.remote
            .public_url
            .as_ref()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), remote))
    }

    /// Push one local file to the remote store
    pub fn push(&self, local: &Path) -> WebsyncResult<MirrorOutcome> {
        if self.is_ignored(local) {
            return Ok(MirrorOutcome::Ignored);
        }
        let remote = self.remote_path(local)?;
        if !local.is_file() {
            return Ok(MirrorOutcome::NotAFile);
        }

        let mut session = match self.connector.connect(&self.remote) {
            Ok(session) => session,
            Err(err) => {
                return Ok(MirrorOutcome::Offline {
                    message: err.to_string(),
                })
            }
        };

        let result = transfer(session.as_mut(), local, &remote);
        if let Err(err) = session.quit() {
            tracing::debug!(error = %err, "session quit failed");
        }
        result?;

        Ok(MirrorOutcome::Synced { remote })
    }

    fn report(&self, local: &Path, outcome: WebsyncResult<MirrorOutcome>) {
        let local_str = local.display().to_string();
        let event = match outcome {
            Ok(MirrorOutcome::Synced { remote }) => DaemonEvent::Synced {
                local: local_str,
                url: self.public_url(&remote),
                remote,
            },
            Ok(MirrorOutcome::Offline { message }) => DaemonEvent::Offline {
                host: self.remote.host.clone(),
                message,
            },
            Ok(MirrorOutcome::Ignored) | Ok(MirrorOutcome::NotAFile) => return,
            Err(err) => DaemonEvent::Error {
                message: format!("{local_str}: {err}"),
            },
        };
        (self.sink)(event);
    }
}

fn transfer(session: &mut dyn Transport, local: &Path, remote: &str) -> WebsyncResult<()> {
    ensure_remote_dirs(session, remote)?;
    let mut reader = BufReader::new(File::open(local)?);
    session.store(remote, &mut reader)
}

impl EventHandler for MirrorWatcher {
    fn name(&self) -> &'static str {
        "mirror"
    }

    fn handle(&self, event: &ChangeEvent) {
        tracing::debug!(?event, "mirror event");
        if !event.is_content_change() {
            return;
        }
        let outcome = self.push(&event.path);
        self.report(&event.path, outcome);
    }
}
