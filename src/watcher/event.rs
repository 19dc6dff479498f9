//! Change events and daemon notices

use std::path::PathBuf;
use std::sync::Arc;

use notify::event::{EventKind, ModifyKind};

/// What happened to a watched path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File contents were written
    ContentModified,
    Created,
    Removed,
    Renamed,
    Metadata,
    Other,
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
                ChangeKind::ContentModified
            }
            EventKind::Modify(ModifyKind::Metadata(_)) => ChangeKind::Metadata,
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Renamed,
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            _ => ChangeKind::Other,
        }
    }
}

/// A single-path change delivered to a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn modified(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::ContentModified, path)
    }

    /// Split a backend event into one change per path
    pub fn from_notify(event: &notify::Event) -> Vec<ChangeEvent> {
        let kind = ChangeKind::from(&event.kind);
        event
            .paths
            .iter()
            .map(|path| ChangeEvent::new(kind, path.clone()))
            .collect()
    }

    pub fn is_content_change(&self) -> bool {
        self.kind == ChangeKind::ContentModified
    }
}

/// One-line notices emitted by the daemon, rendered as text or NDJSON
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DaemonEvent {
    WatchStarted {
        target: String,
        root: String,
    },
    TableWritten {
        source: String,
        output: String,
    },
    TableUnchanged {
        source: String,
        output: String,
    },
    RouteUnimplemented {
        path: String,
        name: String,
    },
    Synced {
        local: String,
        remote: String,
        url: Option<String>,
    },
    Offline {
        host: String,
        message: String,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl DaemonEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Human-readable single line
    pub fn to_line(&self) -> String {
        match self {
            DaemonEvent::WatchStarted { target, root } => format!("watching {target}: {root}"),
            DaemonEvent::TableWritten { source, output } => {
                format!("processed {source} -> {output}")
            }
            DaemonEvent::TableUnchanged { output, .. } => {
                format!("no change to {output}, not syncing")
            }
            DaemonEvent::RouteUnimplemented { path, name } => {
                format!("{name} handler not implemented ({path})")
            }
            DaemonEvent::Synced { local, remote, url } => match url {
                Some(url) => format!("synced {local} -> {url}"),
                None => format!("synced {local} -> {remote}"),
            },
            DaemonEvent::Offline { host, message } => {
                format!("error connecting to {host}: {message}. are you online?")
            }
            DaemonEvent::Error { message } => format!("error: {message}"),
            DaemonEvent::Shutdown => "shutting down".to_string(),
        }
    }
}

/// Where handlers send their notices
pub type EventSink = Arc<dyn Fn(DaemonEvent) + Send + Sync>;

/// A sink that drops every notice
pub fn null_sink() -> EventSink {
    Arc::new(|_| {})
}
