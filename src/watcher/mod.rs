//! File watchers and the daemon that runs them
//!
//! - `content`: org source changes -> table JSON in the mirror tree
//! - `mirror`: mirror tree changes -> remote store
//! - `daemon`: owns both watch targets, start/run/stop

mod content;
mod daemon;
mod event;
mod mirror;

pub use content::{ContentOutcome, ContentWatcher};
pub use daemon::{DaemonHandle, EventHandler, SyncDaemon, WatchTarget};
pub use event::{null_sink, ChangeEvent, ChangeKind, DaemonEvent, EventSink};
pub use mirror::{MirrorOutcome, MirrorWatcher};
