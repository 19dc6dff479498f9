//! websync - keep a web mirror in step with plain-text notes
//!
//! Named org-mode tables in source files are projected to JSON documents in a
//! local mirror tree, and every change in that tree is pushed to a remote
//! FTPS store.

pub mod config;
pub mod error;
pub mod gate;
pub mod routes;
pub mod table;
pub mod transport;
pub mod watcher;

// Re-exports for convenience
pub use config::{Config, ConfigWarning, RemoteConfig};
pub use error::{WebsyncError, WebsyncResult};
pub use gate::GateOutcome;
pub use routes::{Route, RouteAction, RoutingTable, TableJob};
pub use table::{parse_table, project, read_table, ProjectedDocument, Projection, Table, TableRecord};
pub use transport::{Connector, FtpsConnector, Transport};
pub use watcher::{
    ContentOutcome, ContentWatcher, DaemonEvent, EventSink, MirrorOutcome, MirrorWatcher,
    SyncDaemon,
};
