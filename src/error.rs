//! Error types for websync
//!
//! Library errors use `thiserror`; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for websync operations
pub type WebsyncResult<T> = Result<T, WebsyncError>;

/// Main error type for websync operations
#[derive(Error, Debug)]
pub enum WebsyncError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A requested column is missing from a parsed record
    #[error("column '{column}' not found in row: {raw}")]
    Projection { column: String, raw: String },

    /// The previously persisted output could not be read or parsed
    #[error("cannot read previous output {path}: {message}")]
    PersistenceRead { path: PathBuf, message: String },

    /// The new output could not be written
    #[error("cannot write output {path}: {source}")]
    PersistenceWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Opening a transport session failed (offline, bad credentials)
    #[error("cannot connect to {host}: {message}")]
    TransportConnect { host: String, message: String },

    /// A transport operation failed after the session was opened
    #[error("transfer to {remote} failed: {message}")]
    Transport { remote: String, message: String },

    /// A required configuration key is absent from every layer
    #[error("missing required config key '{key}'")]
    MissingConfigKey { key: String },

    /// A configuration file failed to parse
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Registering a file watcher failed
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// A path handed to the mirror pipeline is not under the mirror root
    #[error("path '{path}' is outside mirror root '{root}'")]
    OutsideMirror { path: PathBuf, root: PathBuf },
}
