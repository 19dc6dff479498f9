//! Remote store transport
//!
//! A [`Connector`] opens one [`Transport`] session per transferred file.
//! Sessions are never pooled or reused across events.

mod ftps;

use std::io::Read;

use crate::config::RemoteConfig;
use crate::error::WebsyncResult;

pub use ftps::FtpsConnector;

/// An open session with the remote store
pub trait Transport {
    /// Whether `path` names an existing remote directory
    fn dir_exists(&mut self, path: &str) -> WebsyncResult<bool>;

    /// Create a single remote directory; its parent must exist
    fn make_dir(&mut self, path: &str) -> WebsyncResult<()>;

    /// Store `reader` at `remote` in line (ASCII) mode
    fn store(&mut self, remote: &str, reader: &mut dyn Read) -> WebsyncResult<()>;

    /// End the session
    fn quit(&mut self) -> WebsyncResult<()>;
}

/// Opens transport sessions from configured credentials
pub trait Connector: Send + Sync {
    fn connect(&self, remote: &RemoteConfig) -> WebsyncResult<Box<dyn Transport>>;
}

/// Directories that must exist before `remote_path` can be stored, outermost first.
///
/// `/a/b/file.json` needs `/a` and `/a/b`.
pub fn parent_dirs(remote_path: &str) -> Vec<String> {
    let segments: Vec<&str> = remote_path.split('/').filter(|s| !s.is_empty()).collect();
    let absolute = remote_path.starts_with('/');

    let mut dirs = Vec::new();
    let mut current = String::new();
    for segment in segments.iter().take(segments.len().saturating_sub(1)) {
        if absolute || !current.is_empty() {
            current.push('/');
        }
        current.push_str(segment);
        dirs.push(current.clone());
    }
    dirs
}

/// Create each missing parent directory of `remote_path`.
///
/// A directory that appears between the existence check and the create
/// (another client, a racing event) counts as success.
pub fn ensure_remote_dirs(transport: &mut dyn Transport, remote_path: &str) -> WebsyncResult<()> {
    for dir in parent_dirs(remote_path) {
        if transport.dir_exists(&dir)? {
            continue;
        }
        if let Err(err) = transport.make_dir(&dir) {
            if transport.dir_exists(&dir)? {
                continue;
            }
            return Err(err);
        }
        tracing::debug!(dir = %dir, "created remote directory");
    }
    Ok(())
}
