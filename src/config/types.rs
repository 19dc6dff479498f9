//! Configuration type definitions

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{WebsyncError, WebsyncResult};
use crate::routes::{Route, RoutingTable, TableJob};
use crate::table::Projection;

use super::loader::{self, ConfigWarning};

/// Paths never mirrored (substring match)
pub const DEFAULT_IGNORE: &[&str] = &[".DS_Store", ".git"];

/// Idle poll of the daemon's main thread
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// `[local]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalSection {
    /// Root of the org source files
    pub source: Option<PathBuf>,
    /// Root of the tree mirrored to the remote host
    pub mirror: Option<PathBuf>,
}

/// `[remote]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteSection {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Base URL shown in sync notices
    pub public_url: Option<String>,
}

/// `[sync]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncSection {
    pub ignore: Option<Vec<String>>,
    pub poll_interval_ms: Option<u64>,
}

/// One `[[routes]]` entry
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RouteConfig {
    pub pattern: String,
    pub table: String,
    /// Relative paths resolve against the mirror root
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub numbered: bool,
    #[serde(default)]
    pub data_key: Option<String>,
    /// Recognise the file but do nothing with it
    #[serde(default)]
    pub unimplemented: bool,
}

impl RouteConfig {
    fn into_route(self, mirror_root: &Path) -> WebsyncResult<Route> {
        if self.unimplemented {
            return Ok(Route::unimplemented(self.pattern, self.table));
        }

        let output = self.output.ok_or_else(|| WebsyncError::MissingConfigKey {
            key: format!("routes.{}.output", self.pattern),
        })?;
        let output = expand_under(mirror_root, &output);

        let mut projection = Projection::default();
        if let Some(columns) = self.columns {
            projection = projection.with_columns(columns);
        }
        if self.numbered {
            projection = projection.numbered();
        }
        if let Some(key) = self.data_key {
            projection = projection.with_data_key(key);
        }

        Ok(Route::table(
            self.pattern,
            TableJob {
                table: self.table,
                output,
                projection,
            },
        ))
    }
}

fn expand_under(root: &Path, path: &Path) -> PathBuf {
    let expanded = loader::expand_home(path);
    if expanded.is_absolute() {
        expanded
    } else {
        root.join(expanded)
    }
}

/// One configuration layer as written on disk; every key optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub local: LocalSection,

    #[serde(default)]
    pub remote: RemoteSection,

    #[serde(default)]
    pub sync: SyncSection,

    #[serde(default)]
    pub routes: Option<Vec<RouteConfig>>,
}

impl ConfigFile {
    /// Load a single layer, collecting unknown-key warnings
    pub fn load_with_warnings(path: &Path) -> WebsyncResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load and merge every existing file in `paths`, later files winning
    pub fn load_layers(paths: &[PathBuf]) -> WebsyncResult<(Self, Vec<ConfigWarning>)> {
        loader::load_layers(paths)
    }

    /// Overlay `other` on `self` key by key
    pub fn merge(self, other: ConfigFile) -> ConfigFile {
        ConfigFile {
            local: LocalSection {
                source: other.local.source.or(self.local.source),
                mirror: other.local.mirror.or(self.local.mirror),
            },
            remote: RemoteSection {
                host: other.remote.host.or(self.remote.host),
                username: other.remote.username.or(self.remote.username),
                password: other.remote.password.or(self.remote.password),
                public_url: other.remote.public_url.or(self.remote.public_url),
            },
            sync: SyncSection {
                ignore: other.sync.ignore.or(self.sync.ignore),
                poll_interval_ms: other.sync.poll_interval_ms.or(self.sync.poll_interval_ms),
            },
            routes: other.routes.or(self.routes),
        }
    }

    /// Check required keys and build the runtime configuration
    pub fn resolve(self) -> WebsyncResult<Config> {
        let source_root = loader::absolute_path(&required(self.local.source, "local.source")?);
        let mirror_root = loader::absolute_path(&required(self.local.mirror, "local.mirror")?);

        let remote = RemoteConfig {
            host: required(self.remote.host, "remote.host")?,
            username: required(self.remote.username, "remote.username")?,
            password: required(self.remote.password, "remote.password")?,
            public_url: self.remote.public_url,
        };

        let routes = match self.routes {
            Some(entries) => RoutingTable::new(
                entries
                    .into_iter()
                    .map(|entry| entry.into_route(&mirror_root))
                    .collect::<WebsyncResult<Vec<_>>>()?,
            ),
            None => RoutingTable::builtin(&mirror_root),
        };

        let ignore = self
            .sync
            .ignore
            .unwrap_or_else(|| DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect());

        Ok(Config {
            source_root,
            mirror_root,
            remote,
            ignore,
            poll_interval: Duration::from_millis(
                self.sync.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            ),
            routes,
        })
    }
}

fn required<T>(value: Option<T>, key: &str) -> WebsyncResult<T> {
    value.ok_or_else(|| WebsyncError::MissingConfigKey {
        key: key.to_string(),
    })
}

/// Credentials and address of the remote store
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// `host` or `host:port`
    pub host: String,
    pub username: String,
    pub password: String,
    pub public_url: Option<String>,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("public_url", &self.public_url)
            .finish()
    }
}

/// Runtime configuration, built once at startup and handed to each component
#[derive(Debug, Clone)]
pub struct Config {
    pub source_root: PathBuf,
    pub mirror_root: PathBuf,
    pub remote: RemoteConfig,
    pub ignore: Vec<String>,
    pub poll_interval: Duration,
    pub routes: RoutingTable,
}

impl Config {
    /// Load every layer (defaults, `extra` files, environment) and resolve
    pub fn load(extra: &[PathBuf]) -> WebsyncResult<(Self, Vec<ConfigWarning>)> {
        if let Some(missing) = extra.iter().find(|path| !path.exists()) {
            return Err(WebsyncError::InvalidConfig {
                file: missing.clone(),
                message: "file not found".to_string(),
            });
        }

        let mut paths = loader::default_layer_paths();
        paths.extend(extra.iter().cloned());

        let (file, warnings) = ConfigFile::load_layers(&paths)?;
        let config = loader::with_env_overrides(file).resolve()?;
        Ok((config, warnings))
    }
}
