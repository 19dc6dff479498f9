//! Configuration loading and layering

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{WebsyncError, WebsyncResult};

use super::types::ConfigFile;

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load one layer and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> WebsyncResult<(ConfigFile, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: ConfigFile = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| WebsyncError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .iter()
        .map(|dotted| {
            // `remote.pasword` is reported as `pasword`
            let key = dotted.rsplit('.').next().unwrap_or(dotted.as_str());
            ConfigWarning {
                key: key.to_string(),
                file: path.to_path_buf(),
                line: find_line_number(&content, key),
                suggestion: suggest_key(key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Merge every existing file in `paths`, later files overriding earlier ones
pub fn load_layers(paths: &[PathBuf]) -> WebsyncResult<(ConfigFile, Vec<ConfigWarning>)> {
    let mut merged = ConfigFile::default();
    let mut warnings = Vec::new();

    for path in paths {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "config layer absent");
            continue;
        }
        let (layer, layer_warnings) = load_with_warnings(path)?;
        tracing::debug!(path = %path.display(), "config layer loaded");
        merged = merged.merge(layer);
        warnings.extend(layer_warnings);
    }

    Ok((merged, warnings))
}

/// User config followed by the working-directory config
pub fn default_layer_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("websync/config.toml"));
    }
    paths.push(PathBuf::from("websync.toml"));
    paths
}

/// Apply environment variable overrides (WEBSYNC_* prefix)
pub fn with_env_overrides(config: ConfigFile) -> ConfigFile {
    with_overrides_from(config, |name| std::env::var(name).ok())
}

pub(crate) fn with_overrides_from(
    mut config: ConfigFile,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigFile {
    if let Some(source) = lookup("WEBSYNC_SOURCE") {
        config.local.source = Some(PathBuf::from(source));
    }
    if let Some(mirror) = lookup("WEBSYNC_MIRROR") {
        config.local.mirror = Some(PathBuf::from(mirror));
    }
    if let Some(host) = lookup("WEBSYNC_HOST") {
        config.remote.host = Some(host);
    }
    if let Some(username) = lookup("WEBSYNC_USERNAME") {
        config.remote.username = Some(username);
    }
    if let Some(password) = lookup("WEBSYNC_PASSWORD") {
        config.remote.password = Some(password);
    }
    if let Some(url) = lookup("WEBSYNC_PUBLIC_URL") {
        config.remote.public_url = Some(url);
    }
    config
}

/// `~`-expanded and anchored at the working directory.
///
/// Watch backends report event paths under an absolute root, so roots
/// compared against those paths must be absolute too.
pub fn absolute_path(path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    std::path::absolute(&expanded).unwrap_or(expanded)
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|index| index + 1)
}

/// Every key a config file may contain, section names included
const KNOWN_KEYS: &[&str] = &[
    "local",
    "source",
    "mirror",
    "remote",
    "host",
    "username",
    "password",
    "public_url",
    "sync",
    "ignore",
    "poll_interval_ms",
    "routes",
    "pattern",
    "table",
    "output",
    "columns",
    "numbered",
    "data_key",
    "unimplemented",
];

/// Closest known key within two edits; ties go to the earlier key
fn suggest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|key| (edit_distance(unknown, key), *key))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, key)| key.to_string())
}

/// Levenshtein distance over chars with a single rolling row
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }

    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("password", "password"), 0);
        assert_eq!(edit_distance("pasword", "password"), 1);
        assert_eq!(edit_distance("mirorr", "mirror"), 2);
        assert_eq!(edit_distance("", "host"), 4);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_suggest_key_threshold() {
        assert_eq!(suggest_key("usernme"), Some("username".to_string()));
        assert_eq!(suggest_key("colums"), Some("columns".to_string()));
        assert_eq!(suggest_key("completely_unrelated"), None);
    }

    #[test]
    fn test_find_line_number_is_one_based() {
        assert_eq!(find_line_number("[remote]\nhost = 1\n", "host"), Some(2));
        assert_eq!(find_line_number("[remote]\n", "host"), None);
    }
}
