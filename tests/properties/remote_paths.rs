//! Property tests for mirror-to-remote path mapping.

use std::path::PathBuf;
use std::sync::Arc;

use proptest::prelude::*;

use websync::transport::parent_dirs;
use websync::watcher::null_sink;
use websync::{FtpsConnector, MirrorWatcher, RemoteConfig};

fn watcher(root: &str) -> MirrorWatcher {
    MirrorWatcher::new(
        PathBuf::from(root),
        RemoteConfig {
            host: "localhost".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            public_url: None,
        },
        vec![".git".to_string()],
        Arc::new(FtpsConnector::new()),
        null_sink(),
    )
}

fn segments() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z0-9_]{1,8}(\\.json)?", 1..=5)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the remote path is the mirror-relative path, `/`-rooted.
    #[test]
    fn property_remote_path_strips_root(parts in segments()) {
        let watcher = watcher("/srv/webmirror");
        let mut local = PathBuf::from("/srv/webmirror");
        local.extend(&parts);

        let remote = watcher.remote_path(&local).unwrap();
        prop_assert_eq!(remote, format!("/{}", parts.join("/")));
    }

    /// PROPERTY: every ancestor directory is created, outermost first, never the file itself.
    #[test]
    fn property_parent_dirs_are_prefixes(parts in segments()) {
        let remote = format!("/{}", parts.join("/"));
        let dirs = parent_dirs(&remote);

        prop_assert_eq!(dirs.len(), parts.len() - 1);
        for (i, dir) in dirs.iter().enumerate() {
            prop_assert_eq!(dir, &format!("/{}", parts[..=i].join("/")));
            let dir_prefix = format!("{}/", dir);
            prop_assert!(remote.starts_with(&dir_prefix));
        }
    }

    /// PROPERTY: paths outside the mirror root are rejected, not mapped.
    #[test]
    fn property_outside_root_is_error(parts in segments()) {
        let watcher = watcher("/srv/webmirror");
        let mut local = PathBuf::from("/srv/other");
        local.extend(&parts);

        prop_assert!(watcher.remote_path(&local).is_err());
    }
}
