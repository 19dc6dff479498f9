use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use websync::watcher::null_sink;
use websync::{read_table, ContentOutcome, ContentWatcher, DaemonEvent};

use crate::output::print_event;

pub fn cmd_convert(config_paths: &[PathBuf], file: &Path, json: bool) -> Result<()> {
    let config = super::load_config(config_paths)?;
    let watcher = ContentWatcher::new(config.routes, null_sink());
    let file = websync::config::absolute_path(file);
    let source = file.display().to_string();

    let event = match watcher.process(&file)? {
        ContentOutcome::Written { output } => DaemonEvent::TableWritten {
            source,
            output: output.display().to_string(),
        },
        ContentOutcome::Unchanged { output } => DaemonEvent::TableUnchanged {
            source,
            output: output.display().to_string(),
        },
        ContentOutcome::Unimplemented { name } => DaemonEvent::RouteUnimplemented {
            path: source,
            name,
        },
        ContentOutcome::Unrouted => bail!("no route matches {}", file.display()),
    };
    print_event(&event, json);
    Ok(())
}

/// Print the named table as JSON; needs no configuration
pub fn cmd_parse(file: &Path, table: &str) -> Result<()> {
    let table = read_table(&websync::config::absolute_path(file), table)?;
    println!("{}", serde_json::to_string_pretty(&table.records)?);
    Ok(())
}
