//! Change gate
//!
//! Writes a projected document only when its payload differs from what is
//! already on disk. Unchanged content never produces a write, so the mirror
//! watcher never sees an event for it.
//!
//! The read-compare-write sequence takes no lock; a concurrent writer to the
//! same output path can interleave with it.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{WebsyncError, WebsyncResult};
use crate::table::ProjectedDocument;

/// Result of passing a document through the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Output file rewritten with the new document
    Written,
    /// Payload identical to the persisted one; nothing written
    Unchanged,
}

/// Load the persisted output at `path`.
///
/// A missing or corrupt file is an error: outputs are expected to be seeded
/// before the first run.
pub fn load_persisted(path: &Path) -> WebsyncResult<Value> {
    let content = fs::read_to_string(path).map_err(|e| WebsyncError::PersistenceRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| WebsyncError::PersistenceRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Whether `document` carries the same payload as `persisted`
pub fn is_unchanged(document: &ProjectedDocument, persisted: &Value) -> WebsyncResult<bool> {
    let payload = document.payload()?;
    Ok(document.persisted_payload(persisted) == Some(&payload))
}

/// Compare `document` with the file at `output` and overwrite it if the payload changed
pub fn apply(document: &ProjectedDocument, output: &Path) -> WebsyncResult<GateOutcome> {
    let persisted = load_persisted(output)?;
    if is_unchanged(document, &persisted)? {
        tracing::debug!(output = %output.display(), "payload unchanged");
        return Ok(GateOutcome::Unchanged);
    }

    // In-place write: the mirror watcher only reacts to content modifications,
    // a rename-into-place would not reach it.
    let rendered = document.to_pretty_json()?;
    fs::write(output, rendered).map_err(|source| WebsyncError::PersistenceWrite {
        path: output.to_path_buf(),
        source,
    })?;
    tracing::debug!(output = %output.display(), "payload written");
    Ok(GateOutcome::Written)
}

/// Initial content for a not yet written output file
pub fn empty_payload(numbered: bool) -> Value {
    if numbered {
        Value::Object(serde_json::Map::new())
    } else {
        Value::Array(Vec::new())
    }
}

/// Create `output` holding an empty payload unless it already exists.
///
/// Returns whether a file was created.
pub fn seed(output: &Path, numbered: bool) -> WebsyncResult<bool> {
    if output.exists() {
        return Ok(false);
    }
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    let rendered = serde_json::to_string_pretty(&empty_payload(numbered))?;
    fs::write(output, rendered).map_err(|source| WebsyncError::PersistenceWrite {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(true)
}
