//! Source-file watcher
//!
//! Reacts to content changes of org files and runs the matching route:
//! parse the table, project it, and hand the result to the change gate.

use std::path::{Path, PathBuf};

use crate::error::WebsyncResult;
use crate::gate::{self, GateOutcome};
use crate::routes::{RouteAction, RoutingTable, TableJob};
use crate::table::{project, read_table, today};

use super::daemon::EventHandler;
use super::event::{ChangeEvent, DaemonEvent, EventSink};

/// Result of routing one source path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOutcome {
    Written { output: PathBuf },
    Unchanged { output: PathBuf },
    Unimplemented { name: String },
    /// No route matched
    Unrouted,
}

pub struct ContentWatcher {
    routes: RoutingTable,
    sink: EventSink,
}

impl ContentWatcher {
    pub fn new(routes: RoutingTable, sink: EventSink) -> Self {
        Self { routes, sink }
    }

    /// Run the first matching route for `path`
    pub fn process(&self, path: &Path) -> WebsyncResult<ContentOutcome> {
        let Some(route) = self.routes.resolve(path) else {
            return Ok(ContentOutcome::Unrouted);
        };
        tracing::debug!(path = %path.display(), pattern = %route.pattern, "route matched");

        match &route.action {
            RouteAction::Table(job) => run_job(job, path),
            RouteAction::Unimplemented { name } => Ok(ContentOutcome::Unimplemented {
                name: name.clone(),
            }),
        }
    }

    fn report(&self, path: &Path, outcome: WebsyncResult<ContentOutcome>) {
        let source = path.display().to_string();
        let event = match outcome {
            Ok(ContentOutcome::Written { output }) => DaemonEvent::TableWritten {
                source,
                output: output.display().to_string(),
            },
            Ok(ContentOutcome::Unchanged { output }) => DaemonEvent::TableUnchanged {
                source,
                output: output.display().to_string(),
            },
            Ok(ContentOutcome::Unimplemented { name }) => {
                DaemonEvent::RouteUnimplemented { path: source, name }
            }
            Ok(ContentOutcome::Unrouted) => return,
            Err(err) => DaemonEvent::Error {
                message: format!("{source}: {err}"),
            },
        };
        (self.sink)(event);
    }
}

fn run_job(job: &TableJob, source: &Path) -> WebsyncResult<ContentOutcome> {
    let table = read_table(source, &job.table)?;
    if table.columns.is_empty() {
        tracing::debug!(table = %job.table, source = %source.display(), "table not found");
    }

    let document = project(&table, &job.projection, today())?;
    let output = job.output.clone();
    match gate::apply(&document, &output)? {
        GateOutcome::Written => Ok(ContentOutcome::Written { output }),
        GateOutcome::Unchanged => Ok(ContentOutcome::Unchanged { output }),
    }
}

impl EventHandler for ContentWatcher {
    fn name(&self) -> &'static str {
        "content"
    }

    fn handle(&self, event: &ChangeEvent) {
        tracing::debug!(?event, "content event");
        if !event.is_content_change() {
            return;
        }
        let outcome = self.process(&event.path);
        self.report(&event.path, outcome);
    }
}
