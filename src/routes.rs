//! Source-file routing
//!
//! Maps a changed source path to the table job that handles it. Routes are an
//! ordered list evaluated top to bottom; the first route whose pattern occurs
//! in the path wins.

use std::path::{Path, PathBuf};

use crate::table::Projection;

/// Table conversion for one source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableJob {
    /// Table name inside the source document (`#+NAME: tab:<table>`)
    pub table: String,
    /// Absolute path of the JSON output
    pub output: PathBuf,
    pub projection: Projection,
}

/// What happens when a route matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    Table(TableJob),
    /// Registered so the file is recognised, but no conversion exists yet
    Unimplemented { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Substring matched against the changed path
    pub pattern: String,
    pub action: RouteAction,
}

impl Route {
    pub fn table(pattern: impl Into<String>, job: TableJob) -> Self {
        Self {
            pattern: pattern.into(),
            action: RouteAction::Table(job),
        }
    }

    pub fn unimplemented(pattern: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            action: RouteAction::Unimplemented { name: name.into() },
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.to_string_lossy().contains(self.pattern.as_str())
    }
}

/// Ordered route list, first match wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

impl RoutingTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Routes for the four known source files, writing under `mirror_root`
    pub fn builtin(mirror_root: &Path) -> Self {
        let data_dir = mirror_root.join("data");
        Self::new(vec![
            Route::table(
                "todo.txt",
                TableJob {
                    table: "calls".to_string(),
                    output: data_dir.join("calls.json"),
                    projection: Projection::default().numbered(),
                },
            ),
            Route::table(
                "buy.txt",
                TableJob {
                    table: "buy".to_string(),
                    output: data_dir.join("buy.json"),
                    projection: Projection::default()
                        .with_columns(["item", "shops", "tags", "notes"]),
                },
            ),
            Route::unimplemented("read.txt", "books"),
            Route::unimplemented("restaurants.txt", "restaurants"),
        ])
    }

    pub fn resolve(&self, path: &Path) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(path))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Table jobs only, in route order
    pub fn table_jobs(&self) -> impl Iterator<Item = &TableJob> {
        self.routes.iter().filter_map(|route| match &route.action {
            RouteAction::Table(job) => Some(job),
            RouteAction::Unimplemented { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
