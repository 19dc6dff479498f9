//! Table projection
//!
//! Turns a parsed [`Table`] into the document persisted under the mirror
//! root. Two shapes exist:
//!
//! ```text
//! wrapped:  {"metadata": {"last-updated": "20240131"}, "data": [ {...}, ... ]}
//! numbered: {"1": {...}, "2": {...}}
//! ```

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::{Table, TableRecord};
use crate::error::{WebsyncError, WebsyncResult};

/// Key holding the records of a wrapped document unless a route overrides it
pub const DEFAULT_DATA_KEY: &str = "data";

/// How a table is shaped into its output document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Columns to keep, in output order; `None` keeps every column and the raw line
    pub columns: Option<Vec<String>>,
    /// Emit `{"1": record, ...}` without metadata
    pub numbered: bool,
    pub data_key: String,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            columns: None,
            numbered: false,
            data_key: DEFAULT_DATA_KEY.to_string(),
        }
    }
}

impl Projection {
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    pub fn with_data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = key.into();
        self
    }
}

/// A document ready to be compared and written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectedDocument {
    Wrapped {
        last_updated: String,
        data_key: String,
        records: Vec<TableRecord>,
    },
    Numbered {
        records: Vec<TableRecord>,
    },
}

#[derive(Serialize)]
struct Metadata<'a> {
    #[serde(rename = "last-updated")]
    last_updated: &'a str,
}

impl Serialize for ProjectedDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ProjectedDocument::Wrapped {
                last_updated,
                data_key,
                records,
            } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(
                    "metadata",
                    &Metadata {
                        last_updated: last_updated.as_str(),
                    },
                )?;
                map.serialize_entry(data_key, records)?;
                map.end()
            }
            ProjectedDocument::Numbered { records } => {
                let mut map = serializer.serialize_map(Some(records.len()))?;
                for (n, record) in records.iter().enumerate() {
                    map.serialize_entry(&(n + 1).to_string(), record)?;
                }
                map.end()
            }
        }
    }
}

impl ProjectedDocument {
    pub fn records(&self) -> &[TableRecord] {
        match self {
            ProjectedDocument::Wrapped { records, .. } | ProjectedDocument::Numbered { records } => {
                records
            }
        }
    }

    /// The part of the document that takes part in change detection.
    ///
    /// Metadata is left out so a new day alone never counts as a change.
    pub fn payload(&self) -> WebsyncResult<Value> {
        match self {
            ProjectedDocument::Wrapped { records, .. } => Ok(serde_json::to_value(records)?),
            ProjectedDocument::Numbered { .. } => Ok(serde_json::to_value(self)?),
        }
    }

    /// Locate the payload inside a previously written document of the same shape
    pub fn persisted_payload<'a>(&self, persisted: &'a Value) -> Option<&'a Value> {
        match self {
            ProjectedDocument::Wrapped { data_key, .. } => persisted.get(data_key),
            ProjectedDocument::Numbered { .. } => Some(persisted),
        }
    }

    /// Full document, 2-space indented
    pub fn to_pretty_json(&self) -> WebsyncResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Local calendar date used for the `last-updated` stamp
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Shape `table` according to `projection`.
///
/// Fails with [`WebsyncError::Projection`] when a requested column is missing
/// from any record.
pub fn project(
    table: &Table,
    projection: &Projection,
    today: NaiveDate,
) -> WebsyncResult<ProjectedDocument> {
    let records = match &projection.columns {
        Some(columns) => table
            .records
            .iter()
            .map(|record| select_columns(record, columns))
            .collect::<WebsyncResult<Vec<_>>>()?,
        None => table.records.clone(),
    };

    if projection.numbered {
        return Ok(ProjectedDocument::Numbered { records });
    }

    Ok(ProjectedDocument::Wrapped {
        last_updated: today.format("%Y%m%d").to_string(),
        data_key: projection.data_key.clone(),
        records,
    })
}

fn select_columns(record: &TableRecord, columns: &[String]) -> WebsyncResult<TableRecord> {
    let mut selected = TableRecord::default();
    for column in columns {
        let value = record
            .get(column)
            .ok_or_else(|| WebsyncError::Projection {
                column: column.clone(),
                raw: record.raw().unwrap_or_default().to_string(),
            })?;
        selected.push(column.clone(), value);
    }
    Ok(selected)
}
