//! Org-mode table handling
//!
//! - `parser`: extracts a named table region and turns its rows into records
//! - `projector`: selects columns and wraps records into the JSON document
//!   written to the mirror tree

mod parser;
mod projector;

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use parser::{parse_table, read_table, NAME_MARKER, ROW_SIGIL};
pub use projector::{project, today, ProjectedDocument, Projection, DEFAULT_DATA_KEY};

/// JSON key holding the unparsed source line of a record
pub const RAW_KEY: &str = "_raw";

/// One table row: cells keyed by header column, in header order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRecord {
    fields: Vec<(String, String)>,
    raw: Option<String>,
}

impl TableRecord {
    /// Create an empty record that remembers its source line
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            raw: Some(raw.into()),
        }
    }

    /// Append a cell; keys keep insertion order
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// The source line this record was parsed from, if it still carries one
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for TableRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = self.fields.len() + usize::from(self.raw.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        if let Some(raw) = &self.raw {
            map.serialize_entry(RAW_KEY, raw)?;
        }
        map.end()
    }
}

struct TableRecordVisitor;

impl<'de> Visitor<'de> for TableRecordVisitor {
    type Value = TableRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of column names to cell strings")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut record = TableRecord::default();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            if key == RAW_KEY {
                record.raw = Some(value);
            } else {
                record.fields.push((key, value));
            }
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for TableRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TableRecordVisitor)
    }
}

/// Records extracted from one named region of a document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub name: String,
    /// Header columns, empty when the region was not found
    pub columns: Vec<String>,
    pub records: Vec<TableRecord>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
