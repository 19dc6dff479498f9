//! Org table parser
//!
//! A table region starts at a `#+NAME: tab:<name>` line and runs until the
//! first line that is not a `|` row. Inside the region the first real row is
//! the header; separator rows (`|---+---|`) and column width cookies (`<10>`,
//! `<>`) are skipped. The marker is a prefix: `tab:buy` also opens a region
//! named `tab:buy-2024`.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{Table, TableRecord};
use crate::error::WebsyncResult;

/// Prefix of the line naming a table region
pub const NAME_MARKER: &str = "#+NAME: tab:";

/// Leading character of every table row
pub const ROW_SIGIL: char = '|';

static WIDTH_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[0-9]*>").expect("width directive pattern is valid"));

/// Read `path` and parse the table named `name` from it
pub fn read_table(path: &Path, name: &str) -> WebsyncResult<Table> {
    let document = std::fs::read_to_string(path)?;
    Ok(parse_table(&document, name))
}

/// Parse the table named `name` out of `document`.
///
/// A missing region, or a region with nothing but a header, yields an empty
/// table rather than an error.
pub fn parse_table(document: &str, name: &str) -> Table {
    let mut table = Table {
        name: name.to_string(),
        ..Table::default()
    };

    for line in region_lines(document, name) {
        if !is_row(line) || WIDTH_DIRECTIVE.is_match(line) {
            continue;
        }

        let fields = split_row(line);
        if table.columns.is_empty() {
            table.columns = fields;
            continue;
        }

        let mut record = TableRecord::with_raw(line);
        for (key, value) in table.columns.iter().zip(fields) {
            record.push(key.clone(), value);
        }
        table.records.push(record);
    }

    table
}

fn region_lines<'a>(document: &'a str, name: &str) -> Vec<&'a str> {
    let mut lines = Vec::new();
    let mut in_region = false;

    for line in document.trim().lines() {
        if !in_region {
            in_region = is_marker(line, name);
            continue;
        }
        if !line.starts_with(ROW_SIGIL) {
            break;
        }
        lines.push(line);
    }

    lines
}

/// `#+NAME: tab:buy` and `#+NAME: tab:buy-2024` both open the `buy` region
fn is_marker(line: &str, name: &str) -> bool {
    line.strip_prefix(NAME_MARKER)
        .is_some_and(|rest| rest.starts_with(name))
}

fn is_row(line: &str) -> bool {
    let bytes = line.as_bytes();
    match bytes.first() {
        Some(b'|') => bytes.get(1) != Some(&b'-'),
        _ => false,
    }
}

fn split_row(line: &str) -> Vec<String> {
    let pieces: Vec<&str> = line.split(ROW_SIGIL).collect();
    if pieces.len() < 2 {
        return Vec::new();
    }
    pieces[1..pieces.len() - 1]
        .iter()
        .map(|field| field.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TODO: &str = "\
* Calls
#+NAME: tab:calls
| <20>   |          |
| who    | about    |
|--------+----------|
| Alice  | taxes    |
| Bob    |          |
Some prose after the table.
| stray  | row      |
";

    #[test]
    fn test_parse_header_and_rows() {
        let table = parse_table(TODO, "calls");

        assert_eq!(table.columns, vec!["who", "about"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].get("who"), Some("Alice"));
        assert_eq!(table.records[0].get("about"), Some("taxes"));
        assert_eq!(table.records[1].get("about"), Some(""));
    }

    #[test]
    fn test_parse_keeps_raw_line() {
        let table = parse_table(TODO, "calls");
        assert_eq!(table.records[0].raw(), Some("| Alice  | taxes    |"));
    }

    #[test]
    fn test_region_ends_at_first_non_row_line() {
        let table = parse_table(TODO, "calls");
        assert!(table.records.iter().all(|r| r.get("who") != Some("stray")));
    }

    #[test]
    fn test_missing_table_is_empty() {
        let table = parse_table(TODO, "nope");
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
        assert_eq!(table.name, "nope");
    }

    #[test]
    fn test_header_only_region_is_empty() {
        let doc = "#+NAME: tab:buy\n|item|shops|\n|---|---|\n";
        let table = parse_table(doc, "buy");
        assert_eq!(table.columns, vec!["item", "shops"]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_marker_matches_name_prefix() {
        let doc = "#+NAME: tab:buy-2024\n|item|\n|Widget|\n";
        assert_eq!(parse_table(doc, "buy").len(), 1);
        assert_eq!(parse_table(doc, "buy-2024").len(), 1);
        assert!(parse_table(doc, "buying").is_empty());
    }

    #[test]
    fn test_empty_alignment_cookie_is_skipped() {
        let doc = "#+NAME: tab:buy\n| <> | <l> |\n|item|shops|\n|Widget|StoreA|\n";
        let table = parse_table(doc, "buy");
        assert_eq!(table.columns, vec!["item", "shops"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_only_first_region_is_read() {
        let doc = "#+NAME: tab:buy\n|item|\n|A|\n\n#+NAME: tab:buy\n|item|\n|B|\n";
        let table = parse_table(doc, "buy");
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].get("item"), Some("A"));
    }

    #[test]
    fn test_short_row_keeps_leading_cells() {
        let doc = "#+NAME: tab:buy\n|item|shops|tags|\n|Widget|StoreA|\n";
        let table = parse_table(doc, "buy");
        let record = &table.records[0];
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["item", "shops"]);
    }

    #[test]
    fn test_buy_scenario() {
        let doc = "#+NAME: tab:buy\n|item|shops|tags|notes|\n|Widget|StoreA|misc||\n";
        let table = parse_table(doc, "buy");
        assert_eq!(table.len(), 1);
        let record = &table.records[0];
        assert_eq!(record.get("item"), Some("Widget"));
        assert_eq!(record.get("shops"), Some("StoreA"));
        assert_eq!(record.get("tags"), Some("misc"));
        assert_eq!(record.get("notes"), Some(""));
    }

    #[test]
    fn test_bare_sigil_line_does_not_panic() {
        let doc = "#+NAME: tab:t\n|\n|a|\n|1|\n";
        let table = parse_table(doc, "t");
        assert_eq!(table.columns, vec!["a"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_read_table_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("buy.txt");
        std::fs::write(&path, "#+NAME: tab:buy\n|item|\n|Widget|\n").unwrap();

        let table = read_table(&path, "buy").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_read_table_missing_file_errors() {
        let dir = tempdir().unwrap();
        assert!(read_table(&dir.path().join("absent.txt"), "buy").is_err());
    }
}
