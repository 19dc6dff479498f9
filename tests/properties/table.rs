//! Property tests for table parsing and projection.

use chrono::NaiveDate;
use proptest::prelude::*;

use websync::{parse_table, project, Projection};

fn cell() -> impl Strategy<Value = String> {
    // Printable, no pipes or width directives, no edge whitespace (cells are trimmed).
    proptest::string::string_regex("[A-Za-z0-9_.]{0,12}").unwrap()
}

fn headers() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set("[a-z]{1,8}", 1..=6).prop_map(|set| set.into_iter().collect())
}

/// Header plus rows that all have exactly one cell per column
fn full_table() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    headers().prop_flat_map(|headers| {
        let width = headers.len();
        (
            Just(headers),
            proptest::collection::vec(proptest::collection::vec(cell(), width), 0..=10),
        )
    })
}

fn render(name: &str, headers: &[String], rows: &[Vec<String>]) -> String {
    let mut doc = format!("* Notes\nsome text\n#+NAME: tab:{name}\n| {} |\n", headers.join(" | "));
    doc.push_str("|---+---|\n");
    for row in rows {
        doc.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    doc.push_str("\ntrailing paragraph\n");
    doc
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: every record carries exactly the header keys, in header order.
    #[test]
    fn property_record_keys_follow_header((headers, rows) in full_table()) {
        let table = parse_table(&render("t", &headers, &rows), "t");

        prop_assert_eq!(&table.columns, &headers);
        for record in &table.records {
            let keys: Vec<&str> = record.keys().collect();
            let expected: Vec<&str> = headers.iter().map(String::as_str).collect();
            prop_assert_eq!(keys, expected);
        }
    }

    /// PROPERTY: one record per data row, values in row order.
    #[test]
    fn property_record_count_matches_rows((headers, rows) in full_table()) {
        let table = parse_table(&render("t", &headers, &rows), "t");

        prop_assert_eq!(table.records.len(), rows.len());
        for (record, row) in table.records.iter().zip(&rows) {
            let values: Vec<&str> = record.fields().iter().map(|(_, v)| v.as_str()).collect();
            let expected: Vec<&str> = row.iter().map(String::as_str).collect();
            prop_assert_eq!(values, expected);
        }
    }

    /// PROPERTY: without a column filter, `data` is the parsed records, raw lines included.
    #[test]
    fn property_unfiltered_data_round_trips((headers, rows) in full_table()) {
        let table = parse_table(&render("t", &headers, &rows), "t");
        let doc = project(&table, &Projection::default(), date()).unwrap();

        let rendered: serde_json::Value =
            serde_json::from_str(&doc.to_pretty_json().unwrap()).unwrap();
        prop_assert_eq!(&rendered["data"], &serde_json::to_value(&table.records).unwrap());
        prop_assert_eq!(&rendered["metadata"]["last-updated"], "20240102");

        for (i, row) in rows.iter().enumerate() {
            let raw = format!("| {} |", row.join(" | "));
            prop_assert_eq!(rendered["data"][i]["_raw"].as_str(), Some(raw.as_str()));
        }
    }

    /// PROPERTY: projected records have exactly the requested columns, in requested order.
    #[test]
    fn property_projection_keeps_column_order(
        ((headers, rows), selected) in full_table().prop_flat_map(|(headers, rows)| {
            let len = headers.len();
            let pick = proptest::sample::subsequence(headers.clone(), 0..=len).prop_shuffle();
            (Just((headers, rows)), pick)
        })
    ) {
        let table = parse_table(&render("t", &headers, &rows), "t");
        let projection = Projection::default().with_columns(selected.clone());
        let doc = project(&table, &projection, date()).unwrap();

        for record in doc.records() {
            let keys: Vec<&str> = record.keys().collect();
            let expected: Vec<&str> = selected.iter().map(String::as_str).collect();
            prop_assert_eq!(keys, expected);
            prop_assert!(record.raw().is_none());
        }
    }

    /// PROPERTY: a different table name never picks up this region.
    #[test]
    fn property_other_name_yields_empty((headers, rows) in full_table()) {
        let table = parse_table(&render("t", &headers, &rows), "tt");
        prop_assert!(table.columns.is_empty());
        prop_assert!(table.records.is_empty());
    }

    /// PROPERTY: `parse_table` never panics on arbitrary input.
    #[test]
    fn property_parse_never_panics(document in "(?s).{0,512}", name in "[a-z]{0,6}") {
        let _ = parse_table(&document, &name);
    }
}
