#![allow(dead_code)]

use tracescope_core::{extract_lineage, Column, LineageOptions, LineageRequest, LineageResult};

/// Extracts lineage with the default options, panicking on traversal errors.
pub fn lineage(sql: &str) -> LineageResult {
    lineage_with(sql, LineageOptions::default())
}

pub fn lineage_with(sql: &str, options: LineageOptions) -> LineageResult {
    let request = LineageRequest::new(sql).with_options(options);
    let result = extract_lineage(&request).expect("lineage should resolve");
    assert!(
        !result.has_errors(),
        "unexpected parse errors for {sql:?}: {:?}",
        result.errors
    );
    result
}

/// `(name, alias, owning_table)` triples, for compact assertions.
pub fn column_triples(result: &LineageResult) -> Vec<(&str, &str, &str)> {
    result
        .columns
        .iter()
        .map(|Column { name, alias, owning_table }| {
            (name.as_str(), alias.as_str(), owning_table.as_str())
        })
        .collect()
}
