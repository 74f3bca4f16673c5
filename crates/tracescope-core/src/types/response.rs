//! Response types for the lineage extraction API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A table (or executed procedure) referenced by the script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Base name, without schema or database qualifiers
    pub name: String,
    /// Alias from the first reference, empty if none
    pub alias: String,
}

/// A column referenced by the script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    /// Output alias from the select list, empty if none
    pub alias: String,
    /// Real name of the owning table, empty when it cannot be determined
    pub owning_table: String,
}

/// The lineage extracted from one statement list.
///
/// When `errors` is non-empty the parser rejected the input and `tables` and
/// `columns` are always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineageResult {
    /// Referenced tables in first-seen order
    pub tables: Vec<Table>,

    /// Referenced columns in first-seen order
    pub columns: Vec<Column>,

    /// A query specification selected DISTINCT rows
    pub is_distinct: bool,

    /// A TOP (or delete row-count) filter was present
    pub is_top: bool,

    /// The TOP filter was a percentage; only meaningful with `is_top`
    pub is_top_percent: bool,

    /// Literal TOP count, 0 when absent or not an integer literal
    pub top_count: u64,

    /// Parser errors that prevented extraction
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ParseError>,
}

impl LineageResult {
    /// Result for input the parser rejected: no tables, no columns.
    pub fn from_parse_errors(errors: Vec<ParseError>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
