//! Working set of tables, columns and selection flags built during one
//! resolution pass.

use crate::types::{Column, LineageResult, Table};

/// Append-only container filled by the resolvers.
///
/// One accumulator belongs to exactly one statement list. It is consumed by
/// [`LineageAccumulator::into_result`] once traversal completes.
#[derive(Debug, Default)]
pub struct LineageAccumulator {
    tables: Vec<Table>,
    columns: Vec<Column>,
    is_distinct: bool,
    is_top: bool,
    is_top_percent: bool,
    top_count: u64,
}

impl LineageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table unless one with the same name exists; the first alias wins.
    pub fn add_table(&mut self, name: &str, alias: &str) {
        if self.tables.iter().any(|t| t.name == name) {
            return;
        }
        self.tables.push(Table {
            name: name.to_string(),
            alias: alias.to_string(),
        });
    }

    /// Registers a column unless the exact (name, alias, owner) triple exists.
    pub fn add_column(&mut self, name: &str, alias: &str, owning_table: &str) {
        let exists = self
            .columns
            .iter()
            .any(|c| c.name == name && c.alias == alias && c.owning_table == owning_table);
        if exists {
            return;
        }
        self.columns.push(Column {
            name: name.to_string(),
            alias: alias.to_string(),
            owning_table: owning_table.to_string(),
        });
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The only registered table, if exactly one exists.
    pub fn sole_table(&self) -> Option<&Table> {
        match self.tables.as_slice() {
            [table] => Some(table),
            _ => None,
        }
    }

    /// First registered table whose name or alias equals `qualifier`.
    pub fn find_table(&self, qualifier: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.name == qualifier || t.alias == qualifier)
    }

    pub fn mark_distinct(&mut self) {
        self.is_distinct = true;
    }

    /// Records a TOP filter. `count` is only stored when it is a literal.
    pub fn mark_top(&mut self, percent: bool, count: Option<u64>) {
        self.is_top = true;
        self.is_top_percent = percent;
        if let Some(count) = count {
            self.top_count = count;
        }
    }

    pub fn into_result(self) -> LineageResult {
        LineageResult {
            tables: self.tables,
            columns: self.columns,
            is_distinct: self.is_distinct,
            is_top: self.is_top,
            is_top_percent: self.is_top_percent,
            top_count: self.top_count,
            errors: Vec::new(),
        }
    }
}
