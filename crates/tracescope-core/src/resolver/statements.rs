//! INSERT, UPDATE, DELETE and EXECUTE handlers.

use super::query::integer_literal;
use super::references::{object_base_name, object_name_parts};
use super::Resolver;
use crate::error::LineageError;
use crate::lineage::LineageAccumulator;
use sqlparser::ast::{
    Assignment, AssignmentTarget, Delete, Expr, FromTable, Insert, ObjectName, TableFactor,
    TableObject, TableWithJoins,
};
#[cfg(feature = "tracing")]
use tracing::debug;

impl Resolver<'_> {
    /// The target table, its column list (owned by the target regardless of
    /// how many tables are known), then the source query if any.
    pub(super) fn resolve_insert(
        &self,
        acc: &mut LineageAccumulator,
        insert: &Insert,
    ) -> Result<(), LineageError> {
        let target = match &insert.table {
            TableObject::TableName(name) => name,
            _ => {
                #[cfg(feature = "tracing")]
                debug!("insert into table function, skipping");
                return Ok(());
            }
        };
        self.resolve_table(acc, target, None);

        let owner = object_base_name(target);
        for column in &insert.columns {
            acc.add_column(&column.value, "", &owner);
        }

        if let Some(source) = &insert.source {
            self.resolve_subquery(acc, source, 0)?;
        }
        Ok(())
    }

    /// The target table, the assigned columns, then WHERE. Assigned values
    /// are not walked.
    pub(super) fn resolve_update(
        &self,
        acc: &mut LineageAccumulator,
        table: &TableWithJoins,
        assignments: &[Assignment],
        selection: Option<&Expr>,
    ) -> Result<(), LineageError> {
        self.resolve_table_with_joins(acc, table, 0)?;

        for assignment in assignments {
            match &assignment.target {
                AssignmentTarget::ColumnName(name) => self.resolve_assigned_column(acc, name)?,
                AssignmentTarget::Tuple(names) => {
                    for name in names {
                        self.resolve_assigned_column(acc, name)?;
                    }
                }
            }
        }

        if let Some(selection) = selection {
            self.resolve_boolean(acc, selection, 0)?;
        }
        Ok(())
    }

    fn resolve_assigned_column(
        &self,
        acc: &mut LineageAccumulator,
        name: &ObjectName,
    ) -> Result<(), LineageError> {
        let parts = object_name_parts(name);
        let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
        self.resolve_column_parts(acc, &parts, "")
    }

    /// The row-count filter, the target table, then WHERE.
    ///
    /// The row-count comes from `LIMIT`; it is never a percentage.
    pub(super) fn resolve_delete(
        &self,
        acc: &mut LineageAccumulator,
        delete: &Delete,
    ) -> Result<(), LineageError> {
        if let Some(limit) = &delete.limit {
            acc.mark_top(false, integer_literal(limit));
        }

        let from = match &delete.from {
            FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables) => tables,
        };
        match from.first() {
            Some(target) => {
                if let TableFactor::Table { name, alias, .. } = &target.relation {
                    self.resolve_table(acc, name, alias.as_ref());
                }
            }
            None => {
                if let Some(name) = delete.tables.first() {
                    self.resolve_table(acc, name, None);
                }
            }
        }

        if let Some(selection) = &delete.selection {
            self.resolve_boolean(acc, selection, 0)?;
        }
        Ok(())
    }

    /// Registers the procedure; arguments carry no lineage.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub(super) fn resolve_execute(
        &self,
        acc: &mut LineageAccumulator,
        name: Option<&ObjectName>,
        parameters: &[Expr],
    ) {
        let Some(name) = name else {
            return;
        };
        #[cfg(feature = "tracing")]
        debug!(parameter_count = parameters.len(), "procedure arguments ignored");
        self.resolve_execute_target(acc, name);
    }
}
