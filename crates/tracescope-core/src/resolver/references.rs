//! Table, column and procedure reference resolution.

use super::Resolver;
use crate::error::LineageError;
use crate::lineage::LineageAccumulator;
use crate::types::QualifierPolicy;
use sqlparser::ast::{Expr, Ident, ObjectName, TableAlias};
#[cfg(feature = "tracing")]
use tracing::debug;

/// Splits an object name into its textual parts, outermost first.
pub(super) fn object_name_parts(name: &ObjectName) -> Vec<String> {
    name.0
        .iter()
        .map(|part| {
            part.as_ident()
                .map(|ident| ident.value.clone())
                .unwrap_or_else(|| part.to_string())
        })
        .collect()
}

/// The last part of an object name, dropping schema and database qualifiers.
pub(super) fn object_base_name(name: &ObjectName) -> String {
    object_name_parts(name).pop().unwrap_or_default()
}

/// T-SQL variables (`@id`, `@@ROWCOUNT`) look like identifiers but never name a column.
fn is_variable(ident: &Ident) -> bool {
    ident.quote_style.is_none() && ident.value.starts_with('@')
}

/// Textual parts of a column reference expression, if it is one.
pub(super) fn column_reference_parts(expr: &Expr) -> Option<Vec<&str>> {
    match expr {
        Expr::Identifier(ident) if !is_variable(ident) => Some(vec![ident.value.as_str()]),
        Expr::CompoundIdentifier(idents) => match idents.first() {
            Some(first) if is_variable(first) => None,
            Some(_) => Some(idents.iter().map(|i| i.value.as_str()).collect()),
            None => None,
        },
        _ => None,
    }
}

impl Resolver<'_> {
    pub(super) fn resolve_table(
        &self,
        acc: &mut LineageAccumulator,
        name: &ObjectName,
        alias: Option<&TableAlias>,
    ) {
        let table_name = object_base_name(name);
        let alias = alias.map(|a| a.name.value.as_str()).unwrap_or_default();
        #[cfg(feature = "tracing")]
        debug!(table = %table_name, alias, "table reference");
        acc.add_table(&table_name, alias);
    }

    /// Records a column reference expression; non-reference expressions are ignored.
    pub(super) fn resolve_column_expr(
        &self,
        acc: &mut LineageAccumulator,
        expr: &Expr,
        alias: &str,
    ) -> Result<(), LineageError> {
        match column_reference_parts(expr) {
            Some(parts) => self.resolve_column_parts(acc, &parts, alias),
            None => Ok(()),
        }
    }

    /// Resolves `[db.][schema.][table.]column` against the tables seen so far.
    ///
    /// Without a qualifier the owner is the sole registered table (or empty).
    /// With one, the owner is the first table whose name or alias matches it.
    pub(super) fn resolve_column_parts(
        &self,
        acc: &mut LineageAccumulator,
        parts: &[&str],
        alias: &str,
    ) -> Result<(), LineageError> {
        let Some((column, qualifiers)) = parts.split_last() else {
            return Ok(());
        };

        let owner = match qualifiers.last() {
            None => acc
                .sole_table()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            Some(qualifier) => match acc.find_table(qualifier) {
                Some(table) => table.name.clone(),
                None => match self.options.unresolved_qualifier {
                    QualifierPolicy::Fail => {
                        return Err(LineageError::UnresolvedQualifier {
                            qualifier: (*qualifier).to_string(),
                            column: (*column).to_string(),
                        });
                    }
                    QualifierPolicy::LeaveEmpty => {
                        #[cfg(feature = "tracing")]
                        debug!(qualifier, column, "qualifier matches no table, owner left empty");
                        String::new()
                    }
                },
            },
        };

        acc.add_column(column, alias, &owner);
        Ok(())
    }

    /// Registers an executed procedure as a table with no alias.
    pub(super) fn resolve_execute_target(&self, acc: &mut LineageAccumulator, name: &ObjectName) {
        let procedure = object_base_name(name);
        #[cfg(feature = "tracing")]
        debug!(procedure = %procedure, "procedure execution");
        acc.add_table(&procedure, "");
    }
}
