//! Lineage resolution over parsed SQL statements.
//!
//! The [`Resolver`] walks each statement depth-first, left to right, and
//! records every table and column reference it meets into a
//! [`LineageAccumulator`]. The work is split by concern:
//!
//! - `statements`: per statement-kind handlers (INSERT, UPDATE, DELETE, EXECUTE)
//! - `query`: query specifications, set operations, FROM/JOIN, select lists
//! - `expression`: boolean and scalar expression walkers
//! - `references`: table, column and procedure reference resolution
//!
//! All walkers thread an explicit `depth` so pathological nesting turns into
//! [`LineageError::DepthLimitExceeded`] instead of a stack overflow.

use crate::error::{LineageError, ParseError};
use crate::lineage::LineageAccumulator;
use crate::parser::parse_sql_with_dialect;
use crate::types::{LineageOptions, LineageRequest, LineageResult};
use sqlparser::ast::Statement;
#[cfg(feature = "tracing")]
use tracing::{debug, info_span};

mod expression;
mod query;
mod references;
mod statements;


/// Parses `request.sql` and extracts its lineage.
///
/// Parser failures come back as `Ok` with [`LineageResult::errors`] set and no
/// lineage; only traversal failures are returned as `Err`.
pub fn extract_lineage(request: &LineageRequest) -> Result<LineageResult, LineageError> {
    #[cfg(feature = "tracing")]
    let _span = info_span!("extract_lineage", dialect = ?request.dialect, sql_len = request.sql.len()).entered();
    let default_options = LineageOptions::default();
    let options = request.options.as_ref().unwrap_or(&default_options);

    match parse_sql_with_dialect(&request.sql, request.dialect) {
        Ok(statements) => resolve_parsed(&statements, Vec::new(), options),
        Err(err) => resolve_parsed(&[], vec![err], options),
    }
}

/// Resolves a statement list together with the errors its parser reported.
///
/// Any parse error short-circuits: the result carries the errors and nothing else.
pub fn resolve_parsed(
    statements: &[Statement],
    parse_errors: Vec<ParseError>,
    options: &LineageOptions,
) -> Result<LineageResult, LineageError> {
    if !parse_errors.is_empty() {
        #[cfg(feature = "tracing")]
        debug!(
            error_count = parse_errors.len(),
            "parser reported errors, skipping lineage"
        );
        return Ok(LineageResult::from_parse_errors(parse_errors));
    }
    resolve(statements, options)
}

/// Resolves the lineage of an already parsed statement list.
pub fn resolve(
    statements: &[Statement],
    options: &LineageOptions,
) -> Result<LineageResult, LineageError> {
    let resolver = Resolver::new(options);
    let mut acc = LineageAccumulator::new();

    for (_index, statement) in statements.iter().enumerate() {
        #[cfg(feature = "tracing")]
        let _stmt_span = info_span!("resolve_statement", index = _index).entered();
        resolver.resolve_statement(&mut acc, statement)?;
    }

    Ok(acc.into_result())
}

/// Stateless walker configuration; all mutable state lives in the accumulator.
pub(crate) struct Resolver<'a> {
    pub(crate) options: &'a LineageOptions,
    max_depth: usize,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(options: &'a LineageOptions) -> Self {
        Self {
            options,
            max_depth: options.effective_max_depth(),
        }
    }

    /// Returns the depth for the next nesting level, failing past the limit.
    pub(crate) fn descend(&self, depth: usize) -> Result<usize, LineageError> {
        if depth >= self.max_depth {
            #[cfg(feature = "tracing")]
            debug!(depth, limit = self.max_depth, "maximum nesting depth exceeded");
            return Err(LineageError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        Ok(depth + 1)
    }

    fn resolve_statement(
        &self,
        acc: &mut LineageAccumulator,
        statement: &Statement,
    ) -> Result<(), LineageError> {
        match statement {
            Statement::Query(query) => self.resolve_select_statement(acc, query),
            Statement::Insert(insert) => self.resolve_insert(acc, insert),
            Statement::Update {
                table,
                assignments,
                selection,
                ..
            } => self.resolve_update(acc, table, assignments, selection.as_ref()),
            Statement::Delete(delete) => self.resolve_delete(acc, delete),
            Statement::Execute {
                name, parameters, ..
            } => {
                self.resolve_execute(acc, name.as_ref(), parameters);
                Ok(())
            }
            _ => {
                #[cfg(feature = "tracing")]
                debug!("statement kind carries no lineage, skipping");
                Ok(())
            }
        }
    }
}
