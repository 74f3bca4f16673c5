//! Query specifications, set operations, FROM/JOIN sources and select lists.

use super::Resolver;
use crate::error::LineageError;
use crate::lineage::LineageAccumulator;
use sqlparser::ast::{
    Distinct, Expr, JoinConstraint, JoinOperator, Query, Select, SelectItem, SetExpr,
    TableFactor, TableWithJoins, Top, TopQuantity, Value, ValueWithSpan,
};
#[cfg(feature = "tracing")]
use tracing::debug;

/// Where a query body sits, which decides whether its DISTINCT/TOP count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryScope {
    /// Outermost query of a SELECT statement; selection flags are recorded.
    Statement,
    /// Nested under a predicate, a scalar operand or an INSERT; flags are ignored.
    Subquery,
}

/// The left-most query specification of a body, where SELECT ... INTO lives.
fn leading_select(mut body: &SetExpr) -> Option<&Select> {
    loop {
        match body {
            SetExpr::Select(select) => return Some(select.as_ref()),
            SetExpr::Query(query) => body = query.body.as_ref(),
            SetExpr::SetOperation { left, .. } => body = left.as_ref(),
            _ => return None,
        }
    }
}

/// Operands of a chain of set operations in source order.
///
/// `a UNION b UNION c` is left-deep; unrolling it keeps long chains from
/// counting against the nesting limit. Parenthesized operands stay whole.
fn set_operands(body: &SetExpr) -> Vec<&SetExpr> {
    let mut operands = Vec::new();
    let mut pending = vec![body];
    while let Some(next) = pending.pop() {
        match next {
            SetExpr::SetOperation { left, right, .. } => {
                pending.push(right.as_ref());
                pending.push(left.as_ref());
            }
            other => operands.push(other),
        }
    }
    operands
}

fn join_on_expr(join_operator: &JoinOperator) -> Option<&Expr> {
    let constraint = match join_operator {
        JoinOperator::Join(constraint)
        | JoinOperator::Inner(constraint)
        | JoinOperator::Left(constraint)
        | JoinOperator::LeftOuter(constraint)
        | JoinOperator::Right(constraint)
        | JoinOperator::RightOuter(constraint)
        | JoinOperator::FullOuter(constraint)
        | JoinOperator::CrossJoin(constraint)
        | JoinOperator::Semi(constraint)
        | JoinOperator::LeftSemi(constraint)
        | JoinOperator::RightSemi(constraint)
        | JoinOperator::Anti(constraint)
        | JoinOperator::LeftAnti(constraint)
        | JoinOperator::RightAnti(constraint)
        | JoinOperator::StraightJoin(constraint) => constraint,
        JoinOperator::AsOf { constraint, .. } => constraint,
        JoinOperator::CrossApply | JoinOperator::OuterApply => return None,
    };

    match constraint {
        JoinConstraint::On(expr) => Some(expr),
        _ => None,
    }
}

/// An integer literal, looking through one level of parentheses.
pub(super) fn integer_literal(expr: &Expr) -> Option<u64> {
    let expr = match expr {
        Expr::Nested(inner) => inner.as_ref(),
        other => other,
    };
    match expr {
        Expr::Value(ValueWithSpan {
            value: Value::Number(number, _),
            ..
        }) => number.parse().ok(),
        _ => None,
    }
}

fn top_count(top: &Top) -> Option<u64> {
    match top.quantity.as_ref()? {
        TopQuantity::Constant(count) => Some(*count),
        TopQuantity::Expr(expr) => integer_literal(expr),
    }
}

impl Resolver<'_> {
    /// Entry point for a SELECT statement.
    pub(super) fn resolve_select_statement(
        &self,
        acc: &mut LineageAccumulator,
        query: &Query,
    ) -> Result<(), LineageError> {
        if let Some(into) = leading_select(&query.body).and_then(|s| s.into.as_ref()) {
            self.resolve_table(acc, &into.name, None);
        }
        self.resolve_set_expr(acc, &query.body, QueryScope::Statement, 0)
    }

    /// Nested query (IN, EXISTS, scalar subquery, INSERT source).
    pub(super) fn resolve_subquery(
        &self,
        acc: &mut LineageAccumulator,
        query: &Query,
        depth: usize,
    ) -> Result<(), LineageError> {
        self.resolve_set_expr(acc, &query.body, QueryScope::Subquery, depth)
    }

    /// Resolves set operation operands left to right. VALUES and other
    /// non-select bodies contribute nothing.
    fn resolve_set_expr(
        &self,
        acc: &mut LineageAccumulator,
        body: &SetExpr,
        scope: QueryScope,
        depth: usize,
    ) -> Result<(), LineageError> {
        let depth = self.descend(depth)?;
        for operand in set_operands(body) {
            match operand {
                SetExpr::Select(select) => {
                    if scope == QueryScope::Statement {
                        self.record_selection_flags(acc, select);
                    }
                    self.resolve_query_body(acc, select, depth)?;
                }
                SetExpr::Query(query) => self.resolve_set_expr(acc, &query.body, scope, depth)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn record_selection_flags(&self, acc: &mut LineageAccumulator, select: &Select) {
        if matches!(select.distinct, Some(Distinct::Distinct)) {
            acc.mark_distinct();
        }
        if let Some(top) = &select.top {
            #[cfg(feature = "tracing")]
            debug!(percent = top.percent, "TOP row filter");
            acc.mark_top(top.percent, top_count(top));
        }
    }

    /// FROM first, then the select list, then WHERE. A body with no FROM
    /// (`SELECT @@IDENTITY`, `SELECT 1`) records nothing.
    fn resolve_query_body(
        &self,
        acc: &mut LineageAccumulator,
        select: &Select,
        depth: usize,
    ) -> Result<(), LineageError> {
        if select.from.is_empty() {
            return Ok(());
        }

        for table_with_joins in &select.from {
            self.resolve_table_with_joins(acc, table_with_joins, depth)?;
        }
        for item in &select.projection {
            self.resolve_select_item(acc, item, depth)?;
        }
        if let Some(selection) = &select.selection {
            self.resolve_boolean(acc, selection, depth)?;
        }
        Ok(())
    }

    /// Registers each joined table, immediately followed by its ON columns.
    pub(super) fn resolve_table_with_joins(
        &self,
        acc: &mut LineageAccumulator,
        table_with_joins: &TableWithJoins,
        depth: usize,
    ) -> Result<(), LineageError> {
        self.resolve_table_factor(acc, &table_with_joins.relation, depth)?;
        for join in &table_with_joins.joins {
            self.resolve_table_factor(acc, &join.relation, depth)?;
            if let Some(on) = join_on_expr(&join.join_operator) {
                self.resolve_boolean(acc, on, depth)?;
            }
        }
        Ok(())
    }

    fn resolve_table_factor(
        &self,
        acc: &mut LineageAccumulator,
        factor: &TableFactor,
        depth: usize,
    ) -> Result<(), LineageError> {
        match factor {
            TableFactor::Table { name, alias, .. } => {
                self.resolve_table(acc, name, alias.as_ref());
                Ok(())
            }
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => {
                let depth = self.descend(depth)?;
                self.resolve_table_with_joins(acc, table_with_joins, depth)
            }
            _ => {
                #[cfg(feature = "tracing")]
                debug!("table source is not a named table, skipping");
                Ok(())
            }
        }
    }

    fn resolve_select_item(
        &self,
        acc: &mut LineageAccumulator,
        item: &SelectItem,
        depth: usize,
    ) -> Result<(), LineageError> {
        let (expr, alias) = match item {
            SelectItem::UnnamedExpr(expr) => (expr, ""),
            SelectItem::ExprWithAlias { expr, alias } => (expr, alias.value.as_str()),
            _ => return Ok(()),
        };

        match expr {
            Expr::Identifier(_) | Expr::CompoundIdentifier(_) => {
                self.resolve_column_expr(acc, expr, alias)
            }
            Expr::Function(function) => self.resolve_function_call(acc, function, alias, depth),
            _ => Ok(()),
        }
    }
}
