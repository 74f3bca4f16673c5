//! Boolean and scalar expression walkers.

use super::Resolver;
use crate::error::LineageError;
use crate::lineage::LineageAccumulator;
use sqlparser::ast::{
    BinaryOperator, Expr, Function, FunctionArg, FunctionArgExpr, FunctionArguments,
    UnaryOperator,
};

fn is_comparison(op: &BinaryOperator) -> bool {
    matches!(
        op,
        BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq
    )
}

/// Operands of an AND/OR chain in source order.
///
/// The parser builds `a OR b OR c` left-deep, so the chain is unrolled here
/// and its length never counts against the nesting limit.
fn logical_operands(expr: &Expr) -> Vec<&Expr> {
    let mut operands = Vec::new();
    let mut pending = vec![expr];
    while let Some(next) = pending.pop() {
        match next {
            Expr::BinaryOp {
                left,
                op: BinaryOperator::And | BinaryOperator::Or,
                right,
            } => {
                pending.push(right.as_ref());
                pending.push(left.as_ref());
            }
            other => operands.push(other),
        }
    }
    operands
}

impl Resolver<'_> {
    /// Walks a search condition (WHERE, JOIN ... ON).
    ///
    /// Logical connectives recurse; predicates hand their operands to
    /// [`Self::resolve_scalar`]. Unknown predicate shapes contribute nothing.
    pub(super) fn resolve_boolean(
        &self,
        acc: &mut LineageAccumulator,
        expr: &Expr,
        depth: usize,
    ) -> Result<(), LineageError> {
        let depth = self.descend(depth)?;
        match expr {
            Expr::Nested(inner) => self.resolve_boolean(acc, inner, depth),
            Expr::BinaryOp {
                op: BinaryOperator::And | BinaryOperator::Or,
                ..
            } => {
                for operand in logical_operands(expr) {
                    self.resolve_boolean(acc, operand, depth)?;
                }
                Ok(())
            }
            Expr::BinaryOp { left, op, right } if is_comparison(op) => {
                self.resolve_scalar(acc, left, depth)?;
                self.resolve_scalar(acc, right, depth)
            }
            Expr::UnaryOp {
                op: UnaryOperator::Not,
                expr,
            } => self.resolve_boolean(acc, expr, depth),
            Expr::Between {
                expr, low, high, ..
            } => {
                self.resolve_scalar(acc, expr, depth)?;
                self.resolve_scalar(acc, low, depth)?;
                self.resolve_scalar(acc, high, depth)
            }
            Expr::IsNull(inner) | Expr::IsNotNull(inner) => self.resolve_scalar(acc, inner, depth),
            Expr::InList { expr, list, .. } => {
                self.resolve_scalar(acc, expr, depth)?;
                for item in list {
                    self.resolve_scalar(acc, item, depth)?;
                }
                Ok(())
            }
            Expr::InSubquery { expr, subquery, .. } => {
                self.resolve_scalar(acc, expr, depth)?;
                self.resolve_subquery(acc, subquery, depth)
            }
            Expr::Like { expr, pattern, .. } | Expr::ILike { expr, pattern, .. } => {
                self.resolve_scalar(acc, expr, depth)?;
                self.resolve_scalar(acc, pattern, depth)
            }
            Expr::Exists { subquery, .. } => self.resolve_subquery(acc, subquery, depth),
            _ => Ok(()),
        }
    }

    /// Walks a scalar operand: column references, scalar subqueries and
    /// parenthesized forms of either.
    pub(super) fn resolve_scalar(
        &self,
        acc: &mut LineageAccumulator,
        expr: &Expr,
        depth: usize,
    ) -> Result<(), LineageError> {
        match expr {
            Expr::Identifier(_) | Expr::CompoundIdentifier(_) => {
                self.resolve_column_expr(acc, expr, "")
            }
            Expr::Subquery(query) => {
                let depth = self.descend(depth)?;
                self.resolve_subquery(acc, query, depth)
            }
            Expr::Nested(inner) => {
                let depth = self.descend(depth)?;
                self.resolve_scalar(acc, inner, depth)
            }
            _ => Ok(()),
        }
    }

    /// Records column arguments of a select-list function call.
    ///
    /// Every column found, including those in nested calls, carries the alias
    /// of the enclosing select item.
    pub(super) fn resolve_function_call(
        &self,
        acc: &mut LineageAccumulator,
        function: &Function,
        alias: &str,
        depth: usize,
    ) -> Result<(), LineageError> {
        let depth = self.descend(depth)?;
        let FunctionArguments::List(arguments) = &function.args else {
            return Ok(());
        };

        for arg in &arguments.args {
            let expr = match arg {
                FunctionArg::Unnamed(FunctionArgExpr::Expr(expr))
                | FunctionArg::Named {
                    arg: FunctionArgExpr::Expr(expr),
                    ..
                } => expr,
                _ => continue,
            };
            match expr {
                Expr::Identifier(_) | Expr::CompoundIdentifier(_) => {
                    self.resolve_column_expr(acc, expr, alias)?
                }
                Expr::Function(nested) => self.resolve_function_call(acc, nested, alias, depth)?,
                _ => {}
            }
        }
        Ok(())
    }
}
