//! Error types.
//!
//! A [`ParseError`] means the parser rejected the script. It is carried in
//! [`crate::types::LineageResult::errors`] and the result then holds no
//! lineage. A [`LineageError`] means the traversal of a parsed script could not
//! finish and is returned as `Err`.

use crate::types::Dialect;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Syntax error reported by `sqlparser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseError {
    pub message: String,
    /// Where the parser stopped, when its message says so.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<Dialect>,
}

/// 1-based line and column in the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// `sqlparser` appends `at Line: L, Column: C` to positioned errors.
fn trailing_position(message: &str) -> Option<Position> {
    static LOCATION: OnceLock<Regex> = OnceLock::new();
    let re = LOCATION.get_or_init(|| {
        Regex::new(r"Line:\s*(\d+)\s*,\s*Column:\s*(\d+)").expect("location pattern is valid")
    });
    let caps = re.captures(message)?;
    Some(Position {
        line: caps[1].parse().ok()?,
        column: caps[2].parse().ok()?,
    })
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            position: trailing_position(&message),
            message,
            dialect: None,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("syntax error")?;
        if let Some(dialect) = self.dialect {
            write!(f, " [{dialect:?}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<sqlparser::parser::ParserError> for ParseError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        Self::new(err.to_string())
    }
}

/// Failure of the lineage traversal itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineageError {
    /// A qualified column names a table or alias that has not been registered.
    #[error("column '{column}' is qualified by '{qualifier}', which matches no registered table or alias")]
    UnresolvedQualifier { qualifier: String, column: String },

    /// Subqueries, parenthesized expressions or nested joins went deeper than allowed.
    #[error("nesting depth exceeds the configured limit of {limit}")]
    DepthLimitExceeded { limit: usize },
}
