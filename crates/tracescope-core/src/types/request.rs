//! Request types for the lineage extraction API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default recursion limit for subqueries, set operations and nested predicates.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// A request to extract table and column lineage from SQL text.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineageRequest {
    /// The SQL script (UTF-8, multi-statement supported)
    pub sql: String,

    /// SQL dialect used to parse `sql`
    #[serde(default)]
    pub dialect: Dialect,

    /// Optional resolution options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<LineageOptions>,
}

impl LineageRequest {
    /// Builds a request for the default dialect with default options.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            dialect: Dialect::default(),
            options: None,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_options(mut self, options: LineageOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// SQL dialect handed to the parser.
///
/// Lineage resolution is dialect-independent; the dialect only decides which
/// syntax the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Generic,
    Ansi,
    #[default]
    Mssql,
    Mysql,
    Postgres,
    Snowflake,
    Sqlite,
}

impl Dialect {
    pub fn to_sqlparser_dialect(&self) -> Box<dyn sqlparser::dialect::Dialect> {
        use sqlparser::dialect::{
            AnsiDialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
            SQLiteDialect, SnowflakeDialect,
        };
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::Ansi => Box::new(AnsiDialect {}),
            Self::Mssql => Box::new(MsSqlDialect {}),
            Self::Mysql => Box::new(MySqlDialect {}),
            Self::Postgres => Box::new(PostgreSqlDialect {}),
            Self::Snowflake => Box::new(SnowflakeDialect {}),
            Self::Sqlite => Box::new(SQLiteDialect {}),
        }
    }
}

/// What to do with a qualified column whose qualifier matches no registered
/// table name or alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub enum QualifierPolicy {
    /// Abort resolution with [`crate::LineageError::UnresolvedQualifier`].
    #[default]
    Fail,
    /// Record the column with an empty owning table and keep going.
    LeaveEmpty,
}

/// Options controlling lineage resolution.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct LineageOptions {
    /// Maximum nesting depth before resolution aborts (default 100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Handling of qualifiers that match no registered table
    #[serde(default)]
    pub unresolved_qualifier: QualifierPolicy,
}

impl LineageOptions {
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }
}
