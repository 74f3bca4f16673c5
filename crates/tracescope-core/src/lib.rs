pub mod error;
pub mod lineage;
pub mod parser;
pub mod resolver;
pub mod types;

// Re-export main types and functions
pub use error::{LineageError, ParseError, Position};
pub use lineage::LineageAccumulator;
pub use parser::{parse_sql, parse_sql_with_dialect};
pub use resolver::{extract_lineage, resolve, resolve_parsed};

pub use types::{
    Column, Dialect, LineageOptions, LineageRequest, LineageResult, QualifierPolicy, Table,
    DEFAULT_MAX_DEPTH,
};
