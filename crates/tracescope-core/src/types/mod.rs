//! Types for the lineage extraction API.
//!
//! The API accepts SQL text (or an already parsed statement list) and returns
//! the referenced tables and columns along with the selection flags.

mod request;
mod response;

pub use request::{Dialect, LineageOptions, LineageRequest, QualifierPolicy, DEFAULT_MAX_DEPTH};
pub use response::{Column, LineageResult, Table};
