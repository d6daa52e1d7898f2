//! The two per-file transforms.
//!
//! Both take a reader plus the upload's filename (for diagnostics) and either return a result or
//! a [`crate::error::TransformError`]. Neither keeps state between calls.
//!
//! - [`csv`]: mean of one numeric column
//! - [`json`]: person-list filter

pub mod csv;
pub mod json;

pub use self::csv::{aggregate_csv, summarize_csv_column, ColumnSummary, CsvOptions};
pub use self::json::{transform_json, PersonFilter};
