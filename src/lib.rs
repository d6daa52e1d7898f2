//! `upload-transform` accepts uploaded files over an API-key protected HTTP endpoint and applies
//! one fixed transform per file type:
//!
//! - **CSV** (`text/csv` or `.csv`): the mean of one numeric column. Rows that are too short or
//!   whose cell is not a number are skipped; the file fails only when no value parsed.
//! - **JSON** (`application/json` or `.json`): an array of `{"data": {...}}` person envelopes,
//!   filtered to names containing a substring (case-insensitive) with a minimum age, written back
//!   as JSON.
//!
//! Each request produces one text line per file. A failing file produces an error line and the
//! remaining files are still processed.
//!
//! ## Quick examples
//!
//! ```rust
//! use upload_transform::transform::{aggregate_csv, transform_json, PersonFilter};
//!
//! # fn main() -> Result<(), upload_transform::TransformError> {
//! let avg = aggregate_csv("eng,12\nops,4\n".as_bytes(), 1, "departments.csv")?;
//! assert_eq!(avg, 8.0);
//!
//! let people = r#"[{"data":{"name":"John","age":29}}]"#;
//! let out = transform_json(people.as_bytes(), "people.json", &PersonFilter::default())?;
//! assert_eq!(out, "[]");
//! # Ok(())
//! # }
//! ```
//!
//! CSV input is split on bare commas. Quoted fields are not recognized, so a comma inside a field
//! always starts a new cell.
//!
//! ## Modules
//!
//! - [`transform`]: the CSV aggregator and the JSON filter
//! - [`dispatch`]: file classification, per-file outcomes, observers
//! - [`processing`]: filter/reduce helpers the transforms are built on
//! - [`types`]: person record shapes
//! - [`metrics`]: process-wide file counters
//! - [`config`]: TOML + environment configuration
//! - [`server`]: `axum` router, upload handler, API-key gate
//! - [`error`]: error types

pub mod config;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod processing;
pub mod server;
pub mod transform;
pub mod types;

pub use error::{ServiceError, TransformError, TransformResult};
