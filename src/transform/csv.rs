//! CSV column aggregation.
//!
//! Input is treated as bare delimited text:
//!
//! - no header row; every line is data
//! - no quoting or escaping, so a delimiter inside a field always splits it
//! - rows may have any width; rows too short for the target column are skipped
//! - blank lines are ignored
//!
//! Short rows and cells that do not parse as `f64` are logged and skipped. The file fails only
//! when nothing in the target column parsed.

use std::io::Read;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{TransformError, TransformResult};
use crate::processing::SampleStats;

/// Options for [`summarize_csv_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Zero-based index of the column to aggregate.
    pub column_index: usize,
    /// Single-byte field delimiter.
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            column_index: 1,
            delimiter: b',',
        }
    }
}

/// Result of aggregating one column, with row accounting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    /// Arithmetic mean of every parsed sample.
    pub mean: f64,
    /// Count/sum/min/max of the parsed samples.
    pub stats: SampleStats,
    /// Non-blank rows read from the stream.
    pub rows_read: usize,
    /// Rows with too few cells to reach the column.
    pub skipped_short: usize,
    /// Rows whose target cell was not a number.
    pub skipped_unparsable: usize,
}

/// Average the numeric values in column `column_index` of comma-delimited `reader`.
///
/// `filename` is only used for diagnostics and error messages.
///
/// ```rust
/// use upload_transform::transform::aggregate_csv;
///
/// let input = "a,5\n b,10\nc,notanumber\n";
/// let avg = aggregate_csv(input.as_bytes(), 1, "sample.csv").unwrap();
/// assert_eq!(avg, 7.5);
/// ```
pub fn aggregate_csv<R: Read>(reader: R, column_index: usize, filename: &str) -> TransformResult<f64> {
    let options = CsvOptions {
        column_index,
        ..Default::default()
    };
    summarize_csv_column(reader, &options, filename).map(|s| s.mean)
}

/// Aggregate one column and report how many rows were used or skipped.
pub fn summarize_csv_column<R: Read>(
    reader: R,
    options: &CsvOptions,
    filename: &str,
) -> TransformResult<ColumnSummary> {
    let started = Instant::now();
    info!(filename, column_index = options.column_index, "starting CSV aggregation");

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let mut stats = SampleStats::new();
    let mut rows_read = 0usize;
    let mut skipped_short = 0usize;
    let mut skipped_unparsable = 0usize;
    let mut record = csv::ByteRecord::new();

    loop {
        let more = rdr.read_byte_record(&mut record).map_err(|e| TransformError::Io {
            filename: filename.to_owned(),
            source: e.into(),
        })?;
        if !more {
            break;
        }
        rows_read += 1;
        let line = record.position().map(|p| p.line()).unwrap_or(rows_read as u64);

        let Some(cell) = record.get(options.column_index) else {
            warn!(
                filename,
                line,
                cells = record.len(),
                "line does not have enough columns, skipping"
            );
            skipped_short += 1;
            continue;
        };

        match parse_sample(cell) {
            Some(v) => stats.push(v),
            None => {
                warn!(
                    filename,
                    line,
                    value = %String::from_utf8_lossy(cell),
                    "could not parse value as a number, skipping"
                );
                skipped_unparsable += 1;
            }
        }
    }

    let Some(mean) = stats.mean() else {
        warn!(filename, column_index = options.column_index, "no valid values found in column");
        return Err(TransformError::NoValidData {
            filename: filename.to_owned(),
            column_index: options.column_index,
        });
    };

    info!(
        filename,
        samples = stats.count,
        skipped_short,
        skipped_unparsable,
        average = mean,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "CSV aggregation completed"
    );

    Ok(ColumnSummary {
        mean,
        stats,
        rows_read,
        skipped_short,
        skipped_unparsable,
    })
}

fn parse_sample(cell: &[u8]) -> Option<f64> {
    std::str::from_utf8(cell).ok()?.trim().parse::<f64>().ok()
}
