//! Per-file routing of uploads to the transforms.
//!
//! [`Dispatcher::process_files`] takes the uploads of one request and, strictly in order:
//!
//! - classifies each file by media type, falling back to the filename extension
//! - runs the CSV aggregation or the JSON filter
//! - reports the outcome to the configured [`TransformObserver`]
//! - returns one [`FileOutcome`] per file
//!
//! A failing file never aborts the others; its outcome renders as an error line. Use
//! [`render_response`] to join the outcomes into a response body.
//!
//! ```rust
//! use upload_transform::dispatch::{render_response, Dispatcher, UploadedFile};
//!
//! let dispatcher = Dispatcher::default();
//! let files = vec![
//!     UploadedFile::new("counts.csv", None, b"sales,4\nops,6\n".to_vec()),
//!     UploadedFile::new("notes.txt", Some("text/plain"), b"hello".to_vec()),
//! ];
//! let body = render_response(&dispatcher.process_files(&files));
//! assert_eq!(
//!     body,
//!     "CSV File 'counts.csv': Average Employee Count Per Department: 5\n\
//!      Unsupported file format for 'notes.txt'. Only CSV or JSON files are allowed."
//! );
//! ```

pub mod observability;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::error::{TransformError, TransformResult};
use crate::transform::{summarize_csv_column, transform_json, CsvOptions, PersonFilter};

pub use observability::{
    CompositeObserver, TracingObserver, TransformContext, TransformObserver, TransformSeverity, TransformStats,
};

/// Media type that selects the CSV transform.
pub const CSV_MEDIA_TYPE: &str = "text/csv";
/// Media type that selects the JSON transform.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Which transform a file goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Column aggregation.
    Csv,
    /// Person-list filter.
    Json,
}

impl FileKind {
    /// Parse a kind from a media type (case-insensitive, parameters ignored).
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case(CSV_MEDIA_TYPE) {
            Some(Self::Csv)
        } else if essence.eq_ignore_ascii_case(JSON_MEDIA_TYPE) {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Parse a kind from a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Classify an upload. The declared media type wins; the extension is the fallback.
    pub fn classify(media_type: Option<&str>, filename: &str) -> Option<Self> {
        media_type.and_then(Self::from_media_type).or_else(|| {
            filename
                .rsplit_once('.')
                .and_then(|(_, ext)| Self::from_extension(ext))
        })
    }
}

/// One uploaded file as handed over by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-supplied filename.
    pub filename: String,
    /// Declared media type, if any.
    pub content_type: Option<String>,
    /// Buffered body. `None` when the upload carried no content stream.
    pub content: Option<Vec<u8>>,
}

impl UploadedFile {
    /// Create an upload with a body.
    pub fn new(filename: impl Into<String>, content_type: Option<&str>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.map(str::to_owned),
            content: Some(content),
        }
    }
}

/// Result of processing one file.
#[derive(Debug)]
pub enum FileOutcome {
    /// CSV aggregation succeeded.
    Csv { filename: String, average: f64 },
    /// JSON filter succeeded.
    Json { filename: String, json: String },
    /// Neither CSV nor JSON; no transform ran.
    Unsupported { filename: String },
    /// The transform failed for this file.
    Failed { filename: String, error: TransformError },
}

impl FileOutcome {
    /// Filename the outcome refers to.
    pub fn filename(&self) -> &str {
        match self {
            Self::Csv { filename, .. }
            | Self::Json { filename, .. }
            | Self::Unsupported { filename }
            | Self::Failed { filename, .. } => filename,
        }
    }

    /// Returns `true` for [`FileOutcome::Failed`].
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv { filename, average } => {
                write!(f, "CSV File '{filename}': Average Employee Count Per Department: {average}")
            }
            Self::Json { filename, json } => write!(f, "JSON File '{filename}': {json}"),
            Self::Unsupported { filename } => write!(
                f,
                "Unsupported file format for '{filename}'. Only CSV or JSON files are allowed."
            ),
            Self::Failed { filename, error } => write!(f, "Error processing file '{filename}': {error}"),
        }
    }
}

/// Join outcomes into one response body, one line per file.
pub fn render_response(outcomes: &[FileOutcome]) -> String {
    outcomes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Options controlling dispatch.
///
/// Use [`Default`] for the stock column (index 1) and filter (`John`, 30).
#[derive(Clone)]
pub struct DispatchOptions {
    /// CSV aggregation options.
    pub csv: CsvOptions,
    /// JSON filter predicate.
    pub filter: PersonFilter,
    /// Optional observer for metrics/logging/alerts.
    pub observer: Option<Arc<dyn TransformObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: TransformSeverity,
}

impl fmt::Debug for DispatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchOptions")
            .field("csv", &self.csv)
            .field("filter", &self.filter)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            csv: CsvOptions::default(),
            filter: PersonFilter::default(),
            observer: None,
            alert_at_or_above: TransformSeverity::Critical,
        }
    }
}

/// Routes uploads to the transforms and reports outcomes.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    options: DispatchOptions,
}

impl Dispatcher {
    /// Create a dispatcher.
    pub fn new(options: DispatchOptions) -> Self {
        Self { options }
    }

    /// Options this dispatcher was built with.
    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Process every file in order.
    pub fn process_files(&self, files: &[UploadedFile]) -> Vec<FileOutcome> {
        files.iter().map(|f| self.process_file(f)).collect()
    }

    /// Classify and transform a single file.
    ///
    /// When an observer is configured this reports:
    ///
    /// - `on_unsupported` for files that are neither CSV nor JSON
    /// - `on_success` on success, with size and timing
    /// - `on_failure` on failure, with a computed severity
    /// - `on_alert` on failure when the severity is >= `alert_at_or_above`
    pub fn process_file(&self, file: &UploadedFile) -> FileOutcome {
        let observer = self.options.observer.as_ref();
        let Some(kind) = FileKind::classify(file.content_type.as_deref(), &file.filename) else {
            debug!(filename = %file.filename, content_type = ?file.content_type, "unsupported upload");
            if let Some(obs) = observer {
                obs.on_unsupported(&file.filename);
            }
            return FileOutcome::Unsupported {
                filename: file.filename.clone(),
            };
        };
        debug!(filename = %file.filename, ?kind, "classified upload");

        let ctx = TransformContext {
            filename: file.filename.clone(),
            kind,
        };
        let started = Instant::now();
        let result = self.run(kind, file);

        if let Some(obs) = observer {
            match &result {
                Ok(_) => obs.on_success(
                    &ctx,
                    TransformStats {
                        bytes: file.content.as_ref().map_or(0, Vec::len),
                        elapsed: started.elapsed(),
                    },
                ),
                Err(e) => {
                    let sev = TransformSeverity::for_error(e);
                    obs.on_failure(&ctx, sev, e);
                    if sev >= self.options.alert_at_or_above {
                        obs.on_alert(&ctx, sev, e);
                    }
                }
            }
        }

        result.unwrap_or_else(|error| FileOutcome::Failed {
            filename: file.filename.clone(),
            error,
        })
    }

    fn run(&self, kind: FileKind, file: &UploadedFile) -> TransformResult<FileOutcome> {
        let filename = file.filename.clone();
        let content = file
            .content
            .as_deref()
            .ok_or_else(|| TransformError::InvalidInput {
                filename: filename.clone(),
            })?;

        match kind {
            FileKind::Csv => summarize_csv_column(content, &self.options.csv, &filename)
                .map(|summary| FileOutcome::Csv {
                    filename,
                    average: summary.mean,
                }),
            FileKind::Json => transform_json(content, &filename, &self.options.filter)
                .map(|json| FileOutcome::Json { filename, json }),
        }
    }
}
