use thiserror::Error;

/// Convenience result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Error type returned by the CSV and JSON transforms.
///
/// Every variant carries the uploaded filename so that a multi-file response can say which file
/// failed. Row-level anomalies (short CSV rows, unparsable cells) never surface here; they are
/// skipped and logged by the transform.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The upload carried no content stream.
    #[error("no content stream supplied for file '{filename}'")]
    InvalidInput { filename: String },

    /// No cell in the target column parsed as a number.
    #[error("no valid values found in column {column_index} of file '{filename}'")]
    NoValidData { filename: String, column_index: usize },

    /// The JSON document could not be parsed into person envelopes.
    #[error("error parsing JSON data for file '{filename}': {source}")]
    MalformedJson {
        filename: String,
        #[source]
        source: serde_json::Error,
    },

    /// The filtered records could not be written back as JSON text.
    #[error("error serializing filtered JSON for file '{filename}': {source}")]
    Encode {
        filename: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON document was empty or the literal `null`.
    #[error("deserialized JSON data is null for file '{filename}'")]
    EmptyPayload { filename: String },

    /// Reading the stream failed (including non-UTF-8 JSON text).
    #[error("error reading file '{filename}': {source}")]
    Io {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

impl TransformError {
    /// Filename of the upload that failed.
    pub fn filename(&self) -> &str {
        match self {
            Self::InvalidInput { filename }
            | Self::NoValidData { filename, .. }
            | Self::MalformedJson { filename, .. }
            | Self::Encode { filename, .. }
            | Self::EmptyPayload { filename }
            | Self::Io { filename, .. } => filename,
        }
    }
}

/// Errors from the service shell: configuration loading and bootstrap.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration is missing or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Underlying I/O error (config file unreadable, bind failure, ...).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`crate::config::ServiceConfig`].
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
