use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::TransformError;

use super::FileKind;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TransformSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the file failed).
    Error,
    /// Critical error (I/O faults while reading the upload).
    Critical,
}

impl TransformSeverity {
    /// Severity assigned to a failed transform.
    pub fn for_error(e: &TransformError) -> Self {
        match e {
            TransformError::Io { .. } => Self::Critical,
            TransformError::InvalidInput { .. }
            | TransformError::NoValidData { .. }
            | TransformError::MalformedJson { .. }
            | TransformError::Encode { .. }
            | TransformError::EmptyPayload { .. } => Self::Error,
        }
    }
}

/// Context about one transformed file.
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// Upload filename.
    pub filename: String,
    /// Transform that ran.
    pub kind: FileKind,
}

/// Stats reported on a successful transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformStats {
    /// Size of the upload in bytes.
    pub bytes: usize,
    /// Wall time spent in the transform.
    pub elapsed: Duration,
}

/// Observer interface for per-file outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait TransformObserver: Send + Sync {
    /// Called when a transform succeeds.
    fn on_success(&self, _ctx: &TransformContext, _stats: TransformStats) {}

    /// Called when a transform fails.
    fn on_failure(&self, _ctx: &TransformContext, _severity: TransformSeverity, _error: &TransformError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &TransformContext, severity: TransformSeverity, error: &TransformError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called when a file was neither CSV nor JSON.
    fn on_unsupported(&self, _filename: &str) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn TransformObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn TransformObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl TransformObserver for CompositeObserver {
    fn on_success(&self, ctx: &TransformContext, stats: TransformStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &TransformContext, severity: TransformSeverity, error: &TransformError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &TransformContext, severity: TransformSeverity, error: &TransformError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_unsupported(&self, filename: &str) {
        for o in &self.observers {
            o.on_unsupported(filename);
        }
    }
}

/// Reports outcomes through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl TransformObserver for TracingObserver {
    fn on_success(&self, ctx: &TransformContext, stats: TransformStats) {
        info!(
            filename = %ctx.filename,
            kind = ?ctx.kind,
            bytes = stats.bytes,
            elapsed_ms = stats.elapsed.as_secs_f64() * 1000.0,
            "file processed"
        );
    }

    fn on_failure(&self, ctx: &TransformContext, severity: TransformSeverity, error: &TransformError) {
        error!(filename = %ctx.filename, kind = ?ctx.kind, ?severity, %error, "file failed");
    }

    fn on_alert(&self, ctx: &TransformContext, severity: TransformSeverity, error: &TransformError) {
        error!(filename = %ctx.filename, kind = ?ctx.kind, ?severity, %error, "ALERT: file failed");
    }

    fn on_unsupported(&self, filename: &str) {
        warn!(filename, "unsupported file format");
    }
}
