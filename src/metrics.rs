//! Process-wide file counters.
//!
//! [`FileMetrics`] is owned by the server and handed to the dispatcher as a
//! [`TransformObserver`]; the transforms themselves never touch it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dispatch::{FileKind, TransformContext, TransformObserver, TransformSeverity, TransformStats};
use crate::error::TransformError;

/// Running counters updated from observer callbacks.
///
/// Callers can snapshot them at any time.
#[derive(Debug, Default)]
pub struct FileMetrics {
    files_processed: AtomicU64,
    csv_ok: AtomicU64,
    json_ok: AtomicU64,
    unsupported: AtomicU64,
    failed: AtomicU64,
}

impl FileMetrics {
    /// Counters starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files seen so far, whatever their outcome.
    pub fn files_processed(&self) -> u64 {
        self.files_processed.load(Ordering::SeqCst)
    }

    /// Read every counter at once.
    pub fn snapshot(&self) -> FileMetricsSnapshot {
        FileMetricsSnapshot {
            files_processed: self.files_processed.load(Ordering::SeqCst),
            csv_ok: self.csv_ok.load(Ordering::SeqCst),
            json_ok: self.json_ok.load(Ordering::SeqCst),
            unsupported: self.unsupported.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }

    fn bump(counter: &AtomicU64) {
        let _ = counter.fetch_add(1, Ordering::SeqCst);
    }
}

impl TransformObserver for FileMetrics {
    fn on_success(&self, ctx: &TransformContext, _stats: TransformStats) {
        Self::bump(&self.files_processed);
        match ctx.kind {
            FileKind::Csv => Self::bump(&self.csv_ok),
            FileKind::Json => Self::bump(&self.json_ok),
        }
    }

    fn on_failure(&self, _ctx: &TransformContext, _severity: TransformSeverity, _error: &TransformError) {
        Self::bump(&self.files_processed);
        Self::bump(&self.failed);
    }

    // Alerts follow a failure that was already counted.
    fn on_alert(&self, _ctx: &TransformContext, _severity: TransformSeverity, _error: &TransformError) {}

    fn on_unsupported(&self, _filename: &str) {
        Self::bump(&self.files_processed);
        Self::bump(&self.unsupported);
    }
}

/// Immutable snapshot of [`FileMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetricsSnapshot {
    /// Every file seen, whatever the outcome.
    pub files_processed: u64,
    /// CSV files averaged successfully.
    pub csv_ok: u64,
    /// JSON files filtered successfully.
    pub json_ok: u64,
    /// Files that were neither CSV nor JSON.
    pub unsupported: u64,
    /// Files whose transform returned an error.
    pub failed: u64,
}

impl fmt::Display for FileMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "files_processed={}, csv_ok={}, json_ok={}, unsupported={}, failed={}",
            self.files_processed, self.csv_ok, self.json_ok, self.unsupported, self.failed
        )
    }
}
