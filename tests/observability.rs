use std::sync::{Arc, Mutex};

use upload_transform::dispatch::{
    CompositeObserver, DispatchOptions, Dispatcher, FileKind, TracingObserver, TransformContext, TransformObserver,
    TransformSeverity, TransformStats, UploadedFile,
};
use upload_transform::metrics::FileMetrics;
use upload_transform::TransformError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(String, FileKind)>>,
    failures: Mutex<Vec<TransformSeverity>>,
    alerts: Mutex<Vec<TransformSeverity>>,
    unsupported: Mutex<Vec<String>>,
}

impl TransformObserver for RecordingObserver {
    fn on_success(&self, ctx: &TransformContext, _stats: TransformStats) {
        self.successes.lock().unwrap().push((ctx.filename.clone(), ctx.kind));
    }

    fn on_failure(&self, _ctx: &TransformContext, severity: TransformSeverity, _error: &TransformError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &TransformContext, severity: TransformSeverity, _error: &TransformError) {
        self.alerts.lock().unwrap().push(severity);
    }

    fn on_unsupported(&self, filename: &str) {
        self.unsupported.lock().unwrap().push(filename.to_string());
    }
}

fn dispatcher_with(observer: Arc<dyn TransformObserver>, alert_at_or_above: TransformSeverity) -> Dispatcher {
    Dispatcher::new(DispatchOptions {
        observer: Some(observer),
        alert_at_or_above,
        ..Default::default()
    })
}

#[test]
fn observer_sees_success_and_unsupported() {
    let obs = Arc::new(RecordingObserver::default());
    let d = dispatcher_with(obs.clone(), TransformSeverity::Critical);

    d.process_files(&[
        UploadedFile::new("a.csv", None, b"x,1\n".to_vec()),
        UploadedFile::new("b.json", None, b"[]".to_vec()),
        UploadedFile::new("c.txt", None, b"hi".to_vec()),
    ]);

    assert_eq!(
        obs.successes.lock().unwrap().clone(),
        vec![("a.csv".to_string(), FileKind::Csv), ("b.json".to_string(), FileKind::Json)]
    );
    assert_eq!(obs.unsupported.lock().unwrap().clone(), vec!["c.txt".to_string()]);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn io_failure_is_critical_and_alerts() {
    let obs = Arc::new(RecordingObserver::default());
    let d = dispatcher_with(obs.clone(), TransformSeverity::Critical);

    // Not UTF-8, so reading the JSON text fails.
    d.process_file(&UploadedFile::new("bin.json", None, vec![0xff, 0xfe]));

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![TransformSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![TransformSeverity::Critical]);
}

#[test]
fn data_failure_is_error_without_alert_at_critical_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let d = dispatcher_with(obs.clone(), TransformSeverity::Critical);

    d.process_file(&UploadedFile::new("bad.csv", None, b"a,b\n".to_vec()));

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![TransformSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn lower_threshold_alerts_on_data_failures() {
    let obs = Arc::new(RecordingObserver::default());
    let d = dispatcher_with(obs.clone(), TransformSeverity::Error);

    d.process_file(&UploadedFile::new("bad.json", None, b"{".to_vec()));

    assert_eq!(obs.alerts.lock().unwrap().clone(), vec![TransformSeverity::Error]);
}

#[test]
fn composite_fans_out_to_every_observer() {
    let metrics = Arc::new(FileMetrics::new());
    let recorder = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        metrics.clone() as Arc<dyn TransformObserver>,
        recorder.clone() as Arc<dyn TransformObserver>,
        Arc::new(TracingObserver),
    ]);
    let d = dispatcher_with(Arc::new(composite), TransformSeverity::Critical);

    d.process_files(&[
        UploadedFile::new("a.csv", None, b"x,1\n".to_vec()),
        UploadedFile::new("b.json", None, b"null".to_vec()),
        UploadedFile::new("c.txt", None, b"hi".to_vec()),
    ]);

    let snap = metrics.snapshot();
    assert_eq!(snap.files_processed, 3);
    assert_eq!(snap.csv_ok, 1);
    assert_eq!(snap.failed, 1);
    assert_eq!(snap.unsupported, 1);

    assert_eq!(recorder.successes.lock().unwrap().len(), 1);
    assert_eq!(recorder.failures.lock().unwrap().clone(), vec![TransformSeverity::Error]);
    assert_eq!(recorder.unsupported.lock().unwrap().clone(), vec!["c.txt".to_string()]);
}

#[test]
fn counts_accumulate_across_requests() {
    let metrics = Arc::new(FileMetrics::new());
    let d = dispatcher_with(metrics.clone(), TransformSeverity::Critical);

    for _ in 0..3 {
        d.process_files(&[UploadedFile::new("a.csv", None, b"x,1\n".to_vec())]);
    }
    assert_eq!(metrics.files_processed(), 3);
}
