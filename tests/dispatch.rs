use std::fs;

use upload_transform::dispatch::{render_response, DispatchOptions, Dispatcher, FileOutcome, UploadedFile};
use upload_transform::transform::{CsvOptions, PersonFilter};
use upload_transform::TransformError;

fn fixture(name: &str) -> Vec<u8> {
    fs::read(format!("tests/fixtures/{name}")).unwrap()
}

#[test]
fn mixed_request_yields_one_line_per_file_in_order() {
    let files = vec![
        UploadedFile::new("departments.csv", Some("text/csv"), fixture("departments.csv")),
        UploadedFile::new("people.json", Some("application/json"), fixture("people.json")),
        UploadedFile::new("photo.png", Some("image/png"), vec![0x89, b'P', b'N', b'G']),
    ];

    let outcomes = Dispatcher::default().process_files(&files);
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(&outcomes[0], FileOutcome::Csv { average, .. } if *average == 7.5));
    assert!(matches!(&outcomes[1], FileOutcome::Json { .. }));
    assert!(matches!(&outcomes[2], FileOutcome::Unsupported { .. }));

    let body = render_response(&outcomes);
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(
        lines[0],
        "CSV File 'departments.csv': Average Employee Count Per Department: 7.5"
    );
    assert!(lines[1].starts_with("JSON File 'people.json': [{\"data\":{\"name\":\"John Smith\""));
    assert_eq!(
        lines[2],
        "Unsupported file format for 'photo.png'. Only CSV or JSON files are allowed."
    );
}

#[test]
fn extension_routes_when_media_type_is_generic() {
    let files = vec![
        UploadedFile::new("a.CSV", Some("application/octet-stream"), b"x,1\ny,2\n".to_vec()),
        UploadedFile::new("b.json", None, b"[]".to_vec()),
    ];
    let body = render_response(&Dispatcher::default().process_files(&files));
    assert_eq!(
        body,
        "CSV File 'a.CSV': Average Employee Count Per Department: 1.5\nJSON File 'b.json': []"
    );
}

#[test]
fn failing_file_does_not_stop_the_rest() {
    let files = vec![
        UploadedFile::new("bad.csv", None, b"only,words\n".to_vec()),
        UploadedFile::new("null.json", None, b"null".to_vec()),
        UploadedFile::new("good.csv", None, b"a,3\n".to_vec()),
    ];
    let outcomes = Dispatcher::default().process_files(&files);

    assert!(matches!(
        &outcomes[0],
        FileOutcome::Failed { error: TransformError::NoValidData { .. }, .. }
    ));
    assert!(matches!(
        &outcomes[1],
        FileOutcome::Failed { error: TransformError::EmptyPayload { .. }, .. }
    ));
    assert!(outcomes[0].is_failure());
    assert!(!outcomes[2].is_failure());

    let body = render_response(&outcomes);
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(
        lines[0],
        "Error processing file 'bad.csv': no valid values found in column 1 of file 'bad.csv'"
    );
    assert_eq!(
        lines[1],
        "Error processing file 'null.json': deserialized JSON data is null for file 'null.json'"
    );
    assert_eq!(lines[2], "CSV File 'good.csv': Average Employee Count Per Department: 3");
}

#[test]
fn upload_without_content_is_invalid_input() {
    let file = UploadedFile {
        filename: "ghost.csv".to_string(),
        content_type: Some("text/csv".to_string()),
        content: None,
    };
    let outcome = Dispatcher::default().process_file(&file);
    assert_eq!(outcome.filename(), "ghost.csv");
    assert!(matches!(
        outcome,
        FileOutcome::Failed { error: TransformError::InvalidInput { .. }, .. }
    ));
}

#[test]
fn unsupported_file_is_not_read() {
    let file = UploadedFile {
        filename: "ghost.txt".to_string(),
        content_type: None,
        content: None,
    };
    let outcome = Dispatcher::default().process_file(&file);
    assert!(matches!(outcome, FileOutcome::Unsupported { .. }));
}

#[test]
fn options_change_column_and_filter() {
    let dispatcher = Dispatcher::new(DispatchOptions {
        csv: CsvOptions {
            column_index: 0,
            ..Default::default()
        },
        filter: PersonFilter {
            name_substring: "doe".to_string(),
            min_age: 18,
        },
        ..Default::default()
    });
    let files = vec![
        UploadedFile::new("n.csv", None, b"2,x\n4,y\n".to_vec()),
        UploadedFile::new("people.json", None, fixture("people.json")),
    ];
    let outcomes = dispatcher.process_files(&files);

    assert!(matches!(&outcomes[0], FileOutcome::Csv { average, .. } if *average == 3.0));
    match &outcomes[1] {
        FileOutcome::Json { json, .. } => {
            assert!(json.contains("Jane Doe"));
            assert!(!json.contains("John"));
        }
        other => panic!("unexpected outcome: {other}"),
    }
}

#[test]
fn empty_request_renders_empty_body() {
    assert_eq!(render_response(&Dispatcher::default().process_files(&[])), "");
}
