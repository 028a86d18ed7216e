use super::*;

const STORES_CSV: &str = "name,city,street,houseNumber,latitude,longitude\n\
                          Store 1,Moscow,Tverskaya,15,55.7558,37.6173\n\
                          Store 2,Moscow,Arbat,7,55.7520,37.5929\n\
                          Store 3,Tver,Sovetskaya,2A,56.8587,35.9176\n";

#[test]
fn check_rejects_oversized_supported_file() {
    let ingestor = FileIngestor::default();
    let err = ingestor
        .check("stores.csv", Some("text/csv"), 6 * 1024 * 1024)
        .unwrap_err();
    assert_eq!(err.to_string(), "File too large. Maximum size: 5MB");
}

#[test]
fn check_reports_format_before_size() {
    let err = FileIngestor::default()
        .check("stores.xlsx", None, 6 * 1024 * 1024)
        .unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }), "got: {err:?}");
}

#[test]
fn check_accepts_exactly_the_limit() {
    let ingestor = FileIngestor::default();
    assert_eq!(
        ingestor.check("stores.csv", None, DEFAULT_MAX_FILE_BYTES).unwrap(),
        FileFormat::Csv
    );
}

#[test]
fn preview_is_capped_but_all_records_are_validated() {
    let batch = FileIngestor::default()
        .process_bytes("stores.csv", None, STORES_CSV.as_bytes().to_vec())
        .unwrap();

    assert_eq!(batch.total_records(), 3);
    assert_eq!(batch.preview.len(), 2);
    assert_eq!(batch.valid_subset().len(), 3);
    assert!(batch.is_valid());
    assert_eq!(batch.ready_locations().map(<[Location]>::len), Some(3));
}

#[test]
fn preview_is_shorter_when_fewer_records() {
    let batch = FileIngestor::default()
        .process_bytes("one.json", None, br#"[{"name":"A","lat":1,"lon":2}]"#.to_vec())
        .unwrap();
    assert_eq!(batch.preview.len(), 1);
}

#[test]
fn invalid_batch_keeps_preview_but_blocks_hand_off() {
    let csv = "name,lat,lon\nGood,55.1,37.1\nBad,100,37.1\n";
    let batch = FileIngestor::default()
        .process_bytes("stores.csv", None, csv.as_bytes().to_vec())
        .unwrap();

    assert!(!batch.is_valid());
    assert_eq!(batch.headers, vec!["name", "lat", "lon"]);
    assert_eq!(batch.preview.len(), 2);
    assert!(batch.ready_locations().is_none());
    assert_eq!(batch.valid_subset().len(), 1);

    let errors = batch.into_ready().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].row, 3);
    assert_eq!(errors[0].field, "latitude");
}

#[test]
fn strict_mode_from_config_applies() {
    let ingestor = FileIngestor::new(IngestConfig {
        mode: ValidationMode::Strict,
        ..IngestConfig::default()
    });
    let csv = "name,city,houseNumber,lat,lon\nA,tver,abc,56.8,35.9\n";
    let batch = ingestor
        .process_bytes("stores.csv", None, csv.as_bytes().to_vec())
        .unwrap();
    assert_eq!(batch.errors.len(), 1);
    assert_eq!(batch.errors[0].field, "house_number");
}

#[test]
fn non_utf8_content_is_an_encoding_error() {
    let err = FileIngestor::default()
        .process_bytes("stores.csv", None, vec![b'n', 0xff, 0xfe, b'\n'])
        .unwrap_err();
    assert!(matches!(err, IngestError::Encoding { .. }), "got: {err:?}");
}

#[test]
fn config_is_built_from_app_config() {
    let mut app = AppConfig::defaults();
    app.max_upload_bytes = 1024;
    app.preview_rows = 5;
    let config = IngestConfig::from_config(&app);
    assert_eq!(config.max_file_bytes, 1024);
    assert_eq!(config.preview_rows, 5);
    assert_eq!(config.mode, ValidationMode::Minimal);
    assert!(!config.accept_txt);
}

#[test]
fn batch_serializes_preview_and_errors_only() {
    let csv = "name,lat,lon\nA,1,2\n";
    let batch = FileIngestor::default()
        .process_bytes("a.csv", None, csv.as_bytes().to_vec())
        .unwrap();
    let value = serde_json::to_value(&batch).unwrap();

    assert_eq!(value["format"], "csv");
    assert_eq!(value["preview"][0]["name"], "A");
    assert!(value.get("records").is_none());
    assert!(value.get("valid_locations").is_none());
}
