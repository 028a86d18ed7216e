use super::*;
use fieldroute_core::PriorityLabel;

fn record(row: usize, fields: &[(&str, &str)]) -> RawRecord {
    RawRecord {
        row,
        fields: fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), RawValue::Text((*v).to_string())))
            .collect(),
    }
}

fn store(row: usize) -> RawRecord {
    record(
        row,
        &[
            ("name", "Store 1"),
            ("city", "Moscow"),
            ("street", "Tverskaya"),
            ("houseNumber", "15"),
            ("latitude", "55.7558"),
            ("longitude", "37.6173"),
        ],
    )
}

fn fields_of(errors: &[ValidationError]) -> Vec<&str> {
    errors.iter().map(|e| e.field.as_str()).collect()
}

#[test]
fn well_formed_store_is_valid() {
    let location = validate_record(&store(2), ValidationMode::Minimal).unwrap();

    assert_eq!(location.name, "Store 1");
    assert_eq!(location.city.as_deref(), Some("Moscow"));
    assert_eq!(location.house_number.as_deref(), Some("15"));
    assert!((location.latitude - 55.7558).abs() < f64::EPSILON);
    assert!((location.longitude - 37.6173).abs() < f64::EPSILON);
    assert!(location.id.starts_with("loc-"));
    assert_eq!(location.time_window_start, "09:00");
    assert_eq!(location.time_window_end, "18:00");
    assert_eq!(location.priority, Priority::default());
}

#[test]
fn missing_name_is_reported() {
    let rec = record(3, &[("name", "  "), ("lat", "55.1"), ("lon", "37.1")]);
    let errors = validate_record(&rec, ValidationMode::Minimal).unwrap_err();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].row, 3);
    assert_eq!(errors[0].field, "name");
}

#[test]
fn out_of_range_coordinates_accumulate() {
    let rec = record(2, &[("name", "Store 1"), ("lat", "100"), ("lon", "200")]);
    let errors = validate_record(&rec, ValidationMode::Minimal).unwrap_err();

    assert_eq!(fields_of(&errors), vec!["latitude", "longitude"]);
    assert!(errors[0].message.contains("between -90 and 90"));
    assert!(errors[1].message.contains("between -180 and 180"));
}

#[test]
fn non_numeric_and_missing_coordinates() {
    let rec = record(5, &[("name", ""), ("latitude", "north")]);
    let errors = validate_record(&rec, ValidationMode::Minimal).unwrap_err();

    assert_eq!(fields_of(&errors), vec!["name", "latitude", "longitude"]);
    assert!(errors[1].message.contains("must be a number"));
    assert!(errors[2].message.contains("is required"));
}

#[test]
fn coordinate_aliases_are_accepted() {
    let rec = record(2, &[("name", "A"), ("lat", "10"), ("lng", "20")]);
    let location = validate_record(&rec, ValidationMode::Minimal).unwrap();
    assert!((location.longitude - 20.0).abs() < f64::EPSILON);
}

#[test]
fn bounds_are_inclusive() {
    let rec = record(2, &[("name", "Pole"), ("lat", "-90"), ("lon", "180")]);
    assert!(validate_record(&rec, ValidationMode::Minimal).is_ok());
}

#[test]
fn numeric_json_values_are_accepted() {
    let rec = RawRecord {
        row: 1,
        fields: vec![
            ("name".to_string(), RawValue::Text("A".to_string())),
            ("latitude".to_string(), RawValue::Number(55.0)),
            ("longitude".to_string(), RawValue::Number(37.0)),
            ("priority".to_string(), RawValue::Number(2.0)),
        ],
    };
    let location = validate_record(&rec, ValidationMode::Strict).unwrap();
    assert_eq!(location.priority, Priority::Rank(2));
}

#[test]
fn minimal_mode_ignores_house_number_format() {
    let rec = record(2, &[("name", "A"), ("lat", "55.7558"), ("lon", "37.6173"), ("houseNumber", "abc")]);
    assert!(validate_record(&rec, ValidationMode::Minimal).is_ok());
}

#[test]
fn strict_mode_checks_house_number() {
    let bad = record(2, &[("name", "A"), ("lat", "1"), ("lon", "1"), ("house_number", "abc")]);
    let errors = validate_record(&bad, ValidationMode::Strict).unwrap_err();
    assert_eq!(fields_of(&errors), vec!["house_number"]);

    for ok in ["15", "15A", "15/2", "15а/2б", "7B/12"] {
        let rec = record(2, &[("name", "A"), ("lat", "1"), ("lon", "1"), ("houseNumber", ok)]);
        assert!(
            validate_record(&rec, ValidationMode::Strict).is_ok(),
            "{ok} should be accepted"
        );
    }
}

#[test]
fn strict_mode_capitalizes_city() {
    let rec = record(2, &[("name", "A"), ("lat", "1"), ("lon", "1"), ("city", "nizhny novgorod")]);
    let location = validate_record(&rec, ValidationMode::Strict).unwrap();
    assert_eq!(location.city.as_deref(), Some("Nizhny Novgorod"));

    let minimal = validate_record(&rec, ValidationMode::Minimal).unwrap();
    assert_eq!(minimal.city.as_deref(), Some("nizhny novgorod"));
}

#[test]
fn strict_mode_checks_time_windows() {
    let rec = record(
        4,
        &[
            ("name", "A"),
            ("lat", "1"),
            ("lon", "1"),
            ("timeWindowStart", "9:30"),
            ("timeWindowEnd", "17:00"),
        ],
    );
    let location = validate_record(&rec, ValidationMode::Strict).unwrap();
    assert_eq!(location.time_window_start, "09:30");

    let inverted = record(
        4,
        &[
            ("name", "A"),
            ("lat", "1"),
            ("lon", "1"),
            ("time_window_start", "18:00"),
            ("time_window_end", "08:00"),
        ],
    );
    let errors = validate_record(&inverted, ValidationMode::Strict).unwrap_err();
    assert_eq!(fields_of(&errors), vec!["time_window_end"]);

    let garbage = record(4, &[("name", "A"), ("lat", "1"), ("lon", "1"), ("timeWindowStart", "25:00")]);
    let errors = validate_record(&garbage, ValidationMode::Strict).unwrap_err();
    assert_eq!(fields_of(&errors), vec!["time_window_start"]);
}

#[test]
fn priority_falls_back_in_minimal_and_fails_in_strict() {
    let rec = record(2, &[("name", "A"), ("lat", "1"), ("lon", "1"), ("priority", "urgent")]);

    let location = validate_record(&rec, ValidationMode::Minimal).unwrap();
    assert_eq!(location.priority, Priority::default());

    let errors = validate_record(&rec, ValidationMode::Strict).unwrap_err();
    assert_eq!(fields_of(&errors), vec!["priority"]);

    let high = record(2, &[("name", "A"), ("lat", "1"), ("lon", "1"), ("priority", "HIGH")]);
    assert_eq!(
        validate_record(&high, ValidationMode::Strict).unwrap().priority,
        Priority::Label(PriorityLabel::High)
    );
}

#[test]
fn explicit_id_is_kept() {
    let rec = record(2, &[("id", "store-42"), ("name", "A"), ("lat", "1"), ("lon", "1")]);
    assert_eq!(validate_record(&rec, ValidationMode::Minimal).unwrap().id, "store-42");
}

#[test]
fn duplicate_ids_are_reported_against_later_rows() {
    let records = vec![
        record(2, &[("id", "s1"), ("name", "A"), ("lat", "1"), ("lon", "1")]),
        record(3, &[("id", "s2"), ("name", "B"), ("lat", "1"), ("lon", "1")]),
        record(4, &[("id", "s1"), ("name", "C"), ("lat", "1"), ("lon", "1")]),
    ];
    let validation = validate_records(&records, ValidationMode::Minimal);

    assert_eq!(validation.errors.len(), 1);
    assert_eq!(validation.errors[0].row, 4);
    assert_eq!(validation.errors[0].field, "id");
    assert!(validation.errors[0].message.contains("row 2"));
    assert_eq!(validation.locations.len(), 2);
}

#[test]
fn errors_from_all_records_are_collected() {
    let records = vec![
        record(2, &[("name", ""), ("lat", "1"), ("lon", "1")]),
        store(3),
        record(4, &[("name", "C"), ("lat", "91"), ("lon", "x")]),
    ];
    let validation = validate_records(&records, ValidationMode::Minimal);

    let tagged: Vec<(usize, &str)> = validation
        .errors
        .iter()
        .map(|e| (e.row, e.field.as_str()))
        .collect();
    assert_eq!(tagged, vec![(2, "name"), (4, "latitude"), (4, "longitude")]);
    assert_eq!(validation.locations.len(), 1);
    assert_eq!(validation.locations[0].name, "Store 1");
}

#[test]
fn validation_is_idempotent() {
    let records = vec![
        record(2, &[("name", ""), ("lat", "100"), ("lon", "1")]),
        record(3, &[("id", "x"), ("name", "B"), ("lat", "1"), ("lon", "1")]),
        record(4, &[("id", "x"), ("name", "C"), ("lat", "1"), ("lon", "-500")]),
    ];
    let first = validate_records(&records, ValidationMode::Strict);
    let second = validate_records(&records, ValidationMode::Strict);
    assert_eq!(first.errors, second.errors);
}

#[test]
fn error_display_names_row_and_field() {
    let err = ValidationError::new(7, "latitude", "Latitude is required");
    assert_eq!(err.to_string(), "Row 7, latitude: Latitude is required");
}

#[test]
fn capitalize_words_handles_hyphens_and_unicode() {
    assert_eq!(capitalize_words("moscow"), "Moscow");
    assert_eq!(capitalize_words("rostov-on-don"), "Rostov-On-Don");
    assert_eq!(capitalize_words("санкт-петербург"), "Санкт-Петербург");
    assert_eq!(capitalize_words("  ny  "), "  Ny  ");
}

#[test]
fn nan_coordinate_is_not_a_number() {
    let rec = record(2, &[("name", "A"), ("lat", "NaN"), ("lon", "inf")]);
    let errors = validate_record(&rec, ValidationMode::Minimal).unwrap_err();

    assert_eq!(fields_of(&errors), vec!["latitude", "longitude"]);
    assert_eq!(errors[0].message, "Latitude must be a number, got \"NaN\"");
    assert_eq!(errors[1].message, "Longitude must be a number, got \"inf\"");
}
