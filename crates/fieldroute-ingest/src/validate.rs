//! Per-record field rules that turn [`RawRecord`]s into [`Location`]s.
//!
//! Every rule runs on every record; problems are accumulated, never
//! short-circuited, so one pass reports everything wrong with a file.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveTime;
use fieldroute_core::{
    is_valid_latitude, is_valid_longitude, Location, Priority, DEFAULT_TIME_WINDOW_END,
    DEFAULT_TIME_WINDOW_START,
};
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::record::{RawRecord, RawValue};

pub const ID_FIELDS: &[&str] = &["id"];
pub const NAME_FIELDS: &[&str] = &["name"];
pub const CITY_FIELDS: &[&str] = &["city"];
pub const STREET_FIELDS: &[&str] = &["street"];
pub const HOUSE_NUMBER_FIELDS: &[&str] = &["houseNumber", "house_number"];
pub const LATITUDE_FIELDS: &[&str] = &["latitude", "lat"];
pub const LONGITUDE_FIELDS: &[&str] = &["longitude", "lon", "lng"];
pub const WINDOW_START_FIELDS: &[&str] = &["timeWindowStart", "time_window_start"];
pub const WINDOW_END_FIELDS: &[&str] = &["timeWindowEnd", "time_window_end"];
pub const PRIORITY_FIELDS: &[&str] = &["priority"];

/// `15`, `15A`, `15/2`, `15А/2Б`.
static HOUSE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\p{L}?(/\d+\p{L}?)?$").expect("valid house number regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Name, coordinates and id uniqueness only.
    #[default]
    Minimal,
    /// Also house number format, time windows and priority; city names are
    /// capitalized in the output.
    Strict,
}

/// One field-level problem in one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(row: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.to_owned(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}, {}: {}", self.row, self.field, self.message)
    }
}

/// Result of validating a record set.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// Every problem found, ordered by row.
    pub errors: Vec<ValidationError>,
    /// Records that passed, in source order.
    pub locations: Vec<Location>,
}

/// Validates every record and checks that explicit ids are unique.
///
/// Pure apart from the ids generated for records that have none: running it
/// twice over the same records yields the same `errors`.
#[must_use]
pub fn validate_records(records: &[RawRecord], mode: ValidationMode) -> Validation {
    let mut errors = Vec::new();
    let mut locations = Vec::with_capacity(records.len());
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for record in records {
        let mut record_errors = Vec::new();

        if let Some(id) = record.get_any(ID_FIELDS).and_then(RawValue::as_text) {
            if let Some(first_row) = first_seen.get(&id) {
                record_errors.push(ValidationError::new(
                    record.row,
                    "id",
                    format!("Duplicate id \"{id}\" (first used in row {first_row})"),
                ));
            } else {
                first_seen.insert(id, record.row);
            }
        }

        match validate_record(record, mode) {
            Ok(location) if record_errors.is_empty() => locations.push(location),
            Ok(_) => {}
            Err(field_errors) => record_errors.extend(field_errors),
        }
        errors.extend(record_errors);
    }

    tracing::debug!(
        records = records.len(),
        valid = locations.len(),
        errors = errors.len(),
        ?mode,
        "validated records"
    );
    Validation { errors, locations }
}

/// Validates one record in isolation and builds its normalized [`Location`].
///
/// # Errors
///
/// Returns every field-level problem found in the record.
pub fn validate_record(record: &RawRecord, mode: ValidationMode) -> Result<Location, Vec<ValidationError>> {
    let row = record.row;
    let strict = mode == ValidationMode::Strict;
    let mut errors = Vec::new();

    let name = record.get_any(NAME_FIELDS).and_then(RawValue::as_text);
    if name.is_none() {
        errors.push(ValidationError::new(row, "name", "Name is required"));
    }

    let latitude = coordinate(record, LATITUDE_FIELDS, Axis::Latitude).map_err(|e| errors.push(e));
    let longitude = coordinate(record, LONGITUDE_FIELDS, Axis::Longitude).map_err(|e| errors.push(e));

    let city = record.get_any(CITY_FIELDS).and_then(RawValue::as_text).map(|city| {
        if strict {
            capitalize_words(&city)
        } else {
            city
        }
    });
    let street = record.get_any(STREET_FIELDS).and_then(RawValue::as_text);
    let house_number = record.get_any(HOUSE_NUMBER_FIELDS).and_then(RawValue::as_text);
    if strict {
        if let Some(number) = house_number.as_deref() {
            if !HOUSE_NUMBER_RE.is_match(number) {
                errors.push(ValidationError::new(
                    row,
                    "house_number",
                    format!("House number must look like 15, 15A or 15/2, got \"{number}\""),
                ));
            }
        }
    }

    let (time_window_start, time_window_end) = time_window(record, strict, &mut errors);
    let priority = priority(record, strict, &mut errors);

    match (name, latitude, longitude) {
        (Some(name), Ok(latitude), Ok(longitude)) if errors.is_empty() => Ok(Location {
            id: record
                .get_any(ID_FIELDS)
                .and_then(RawValue::as_text)
                .unwrap_or_else(|| format!("loc-{}", Uuid::new_v4())),
            name,
            city,
            street,
            house_number,
            latitude,
            longitude,
            time_window_start,
            time_window_end,
            priority,
        }),
        _ => Err(errors),
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn field(self) -> &'static str {
        match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Axis::Latitude => "Latitude",
            Axis::Longitude => "Longitude",
        }
    }

    fn limit(self) -> i32 {
        match self {
            Axis::Latitude => 90,
            Axis::Longitude => 180,
        }
    }

    fn in_range(self, value: f64) -> bool {
        match self {
            Axis::Latitude => is_valid_latitude(value),
            Axis::Longitude => is_valid_longitude(value),
        }
    }
}

fn coordinate(record: &RawRecord, fields: &[&str], axis: Axis) -> Result<f64, ValidationError> {
    let row = record.row;
    let Some(raw) = record.get_any(fields) else {
        return Err(ValidationError::new(
            row,
            axis.field(),
            format!("{} is required", axis.label()),
        ));
    };
    let Some(value) = raw.as_number() else {
        return Err(ValidationError::new(
            row,
            axis.field(),
            format!(
                "{} must be a number, got \"{}\"",
                axis.label(),
                raw.as_text().unwrap_or_default()
            ),
        ));
    };
    if !axis.in_range(value) {
        let limit = axis.limit();
        return Err(ValidationError::new(
            row,
            axis.field(),
            format!("{} must be between -{limit} and {limit}, got {value}", axis.label()),
        ));
    }
    Ok(value)
}

fn time_window(record: &RawRecord, strict: bool, errors: &mut Vec<ValidationError>) -> (String, String) {
    let start = record.get_any(WINDOW_START_FIELDS).and_then(RawValue::as_text);
    let end = record.get_any(WINDOW_END_FIELDS).and_then(RawValue::as_text);

    if !strict {
        return (
            start.unwrap_or_else(|| DEFAULT_TIME_WINDOW_START.to_string()),
            end.unwrap_or_else(|| DEFAULT_TIME_WINDOW_END.to_string()),
        );
    }

    let start = parse_clock(record.row, "time_window_start", start.as_deref(), DEFAULT_TIME_WINDOW_START, errors);
    let end = parse_clock(record.row, "time_window_end", end.as_deref(), DEFAULT_TIME_WINDOW_END, errors);

    match (start, end) {
        (Some(start), Some(end)) => {
            if start >= end {
                errors.push(ValidationError::new(
                    record.row,
                    "time_window_end",
                    format!(
                        "Time window end {} must be after start {}",
                        end.format("%H:%M"),
                        start.format("%H:%M")
                    ),
                ));
            }
            (start.format("%H:%M").to_string(), end.format("%H:%M").to_string())
        }
        _ => (
            DEFAULT_TIME_WINDOW_START.to_string(),
            DEFAULT_TIME_WINDOW_END.to_string(),
        ),
    }
}

fn parse_clock(
    row: usize,
    field: &str,
    value: Option<&str>,
    default: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<NaiveTime> {
    let text = value.unwrap_or(default);
    match NaiveTime::parse_from_str(text, "%H:%M") {
        Ok(time) => Some(time),
        Err(_) => {
            errors.push(ValidationError::new(
                row,
                field,
                format!("Time must be in HH:MM format, got \"{text}\""),
            ));
            None
        }
    }
}

fn priority(record: &RawRecord, strict: bool, errors: &mut Vec<ValidationError>) -> Priority {
    let Some(raw) = record.get_any(PRIORITY_FIELDS) else {
        return Priority::default();
    };
    let parsed = match raw {
        RawValue::Number(n) => Priority::from_number(*n),
        RawValue::Text(s) => Priority::parse(s),
        RawValue::Bool(_) | RawValue::Null => None,
    };

    parsed.unwrap_or_else(|| {
        let text = raw.as_text().unwrap_or_default();
        if strict {
            errors.push(ValidationError::new(
                record.row,
                "priority",
                format!("Priority must be low, medium, high or a rank from 1 to 4, got \"{text}\""),
            ));
        } else {
            tracing::debug!(row = record.row, value = %text, "unrecognized priority, using default");
        }
        Priority::default()
    })
}

/// Upper-cases the first letter of every word. Words are separated by
/// whitespace or hyphens; the remaining letters are left as they are.
#[must_use]
pub fn capitalize_words(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for c in input.chars() {
        if c.is_whitespace() || c == '-' {
            out.push(c);
            at_word_start = true;
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
