use serde_json::Value;

use crate::error::IngestError;
use crate::record::{ParsedTable, RawRecord, RawValue};

/// Parses a JSON document that must be a non-empty array of flat objects.
///
/// Headers are the union of all object keys in first-seen order. Each record
/// keeps only the keys its own object had.
///
/// # Errors
///
/// - [`IngestError::MalformedJson`] if the text is not JSON.
/// - [`IngestError::NotAnArrayOfObjects`] for a bare object, an empty array,
///   a scalar, or an array containing anything other than objects.
/// - [`IngestError::NestedValue`] if a field holds an object or array.
pub fn parse_json(text: &str) -> Result<ParsedTable, IngestError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let value: Value = serde_json::from_str(text).map_err(IngestError::MalformedJson)?;

    let Value::Array(items) = value else {
        return Err(IngestError::NotAnArrayOfObjects);
    };
    if items.is_empty() {
        return Err(IngestError::NotAnArrayOfObjects);
    }

    let mut headers: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        let Value::Object(object) = item else {
            return Err(IngestError::NotAnArrayOfObjects);
        };
        let row = index + 1;

        let mut fields = Vec::with_capacity(object.len());
        for (key, value) in object {
            let value = match value {
                Value::String(s) => RawValue::Text(s),
                Value::Number(n) => n.as_f64().map_or(RawValue::Null, RawValue::Number),
                Value::Bool(b) => RawValue::Bool(b),
                Value::Null => RawValue::Null,
                Value::Array(_) | Value::Object(_) => {
                    return Err(IngestError::NestedValue { row, field: key });
                }
            };
            if !headers.contains(&key) {
                headers.push(key.clone());
            }
            fields.push((key, value));
        }
        records.push(RawRecord { row, fields });
    }

    tracing::debug!(columns = headers.len(), records = records.len(), "parsed JSON");
    Ok(ParsedTable { headers, records })
}
