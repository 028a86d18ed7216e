//! Untyped records as they come out of a parser, before validation.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single cell. CSV only ever produces [`RawValue::Text`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl RawValue {
    /// `true` for null and for text that is empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Null => true,
            RawValue::Number(_) | RawValue::Bool(_) => false,
        }
    }

    /// Trimmed text form, or `None` when blank.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
            RawValue::Number(n) => Some(n.to_string()),
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Null => None,
        }
    }

    /// Finite numeric value; text is parsed after trimming. Booleans, `NaN`
    /// and infinities are not numbers.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let parsed = match self {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok(),
            RawValue::Bool(_) | RawValue::Null => None,
        };
        parsed.filter(|n| n.is_finite())
    }
}

/// One parsed row: field name to value, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// 1-based row used in validation messages. For CSV this is the physical
    /// line the record starts on (the header is line 1); for JSON it is the
    /// array index plus one.
    pub row: usize,
    pub fields: Vec<(String, RawValue)>,
}

impl RawRecord {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// First non-blank value among `keys`, in the given order.
    #[must_use]
    pub fn get_any(&self, keys: &[&str]) -> Option<&RawValue> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .find(|value| !value.is_blank())
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Output of a parser: column names plus every data record.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}
