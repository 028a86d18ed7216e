use thiserror::Error;

/// Structural failures that abort ingestion before per-record validation.
///
/// Field-level problems are not errors in this sense; they are collected as
/// [`crate::ValidationError`] values on the resulting batch.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file format: {file_name} (expected .csv or .json)")]
    UnsupportedFormat { file_name: String },

    #[error("File too large. Maximum size: {}", format_limit(.limit))]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File {file_name} is not valid UTF-8 text")]
    Encoding { file_name: String },

    #[error("File is empty")]
    EmptyFile,

    #[error("File contains a header row but no data rows")]
    NoDataRows,

    #[error("Malformed CSV at line {line}: {reason}")]
    MalformedCsv { line: usize, reason: String },

    #[error("Malformed JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("JSON must contain a non-empty array of objects")]
    NotAnArrayOfObjects,

    #[error("Row {row}: field \"{field}\" must be a string, number, boolean or null")]
    NestedValue { row: usize, field: String },
}

/// Renders a byte limit the way users read it, e.g. `5MB`.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn format_limit(limit: &u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    let limit = *limit;
    if limit >= MB && limit % MB == 0 {
        format!("{}MB", limit / MB)
    } else if limit >= KB && limit % KB == 0 {
        format!("{}KB", limit / KB)
    } else {
        format!("{limit} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_names_megabyte_limit() {
        let err = IngestError::FileTooLarge {
            size: 6 * 1024 * 1024,
            limit: 5 * 1024 * 1024,
        };
        assert_eq!(err.to_string(), "File too large. Maximum size: 5MB");
    }

    #[test]
    fn odd_limits_fall_back_to_smaller_units() {
        assert_eq!(format_limit(&2048), "2KB");
        assert_eq!(format_limit(&1500), "1500 bytes");
    }

    #[test]
    fn array_message_mentions_array() {
        assert!(IngestError::NotAnArrayOfObjects.to_string().contains("array"));
    }
}
