//! Delimited-text parser for location files.
//!
//! Handles the subset of RFC 4180 that spreadsheet exports produce: a header
//! row, `\n` or `\r\n` line endings, and double-quoted fields with `""` escapes
//! that may span lines. Blank lines are skipped wherever they occur.

use std::collections::HashSet;

use crate::error::IngestError;
use crate::record::{ParsedTable, RawRecord, RawValue};

/// A physical row split into values, tagged with the line it starts on.
struct CsvRow {
    line: usize,
    values: Vec<String>,
}

/// Parses CSV text into headers and records.
///
/// The first non-blank row is the header. Data rows shorter than the header
/// are padded with empty values and longer rows are cut to the header width.
///
/// # Errors
///
/// - [`IngestError::EmptyFile`] if there is no header row.
/// - [`IngestError::NoDataRows`] if there is a header but no data row.
/// - [`IngestError::MalformedCsv`] for an unterminated quote, stray text after
///   a closing quote, a header with no column names, or a column name used
///   twice.
pub fn parse_csv(text: &str, delimiter: char) -> Result<ParsedTable, IngestError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = split_rows(text, delimiter)?.into_iter();

    let header = rows.next().ok_or(IngestError::EmptyFile)?;
    let headers: Vec<String> = header
        .values
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::MalformedCsv {
            line: header.line,
            reason: "header row has no column names".to_string(),
        });
    }
    let mut seen = HashSet::new();
    if let Some(duplicate) = headers.iter().find(|h| !h.is_empty() && !seen.insert(h.as_str())) {
        return Err(IngestError::MalformedCsv {
            line: header.line,
            reason: format!("duplicate column \"{duplicate}\""),
        });
    }

    let records: Vec<RawRecord> = rows.map(|row| to_record(&headers, row)).collect();
    if records.is_empty() {
        return Err(IngestError::NoDataRows);
    }

    tracing::debug!(
        columns = headers.len(),
        records = records.len(),
        "parsed CSV"
    );
    Ok(ParsedTable { headers, records })
}

fn to_record(headers: &[String], row: CsvRow) -> RawRecord {
    if row.values.len() > headers.len() {
        tracing::debug!(
            line = row.line,
            extra = row.values.len() - headers.len(),
            "dropping values beyond the header width"
        );
    }

    let mut values = row.values.into_iter();
    let fields = headers
        .iter()
        .map(|header| {
            let value = values.next().map(|v| v.trim().to_owned()).unwrap_or_default();
            (header.clone(), RawValue::Text(value))
        })
        .collect();

    RawRecord {
        row: row.line,
        fields,
    }
}

fn split_rows(text: &str, delimiter: char) -> Result<Vec<CsvRow>, IngestError> {
    let mut rows = Vec::new();
    let mut chars = text.chars().peekable();

    let mut line = 1usize;
    let mut row_start = 1usize;
    let mut values: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // A closing quote was seen; only whitespace may precede the next delimiter.
    let mut after_quote = false;
    let mut has_content = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    after_quote = true;
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if !after_quote && field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                has_content = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if has_content {
                    values.push(std::mem::take(&mut field));
                    rows.push(CsvRow {
                        line: row_start,
                        values: std::mem::take(&mut values),
                    });
                } else {
                    field.clear();
                    values.clear();
                }
                has_content = false;
                after_quote = false;
                line += 1;
                row_start = line;
            }
            c if c == delimiter => {
                values.push(std::mem::take(&mut field));
                after_quote = false;
                has_content = true;
            }
            c if after_quote && c.is_whitespace() => {}
            _ if after_quote => {
                return Err(IngestError::MalformedCsv {
                    line,
                    reason: "unexpected character after closing quote".to_string(),
                });
            }
            _ => {
                if !c.is_whitespace() {
                    has_content = true;
                }
                field.push(c);
            }
        }
    }

    if in_quotes {
        return Err(IngestError::MalformedCsv {
            line: row_start,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if has_content {
        values.push(field);
        rows.push(CsvRow {
            line: row_start,
            values,
        });
    }
    Ok(rows)
}

#[cfg(test)]
#[path = "csv_test.rs"]
mod tests;
