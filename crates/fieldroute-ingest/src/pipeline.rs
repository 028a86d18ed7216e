//! File → records → validated locations.
//!
//! [`FileIngestor`] runs the stages in order for one file and produces an
//! [`UploadBatch`]. It never talks to the network; submitting the ready
//! locations is the caller's job.

use std::path::Path;

use fieldroute_core::{AppConfig, Location};
use serde::Serialize;

use crate::csv::parse_csv;
use crate::error::IngestError;
use crate::format::FileFormat;
use crate::json::parse_json;
use crate::record::{ParsedTable, RawRecord};
use crate::validate::{validate_records, Validation, ValidationError, ValidationMode};

pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_PREVIEW_ROWS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    /// Files larger than this are rejected before they are read.
    pub max_file_bytes: u64,
    /// Number of records kept in [`UploadBatch::preview`].
    pub preview_rows: usize,
    pub csv_delimiter: char,
    /// Treat `.txt` files as CSV.
    pub accept_txt: bool,
    pub mode: ValidationMode,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            csv_delimiter: ',',
            accept_txt: false,
            mode: ValidationMode::Minimal,
        }
    }
}

impl IngestConfig {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_file_bytes: config.max_upload_bytes,
            preview_rows: config.preview_rows,
            ..Self::default()
        }
    }
}

/// The outcome of processing one file that was structurally sound.
///
/// A batch with validation errors is still returned so callers can show the
/// headers, preview and errors, but its locations cannot be handed off.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadBatch {
    pub file_name: String,
    pub format: FileFormat,
    pub headers: Vec<String>,
    /// The first `preview_rows` records, for display only.
    pub preview: Vec<RawRecord>,
    #[serde(skip)]
    pub records: Vec<RawRecord>,
    pub errors: Vec<ValidationError>,
    #[serde(skip)]
    pub valid_locations: Vec<Location>,
}

impl UploadBatch {
    /// `true` when no record produced a validation error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn total_records(&self) -> usize {
        self.records.len()
    }

    /// All locations, but only if the whole batch is valid.
    #[must_use]
    pub fn ready_locations(&self) -> Option<&[Location]> {
        self.is_valid().then_some(self.valid_locations.as_slice())
    }

    /// Locations from the records that passed, for review and correction.
    /// Never submit these while [`UploadBatch::is_valid`] is `false`.
    #[must_use]
    pub fn valid_subset(&self) -> &[Location] {
        &self.valid_locations
    }

    /// Hands the locations off to the caller.
    ///
    /// # Errors
    ///
    /// Returns the validation errors when the batch is not valid.
    pub fn into_ready(self) -> Result<Vec<Location>, Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(self.valid_locations)
        } else {
            Err(self.errors)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileIngestor {
    config: IngestConfig,
}

impl FileIngestor {
    #[must_use]
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Checks format and size without touching the content.
    ///
    /// # Errors
    ///
    /// [`IngestError::UnsupportedFormat`] or [`IngestError::FileTooLarge`].
    pub fn check(&self, file_name: &str, mime: Option<&str>, size: u64) -> Result<FileFormat, IngestError> {
        let format = FileFormat::detect(file_name, mime, self.config.accept_txt)?;
        self.check_size(size)?;
        Ok(format)
    }

    fn check_size(&self, size: u64) -> Result<(), IngestError> {
        if size > self.config.max_file_bytes {
            return Err(IngestError::FileTooLarge {
                size,
                limit: self.config.max_file_bytes,
            });
        }
        Ok(())
    }

    /// Reads a file after classifying its name and checking its metadata.
    ///
    /// The format is decided from the file name alone, so an unsupported file
    /// is rejected without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Any [`FileIngestor::check`] failure, [`IngestError::Read`] on I/O
    /// failure, or [`IngestError::Encoding`] for non-UTF-8 content.
    pub async fn read(&self, path: &Path) -> Result<(FileFormat, String), IngestError> {
        let read_err = |source| IngestError::Read {
            path: path.display().to_string(),
            source,
        };
        let file_name = display_name(path);
        let format = FileFormat::detect(&file_name, None, self.config.accept_txt)?;

        let metadata = tokio::fs::metadata(path).await.map_err(read_err)?;
        self.check_size(metadata.len())?;

        tracing::debug!(file = %file_name, size = metadata.len(), %format, "reading file");
        let bytes = tokio::fs::read(path).await.map_err(read_err)?;
        // The file may have grown between the metadata call and the read.
        self.check_size(bytes.len() as u64)?;
        let text = decode_utf8(&file_name, bytes)?;
        Ok((format, text))
    }

    /// # Errors
    ///
    /// Any structural error from the CSV or JSON parser.
    pub fn parse(&self, format: FileFormat, text: &str) -> Result<ParsedTable, IngestError> {
        match format {
            FileFormat::Csv => parse_csv(text, self.config.csv_delimiter),
            FileFormat::Json => parse_json(text),
        }
    }

    #[must_use]
    pub fn validate(&self, table: &ParsedTable) -> Validation {
        validate_records(&table.records, self.config.mode)
    }

    /// Builds the batch from a parsed table.
    #[must_use]
    pub fn assemble(&self, file_name: &str, format: FileFormat, table: ParsedTable) -> UploadBatch {
        let Validation { errors, locations } = self.validate(&table);
        let preview = table
            .records
            .iter()
            .take(self.config.preview_rows)
            .cloned()
            .collect();

        if errors.is_empty() {
            tracing::info!(file = %file_name, locations = locations.len(), "file ready");
        } else {
            tracing::warn!(
                file = %file_name,
                records = table.records.len(),
                errors = errors.len(),
                "file failed validation"
            );
        }

        UploadBatch {
            file_name: file_name.to_owned(),
            format,
            headers: table.headers,
            preview,
            records: table.records,
            errors,
            valid_locations: locations,
        }
    }

    /// Runs every stage for a file on disk.
    ///
    /// # Errors
    ///
    /// Returns the structural error that aborted the pipeline. Validation
    /// problems are reported on the returned batch instead.
    pub async fn process_path(&self, path: &Path) -> Result<UploadBatch, IngestError> {
        let (format, text) = self.read(path).await?;
        let table = self.parse(format, &text)?;
        Ok(self.assemble(&display_name(path), format, table))
    }

    /// Runs every stage for content that is already in memory, such as an
    /// upload received by a server.
    ///
    /// # Errors
    ///
    /// See [`FileIngestor::process_path`].
    pub fn process_bytes(&self, file_name: &str, mime: Option<&str>, bytes: Vec<u8>) -> Result<UploadBatch, IngestError> {
        let format = self.check(file_name, mime, bytes.len() as u64)?;
        let text = decode_utf8(file_name, bytes)?;
        let table = self.parse(format, &text)?;
        Ok(self.assemble(file_name, format, table))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn decode_utf8(file_name: &str, bytes: Vec<u8>) -> Result<String, IngestError> {
    String::from_utf8(bytes).map_err(|_| IngestError::Encoding {
        file_name: file_name.to_owned(),
    })
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
