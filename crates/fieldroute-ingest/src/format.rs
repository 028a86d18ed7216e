use std::fmt;

use serde::Serialize;

use crate::error::IngestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Picks the parser for a file from its name, falling back to its MIME type.
    ///
    /// `.txt` files are read as CSV only when `accept_txt` is set.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::UnsupportedFormat`] when neither the extension
    /// nor the MIME type identifies CSV or JSON.
    pub fn detect(file_name: &str, mime: Option<&str>, accept_txt: bool) -> Result<Self, IngestError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => return Ok(FileFormat::Csv),
            Some("json") => return Ok(FileFormat::Json),
            Some("txt") if accept_txt => return Ok(FileFormat::Csv),
            _ => {}
        }

        // Parameters such as `; charset=utf-8` do not change the format.
        let essence = mime
            .and_then(|m| m.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase());
        match essence.as_deref() {
            Some("text/csv") => Ok(FileFormat::Csv),
            Some("application/json") => Ok(FileFormat::Json),
            _ => Err(IngestError::UnsupportedFormat {
                file_name: file_name.to_owned(),
            }),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => write!(f, "csv"),
            FileFormat::Json => write!(f, "json"),
        }
    }
}
