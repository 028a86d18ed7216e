//! Location file ingestion: format detection, CSV/JSON parsing and
//! validation into [`fieldroute_core::Location`]s.

pub mod csv;
pub mod error;
pub mod format;
pub mod json;
pub mod pipeline;
pub mod record;
pub mod session;
pub mod validate;

pub use error::IngestError;
pub use format::FileFormat;
pub use pipeline::{FileIngestor, IngestConfig, UploadBatch};
pub use record::{ParsedTable, RawRecord, RawValue};
pub use session::{IngestSession, SessionError, Stage};
pub use validate::{ValidationError, ValidationMode};
