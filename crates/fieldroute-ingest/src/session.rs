//! Caller-owned state for the file currently being ingested.
//!
//! `Idle → Reading → Parsed → Validated → Ready | Rejected`. Every file
//! selection takes a new [`Ticket`]; a completion carrying an older ticket is
//! discarded, so a slow read of a previously selected file can never replace
//! the result of a newer one.

use std::fmt;
use std::path::Path;

use fieldroute_core::{GenerationCounter, Location, Ticket};
use serde::Serialize;
use thiserror::Error;

use crate::error::IngestError;
use crate::pipeline::{FileIngestor, UploadBatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Idle,
    Reading,
    Parsed,
    Validated,
    Ready,
    Rejected,
}

impl Stage {
    fn can_move_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Reading, Stage::Parsed | Stage::Rejected)
                | (Stage::Parsed, Stage::Validated | Stage::Rejected)
                | (Stage::Validated, Stage::Ready | Stage::Rejected)
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Reading => "reading",
            Stage::Parsed => "parsed",
            Stage::Validated => "validated",
            Stage::Ready => "ready",
            Stage::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("result for ticket {ticket} is stale; a newer file has been selected")]
    Stale { ticket: u64 },

    #[error("cannot move from {from} to {to}")]
    IllegalTransition { from: Stage, to: Stage },
}

#[derive(Debug, Default)]
pub struct IngestSession {
    generation: GenerationCounter,
    stage: Stage,
    file_name: Option<String>,
    batch: Option<UploadBatch>,
    failure: Option<IngestError>,
}

impl IngestSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// The current batch, valid or not. `None` until a file has been parsed,
    /// and after a structural failure.
    #[must_use]
    pub fn batch(&self) -> Option<&UploadBatch> {
        self.batch.as_ref()
    }

    /// The structural error that rejected the current file, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&IngestError> {
        self.failure.as_ref()
    }

    /// Starts a new file, superseding whatever was in progress or loaded.
    pub fn begin(&mut self, file_name: &str) -> Ticket {
        let ticket = self.generation.next();
        self.stage = Stage::Reading;
        self.file_name = Some(file_name.to_owned());
        self.batch = None;
        self.failure = None;
        tracing::debug!(ticket = ticket.value(), file = %file_name, "ingestion started");
        ticket
    }

    /// Moves the current file to `next`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Stale`] if `ticket` was superseded,
    /// [`SessionError::IllegalTransition`] if `next` does not follow the
    /// current stage.
    pub fn advance(&mut self, ticket: Ticket, next: Stage) -> Result<(), SessionError> {
        self.ensure_current(ticket)?;
        self.transition(next)
    }

    /// Applies the pipeline result for `ticket`, walking through the
    /// remaining stages to `Ready` or `Rejected`.
    ///
    /// # Errors
    ///
    /// [`SessionError::Stale`] when a newer file was selected or the session
    /// was cleared; the result is dropped and the session is unchanged.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<UploadBatch, IngestError>,
    ) -> Result<Stage, SessionError> {
        self.ensure_current(ticket)?;

        match result {
            Ok(batch) => {
                if self.stage == Stage::Reading {
                    self.transition(Stage::Parsed)?;
                }
                if self.stage == Stage::Parsed {
                    self.transition(Stage::Validated)?;
                }
                let last = if batch.is_valid() {
                    Stage::Ready
                } else {
                    Stage::Rejected
                };
                self.transition(last)?;
                self.batch = Some(batch);
            }
            Err(err) => {
                self.transition(Stage::Rejected)?;
                tracing::warn!(error = %err, "file rejected");
                self.failure = Some(err);
            }
        }
        Ok(self.stage)
    }

    /// Reads, parses and validates `path` under a fresh ticket.
    ///
    /// # Errors
    ///
    /// See [`IngestSession::complete`].
    pub async fn load(&mut self, ingestor: &FileIngestor, path: &Path) -> Result<Stage, SessionError> {
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let ticket = self.begin(&file_name);
        let result = ingestor.process_path(path).await;
        self.complete(ticket, result)
    }

    /// Parses and validates content that is already in memory under a fresh
    /// ticket. Callers that go on to submit the file should send these same
    /// bytes rather than reading the file again.
    ///
    /// # Errors
    ///
    /// See [`IngestSession::complete`].
    pub fn load_bytes(
        &mut self,
        ingestor: &FileIngestor,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Stage, SessionError> {
        let ticket = self.begin(file_name);
        let result = ingestor.process_bytes(file_name, None, bytes);
        self.complete(ticket, result)
    }

    /// Drops the current file and invalidates any outstanding ticket.
    pub fn clear(&mut self) {
        self.generation.invalidate();
        self.stage = Stage::Idle;
        self.file_name = None;
        self.batch = None;
        self.failure = None;
    }

    /// Hands off the locations of a `Ready` batch and returns to `Idle`.
    /// Returns `None` in any other stage.
    pub fn take_ready(&mut self) -> Option<Vec<Location>> {
        if self.stage != Stage::Ready {
            return None;
        }
        let locations = self.batch.take()?.into_ready().ok()?;
        self.clear();
        Some(locations)
    }

    fn ensure_current(&self, ticket: Ticket) -> Result<(), SessionError> {
        if self.generation.is_current(ticket) {
            Ok(())
        } else {
            tracing::debug!(ticket = ticket.value(), "discarding stale ingestion result");
            Err(SessionError::Stale {
                ticket: ticket.value(),
            })
        }
    }

    fn transition(&mut self, next: Stage) -> Result<(), SessionError> {
        if !self.stage.can_move_to(next) {
            return Err(SessionError::IllegalTransition {
                from: self.stage,
                to: next,
            });
        }
        tracing::debug!(from = %self.stage, to = %next, "ingestion stage");
        self.stage = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
