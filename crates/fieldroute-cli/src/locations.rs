//! Location file import and upload.
//!
//! `import` only runs the local pipeline. `upload` reads the file once, runs
//! the same pipeline over those bytes and sends exactly those bytes to the
//! backend only when every record passed.

use std::path::Path;

use anyhow::Context;
use clap::Subcommand;
use fieldroute_client::ApiClient;
use fieldroute_core::AppConfig;
use fieldroute_ingest::{FileIngestor, IngestConfig, IngestSession, Stage, UploadBatch, ValidationMode};

use crate::output::{print_locations, truncate};

#[derive(Debug, Subcommand)]
pub enum LocationsCommands {
    /// List locations stored on the backend
    List,
}

fn ingestor(config: &AppConfig, strict: bool, accept_txt: bool) -> FileIngestor {
    FileIngestor::new(IngestConfig {
        accept_txt,
        mode: if strict {
            ValidationMode::Strict
        } else {
            ValidationMode::Minimal
        },
        ..IngestConfig::from_config(config)
    })
}

/// Loads `file` through an [`IngestSession`] and prints the outcome.
///
/// Returns the session so callers can take the ready locations.
async fn load(ingestor: &FileIngestor, file: &Path) -> anyhow::Result<IngestSession> {
    let mut session = IngestSession::new();
    let stage = session.load(ingestor, file).await?;
    report(&session, stage, file)?;
    Ok(session)
}

/// Prints the batch and fails unless the session ended `Ready`.
fn report(session: &IngestSession, stage: Stage, file: &Path) -> anyhow::Result<()> {
    if let Some(err) = session.failure() {
        anyhow::bail!("{}: {err}", file.display());
    }
    if let Some(batch) = session.batch() {
        print_batch(batch);
    }
    if stage == Stage::Rejected {
        let count = session.batch().map_or(0, |b| b.errors.len());
        anyhow::bail!(
            "{}: {count} validation error(s); fix the file and try again",
            file.display()
        );
    }
    Ok(())
}

fn print_batch(batch: &UploadBatch) {
    println!(
        "{} ({}): {} record(s), columns: {}",
        batch.file_name,
        batch.format,
        batch.total_records(),
        batch.headers.join(", ")
    );
    for record in &batch.preview {
        let rendered = serde_json::to_string(record).unwrap_or_default();
        println!("  row {:<5}{}", record.row, truncate(&rendered, 100));
    }
    if batch.preview.len() < batch.total_records() {
        println!("  ... {} more", batch.total_records() - batch.preview.len());
    }

    if !batch.errors.is_empty() {
        println!();
        println!("{:<7}{:<20}MESSAGE", "ROW", "FIELD");
        for error in &batch.errors {
            println!("{:<7}{:<20}{}", error.row, error.field, error.message);
        }
    }
}

/// Validate a locations file without contacting the backend.
///
/// # Errors
///
/// Returns an error if the file is structurally invalid or any record fails
/// validation.
pub(crate) async fn run_import(
    config: &AppConfig,
    file: &Path,
    strict: bool,
    accept_txt: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = load(&ingestor(config, strict, accept_txt), file).await?;
    let locations = session.take_ready().unwrap_or_default();

    println!();
    if json {
        println!("{}", serde_json::to_string_pretty(&locations)?);
    } else {
        print_locations(&locations);
    }
    Ok(())
}

/// Validate a locations file locally, then upload the validated bytes.
///
/// # Errors
///
/// Returns an error if the file cannot be read, local validation fails, or
/// the upload is rejected. Nothing is sent unless validation passed.
pub(crate) async fn run_upload(
    client: &ApiClient,
    config: &AppConfig,
    file: &Path,
    strict: bool,
) -> anyhow::Result<()> {
    let ingestor = ingestor(config, strict, false);
    let file_name = file
        .file_name()
        .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned());

    let metadata = tokio::fs::metadata(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    ingestor
        .check(&file_name, None, metadata.len())
        .with_context(|| file.display().to_string())?;
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut session = IngestSession::new();
    let stage = session.load_bytes(&ingestor, &file_name, bytes.clone())?;
    report(&session, stage, file)?;
    let count = session.take_ready().map_or(0, |l| l.len());
    tracing::info!(file = %file.display(), locations = count, "uploading validated file");

    let response = client.upload_locations_bytes(&file_name, bytes).await?;
    println!(
        "{}: {}",
        if response.success { "uploaded" } else { "upload failed" },
        response.message
    );
    if !response.locations.is_empty() {
        print_locations(&response.locations);
    }
    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        println!();
        println!("server reported {} problem(s):", errors.len());
        for error in &errors {
            println!("  {error}");
        }
    }
    if !response.success {
        anyhow::bail!("backend rejected {}", file.display());
    }
    Ok(())
}

/// List locations stored on the backend.
///
/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_locations_list(client: &ApiClient) -> anyhow::Result<()> {
    let locations = client.list_locations().await?;
    if locations.is_empty() {
        println!("no locations stored; run `upload <file>` first");
        return Ok(());
    }
    print_locations(&locations);
    Ok(())
}
