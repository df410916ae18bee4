// src/commands.rs
use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::extractors::{self, ScanOptions};
use crate::records::{filter_table, OutcomeSelector, ResultTable};
use crate::storage::{write_table, StorageManager};
use crate::utils::config::Settings;
use crate::utils::AppError;

/// What the `extract` command hands back to its caller.
#[derive(Debug)]
pub struct ExtractOutcome {
    pub table_id: Uuid,
    pub table_path: PathBuf,
    pub table: ResultTable,
}

/// Where a filtered table goes.
#[derive(Debug, Clone)]
pub enum FilterOutput {
    Stdout,
    File(PathBuf),
    /// `filtered_results_<code>.csv` inside the output directory.
    Store,
}

/// Returns the value untouched, or an input error naming `field` when it
/// is absent or blank.
fn require<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Input(format!("{} is required", field))),
    }
}

/// Decodes and scans `pdf`, then persists the table under a new id.
pub async fn run_extract(settings: &Settings, pdf: &Path) -> Result<ExtractOutcome, AppError> {
    let storage = StorageManager::new(&settings.output_dir)?;
    let options = ScanOptions {
        reset_per_page: settings.reset_per_page,
    };

    // PDF decoding is CPU bound, keep it off the runtime threads
    let source = pdf.to_path_buf();
    let report = tokio::task::spawn_blocking(move || extractors::extract_document(&source, options))
        .await
        .map_err(|e| AppError::Processing(format!("Extraction task failed: {}", e)))??;

    let table_id = storage.new_table_id();
    let table_path = storage.save_table(&table_id, &report.table)?;

    match storage.save_table_metadata(&table_id, pdf, &report) {
        Ok(path) => tracing::debug!("Saved table metadata to: {}", path.display()),
        Err(e) => tracing::error!("Failed to save table metadata: {}", e),
    }

    Ok(ExtractOutcome {
        table_id,
        table_path,
        table: report.table,
    })
}

/// Loads the referenced table and narrows it by subject code and outcome.
pub fn filter_persisted(
    storage: &StorageManager,
    table_ref: Option<&str>,
    subject_code: Option<&str>,
    outcome: Option<&str>,
) -> Result<ResultTable, AppError> {
    let subject_code = require(subject_code, "subject code")?;
    let selector = OutcomeSelector::parse(require(outcome, "outcome selector")?);
    let table_ref = require(table_ref, "table reference")?;

    let table = storage.load_table(table_ref)?;
    Ok(filter_table(&table, subject_code, selector))
}

/// Filters a persisted table and delivers the result to `output`.
pub async fn run_filter(
    settings: &Settings,
    table_ref: Option<&str>,
    subject_code: Option<&str>,
    outcome: Option<&str>,
    output: FilterOutput,
) -> Result<ResultTable, AppError> {
    let output_dir = settings.output_dir.clone();
    let table_ref = table_ref.map(str::to_owned);
    let subject_code = subject_code.map(str::to_owned);
    let outcome = outcome.map(str::to_owned);

    // Table load and export are plain file I/O, run them off the runtime threads
    tokio::task::spawn_blocking(move || {
        let storage = StorageManager::new(&output_dir)?;
        let filtered = filter_persisted(
            &storage,
            table_ref.as_deref(),
            subject_code.as_deref(),
            outcome.as_deref(),
        )?;
        tracing::info!("Filter matched {} records", filtered.len());
        deliver(&storage, &filtered, subject_code.as_deref().unwrap_or_default(), output)?;
        Ok::<_, AppError>(filtered)
    })
    .await
    .map_err(|e| AppError::Processing(format!("Filter task failed: {}", e)))?
}

fn deliver(
    storage: &StorageManager,
    filtered: &ResultTable,
    subject_code: &str,
    output: FilterOutput,
) -> Result<(), AppError> {
    match output {
        FilterOutput::Stdout => {
            write_table(filtered, std::io::stdout().lock())?;
        }
        FilterOutput::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            write_table(filtered, fs::File::create(&path)?)?;
            tracing::info!("Saved filtered results to: {}", path.display());
        }
        FilterOutput::Store => {
            storage.save_filtered(subject_code, filtered)?;
        }
    }
    Ok(())
}
