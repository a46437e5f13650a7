//! Writes a row set as one CSV table.
//!
//! The header is the sorted union of every row's columns. A row lacking a
//! column gets an empty field in that position.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::AppError;
use crate::flatten::FlatRow;
use crate::streaming::atomic_writer::AtomicCsvWriter;

/// What `write_rows` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Nothing to write; no file was created or modified.
    Skipped,
    Written {
        path: PathBuf,
        columns: usize,
        rows: usize,
    },
}

/// Sorted union of the keys of every row.
pub fn column_set(rows: &[FlatRow]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect()
}

/// Writes `rows` to `destination` as CSV, atomically.
///
/// # Errors
///
/// Returns `AppError::CsvWrite` when the file cannot be created, written or
/// persisted. An empty row set is not an error.
pub fn write_rows(rows: &[FlatRow], destination: &Path) -> Result<WriteOutcome, AppError> {
    if rows.is_empty() {
        warn!("[CSV] No data to save, skipping {}", destination.display());
        return Ok(WriteOutcome::Skipped);
    }

    let columns = column_set(rows);
    let mut writer = AtomicCsvWriter::new(destination)?;

    writer.write_record(&columns)?;
    for row in rows {
        writer.write_record(columns.iter().map(|column| {
            row.get(column)
                .map(|cell| cell.to_string())
                .unwrap_or_default()
        }))?;
    }

    // header is the first record
    let written = writer.records_written().saturating_sub(1);
    let path = writer.finish()?;

    info!("[CSV] Data saved to {}", path.display());
    info!("[CSV] Total columns: {}", columns.len());
    info!("[CSV] Total rows: {}", written);

    Ok(WriteOutcome::Written {
        path,
        columns: columns.len(),
        rows: written,
    })
}
