//! Atomic CSV file writer with automatic cleanup on failure.
//!
//! Records go to a temporary file next to the destination, which replaces
//! the destination only on `finish()`. Dropping the writer early removes the
//! temporary file and leaves any existing destination untouched.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::Writer;
use tempfile::NamedTempFile;

use crate::error::AppError;

/// An atomic CSV writer.
pub struct AtomicCsvWriter {
    writer: Writer<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
    records_written: usize,
}

impl AtomicCsvWriter {
    /// Creates a writer targeting `final_path`.
    ///
    /// The temporary file lives in the same directory as `final_path` so the
    /// final rename stays on one filesystem. A bare file name is resolved
    /// against the current directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::CsvWrite` if the parent directory cannot be
    /// determined or the temporary file cannot be created.
    pub fn new(final_path: impl AsRef<Path>) -> Result<Self, AppError> {
        let final_path = final_path.as_ref().to_path_buf();

        let parent_dir = match final_path.parent() {
            Some(dir) if dir.as_os_str().is_empty() => Path::new("."),
            Some(dir) => dir,
            None => {
                return Err(AppError::CsvWrite(format!(
                    "Cannot determine parent directory for: {}",
                    final_path.display()
                )))
            }
        };

        let temp_file = NamedTempFile::new_in(parent_dir)
            .map_err(|e| AppError::CsvWrite(format!("Failed to create temporary file: {}", e)))?;

        Ok(Self {
            writer: Writer::from_writer(BufWriter::new(temp_file)),
            final_path,
            records_written: 0,
        })
    }

    /// Writes one record (header or data) with standard CSV quoting.
    pub fn write_record<I, T>(&mut self, record: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(record)
            .map_err(|e| AppError::CsvWrite(format!("Failed to write record: {}", e)))?;
        self.records_written += 1;
        Ok(())
    }

    /// Number of records written so far, header included.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flushes all buffers and atomically persists the file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::CsvWrite` if flushing or persisting fails; the
    /// temporary file is removed in that case.
    pub fn finish(self) -> Result<PathBuf, AppError> {
        let buf_writer = self.writer.into_inner().map_err(|e| {
            AppError::CsvWrite(format!("Failed to flush CSV writer: {}", e.error()))
        })?;

        let named_temp = buf_writer
            .into_inner()
            .map_err(|e| AppError::CsvWrite(format!("Failed to flush buffer: {}", e.error())))?;

        named_temp.persist(&self.final_path).map_err(|e| {
            AppError::CsvWrite(format!(
                "Failed to persist file to {}: {}",
                self.final_path.display(),
                e.error
            ))
        })?;

        Ok(self.final_path)
    }
}
