//! CSV output for flattened rows.
//!
//! This module provides atomic file writing with automatic cleanup on
//! failure, and the table writer that aligns variable-shaped rows under one
//! sorted header.

mod atomic_writer;
mod row_writer;

pub use atomic_writer::AtomicCsvWriter;
pub use row_writer::{column_set, write_rows, WriteOutcome};
