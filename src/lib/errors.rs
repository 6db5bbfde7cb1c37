//! Custom error types for scsplit operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for scsplit operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Error type for scsplit operations.
///
/// Structural failures (unreadable source, unreadable barcode list,
/// unwritable sink) abort a run; per-record anomalies are never represented
/// here - they are counted by [`crate::stats::SplitStats`] and the pass
/// continues.
#[derive(Error, Debug)]
pub enum SplitError {
    /// The alignment source could not be opened or read
    #[error("failed to read alignment source '{path}': {source}")]
    SourceUnreadable {
        /// Path to the BAM file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The barcode list could not be opened or read
    #[error("failed to read barcode list '{path}': {source}")]
    BarcodeSourceUnreadable {
        /// Path to the barcode list file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A cell sink could not be created or written
    #[error("failed to write cell sink '{path}': {source}")]
    SinkUnwritable {
        /// Path to the output BAM file or directory
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The barcode list contains the same barcode twice
    #[error("duplicate barcode '{barcode}' in barcode list (entries {first} and {second})")]
    DuplicateBarcode {
        /// The duplicated barcode
        barcode: String,
        /// 1-based position of the first occurrence
        first: usize,
        /// 1-based position of the second occurrence
        second: usize,
    },

    /// A SAM header record could not be built
    #[error("invalid header: {reason}")]
    InvalidHeader {
        /// Explanation of the problem
        reason: String,
    },

    /// A required input path does not exist
    #[error("{description} does not exist: '{path}'")]
    MissingInput {
        /// Human-readable description of the input (e.g. "Input BAM")
        description: String,
        /// The missing path
        path: PathBuf,
    },
}
