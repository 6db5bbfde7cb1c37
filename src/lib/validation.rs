//! Input validation utilities with consistent error messages.

use std::path::Path;

use crate::errors::{Result, SplitError};

/// Validates that a file exists.
///
/// # Errors
/// Returns [`SplitError::MissingInput`] if the path does not exist.
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SplitError::MissingInput {
            description: description.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Validates that a path exists and is a directory.
///
/// # Errors
/// Returns [`SplitError::MissingInput`] if the path is not an existing
/// directory.
pub fn validate_dir_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        return Err(SplitError::MissingInput {
            description: description.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
