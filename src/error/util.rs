//! Utility functions for error handling
//!
//! File access helpers that attach the path and the reason the file was
//! needed to any failure.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(PipelineError::MissingSource {
            path: path.to_path_buf(),
            purpose: format!("file not found, needed for {purpose}"),
        });
    }

    if !path.is_file() {
        return Err(PipelineError::MissingSource {
            path: path.to_path_buf(),
            purpose: format!("path is not a file, expected one for {purpose}"),
        });
    }

    match fs::File::open(path) {
        Ok(file) => Ok(file),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    "permission denied - check file permissions".to_string()
                }
                io::ErrorKind::NotFound => {
                    "file not found - it may have been deleted during operation".to_string()
                }
                _ => format!("failed to open file for {purpose}: {e}"),
            };
            Err(PipelineError::MissingSource {
                path: path.to_path_buf(),
                purpose: context,
            })
        }
    }
}

/// Read a whole file into memory
///
/// Raw extracts are small yearly snapshots, so they are read eagerly and
/// decoded afterwards.
pub fn safe_read_bytes(path: &Path, purpose: &str) -> Result<Vec<u8>> {
    let mut file = safe_open_file(path, purpose)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Check that a directory exists, creating it when `create` is set
pub fn ensure_directory(path: &Path, create: bool) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(PipelineError::MissingSource {
            path: path.to_path_buf(),
            purpose: "path exists but is not a directory".to_string(),
        });
    }
    if create {
        fs::create_dir_all(path)?;
        return Ok(());
    }
    Err(PipelineError::MissingSource {
        path: path.to_path_buf(),
        purpose: "directory not found".to_string(),
    })
}
