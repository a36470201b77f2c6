//! Logging utilities
//!
//! Standardized start/finish lines for file-backed operations.

use std::path::Path;
use std::time::Duration;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Past-tense verb for the operation ("read", "wrote")
/// * `path` - Path of the file that was operated on
/// * `items` - Number of rows or records processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(operation: &str, path: &Path, items: usize, elapsed: Option<Duration>) {
    match elapsed {
        Some(duration) => log::info!(
            "Successfully {} {} items ({}) in {:?}",
            operation,
            items,
            path.display(),
            duration
        ),
        None => log::info!("Successfully {} {} items ({})", operation, items, path.display()),
    }
}

/// Log a warning, optionally about a specific path
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}
