//! Parquet file operations
//!
//! The canonical table is written in one go to a temporary file in the
//! destination directory and then renamed over the target, so a reader only
//! ever sees the previous table or the complete new one.

use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tempfile::NamedTempFile;

use crate::error::util::{ensure_directory, safe_open_file};
use crate::error::{PipelineError, Result};
use crate::models::NormalizedRow;
use crate::schema;
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Rows per record batch
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Mode of the written table; temporary files start out owner-only
#[cfg(unix)]
const TABLE_MODE: u32 = 0o644;

/// Convert rows to a record batch with the canonical schema
pub fn to_record_batch(rows: &[NormalizedRow]) -> Result<RecordBatch> {
    Ok(serde_arrow::to_record_batch(&schema::fields(), &rows)?)
}

/// Write the table atomically
///
/// # Arguments
/// * `path` - Destination file; its parent directory is created if needed
/// * `rows` - Rows in canonical order
///
/// # Returns
/// Number of rows written
pub fn write_rows(path: &Path, rows: &[NormalizedRow]) -> Result<usize> {
    let start = Instant::now();
    log_operation_start("Writing canonical table to", path);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    ensure_directory(dir, true)?;

    if rows.is_empty() {
        log_warning("Writing an empty table", Some(path));
    }

    let properties = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let batch = to_record_batch(rows)?;

    let temp = NamedTempFile::new_in(dir)?;
    let mut writer = ArrowWriter::try_new(temp.reopen()?, batch.schema(), Some(properties))?;
    for offset in (0..batch.num_rows()).step_by(DEFAULT_BATCH_SIZE) {
        let length = DEFAULT_BATCH_SIZE.min(batch.num_rows() - offset);
        writer.write(&batch.slice(offset, length))?;
    }
    writer.close()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(TABLE_MODE))?;
    }
    temp.persist(path).map_err(|e| PipelineError::Io(e.error))?;

    log_operation_complete("wrote", path, rows.len(), Some(start.elapsed()));
    Ok(rows.len())
}

/// Read a canonical table back into rows
pub fn read_rows(path: &Path) -> Result<Vec<NormalizedRow>> {
    let start = Instant::now();
    log_operation_start("Reading canonical table from", path);

    let file = safe_open_file(path, "canonical table")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    schema::check_schema(builder.schema())?;
    let reader = builder.with_batch_size(DEFAULT_BATCH_SIZE).build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        rows.extend(serde_arrow::from_record_batch::<Vec<NormalizedRow>>(&batch)?);
    }

    log_operation_complete("read", path, rows.len(), Some(start.elapsed()));
    Ok(rows)
}
