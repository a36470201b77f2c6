//! File output for the canonical table

pub mod parquet;

pub use parquet::{read_rows, write_rows};
