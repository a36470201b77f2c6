//! Utility modules for file output, logging and progress reporting

pub mod io;
pub mod logging;
