//! Row-oriented (CSV) and array-of-records (JSON) export.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use datasynth_core::RecordSet;

use crate::errors::GenerationError;

pub mod csv;
pub mod json;

pub use self::csv::write_csv;
pub use self::json::write_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Write `records` to `path`, creating parent directories. Returns bytes written.
pub fn export_to_path(
    records: &RecordSet,
    path: &Path,
    format: ExportFormat,
) -> Result<u64, GenerationError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let writer = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Csv => write_csv(records, writer),
        ExportFormat::Json => write_json(records, writer),
    }
}
