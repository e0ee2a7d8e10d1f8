// src/export/mod.rs

mod fs_utils;
mod json_csv;

pub use fs_utils::ensure_writable;

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use clap::ValueEnum;
use json_csv::{export_csv, export_json};
use serde::Serialize;
use std::io;
use std::path::Path;

/// Shared completion message for every export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

pub struct ExportLogic;

impl ExportLogic {
    /// Write a report to `file`.
    ///
    /// JSON gets the whole `document`; CSV gets the flat `rows`, one line
    /// each, with a header derived from the row type.
    pub fn export<D, R>(
        format: ExportFormat,
        file: &str,
        force: bool,
        document: &D,
        rows: &[R],
    ) -> AppResult<()>
    where
        D: Serialize,
        R: Serialize,
    {
        let path = Path::new(file);

        if file.trim().is_empty() {
            return Err(AppError::from(io::Error::other("Output file path is empty")));
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Json => export_json(document, path),
            ExportFormat::Csv => {
                if rows.is_empty() {
                    warning("No rows to export for the selected report.");
                }
                export_csv(rows, path)
            }
        }
    }
}
