//! # Report Export
//!
//! Renders a report to PDF and writes it to disk atomically:
//!
//! 1. Render the PDF bytes in memory
//! 2. Write them to `<file>.tmp` and fsync
//! 3. Rename the temp file over the final path
//!
//! A failure at any step removes the temp file, so no partial report is
//! ever left behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::calculations::screening::ScreeningReport;
use crate::config::ExportSettings;
use crate::errors::{CalcError, CalcResult};
use crate::pdf::render_report_pdf;

/// Render `report` and write it to `settings.output_path()`.
pub fn export_report(report: &ScreeningReport, settings: &ExportSettings) -> CalcResult<PathBuf> {
    let path = settings.output_path();

    let result = settings
        .validate()
        .and_then(|()| render_report_pdf(report, settings))
        .and_then(|bytes| write_atomic(&path, &bytes).map(|()| bytes.len()));

    match result {
        Ok(size) => {
            info!(path = %path.display(), bytes = size, "report exported");
            Ok(path)
        }
        Err(e) => {
            error!(path = %path.display(), code = e.error_code(), error = %e, "report export failed");
            Err(e)
        }
    }
}

/// Write `bytes` to `path` through a temp file and rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let tmp_path = tmp_path_for(path);

    if let Err(e) = write_and_sync(&tmp_path, bytes) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

fn write_and_sync(tmp_path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let mut tmp_file = File::create(tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(bytes)
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
