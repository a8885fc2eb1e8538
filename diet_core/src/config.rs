//! # Export Settings
//!
//! Where and how the PDF report is written.
//!
//! Loading order (later sources override earlier):
//! 1. Default values
//! 2. `diet_screen.toml` in the working directory, or an explicit file
//! 3. Environment variables with the `DIET_SCREEN__` prefix,
//!    e.g. `DIET_SCREEN__OUTPUT_DIR=/tmp/reports`
//!
//! Command-line flags are applied on top by the caller.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};

/// Default report file name
pub const DEFAULT_FILE_NAME: &str = "diet_screening_results.pdf";

/// Default report heading
pub const DEFAULT_TITLE: &str = "Diet Screening Results";

/// Paper size for the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    /// Typst `page(paper: ...)` name
    pub fn typst_name(&self) -> &'static str {
        match self {
            PaperSize::A4 => "a4",
            PaperSize::Letter => "us-letter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub file_name: String,
    pub title: String,
    /// Clinic or practice name printed under the title (blank to omit)
    pub clinic: String,
    pub paper: PaperSize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            output_dir: PathBuf::from("."),
            file_name: DEFAULT_FILE_NAME.to_string(),
            title: DEFAULT_TITLE.to_string(),
            clinic: String::new(),
            paper: PaperSize::A4,
        }
    }
}

impl ExportSettings {
    /// Load settings from defaults, a config file and the environment.
    ///
    /// With `config_file` set the file must exist; otherwise an optional
    /// `diet_screen.toml` in the working directory is used.
    pub fn load(config_file: Option<&Path>) -> CalcResult<Self> {
        let file_source = match config_file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("diet_screen").required(false),
        };

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&ExportSettings::default())?)
            .add_source(file_source)
            .add_source(config::Environment::with_prefix("DIET_SCREEN").separator("__"))
            .build()?;

        let settings: ExportSettings = settings.try_deserialize()?;
        settings.validate()?;
        debug!(output_dir = %settings.output_dir.display(), file_name = %settings.file_name, "export settings loaded");
        Ok(settings)
    }

    /// The file name must be a bare, non-empty name.
    pub fn validate(&self) -> CalcResult<()> {
        let name = self.file_name.trim();
        if name.is_empty() {
            return Err(CalcError::invalid_input("file_name", &self.file_name, "File name must not be empty"));
        }
        if name.contains(['/', '\\']) {
            return Err(CalcError::invalid_input(
                "file_name",
                &self.file_name,
                "File name must not contain a path; use output_dir",
            ));
        }
        Ok(())
    }

    /// Full path of the report file
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ExportSettings::default();
        assert_eq!(settings.output_path(), Path::new(".").join("diet_screening_results.pdf"));
        assert_eq!(settings.paper, PaperSize::A4);
        assert_eq!(settings.paper.typst_name(), "a4");
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diet_screen.toml");
        std::fs::write(&path, "clinic = \"Ward 7\"\npaper = \"letter\"\n").unwrap();

        let settings = ExportSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.clinic, "Ward 7");
        assert_eq!(settings.paper, PaperSize::Letter);
        assert_eq!(settings.file_name, DEFAULT_FILE_NAME);
        assert_eq!(settings.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_file_name_must_be_bare() {
        let mut settings = ExportSettings::default();
        assert!(settings.validate().is_ok());

        settings.file_name = "  ".to_string();
        assert_eq!(settings.validate().unwrap_err().error_code(), "INVALID_INPUT");

        settings.file_name = "reports/out.pdf".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExportSettings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
