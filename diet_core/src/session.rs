//! # Screening Session
//!
//! The `ScreeningSession` holds the form currently being edited and the
//! report from the last successful calculation.
//!
//! ## Lifecycle
//!
//! ```text
//! ScreeningSession
//! ├── form: ScreeningForm       (edited freely)
//! └── report: Option<ScreeningReport>
//!       calculate() -> Some(report) | None on validation failure
//!       export()    -> requires Some(report)
//!       reset()     -> defaults, None
//! ```
//!
//! ## Example
//!
//! ```rust
//! use diet_core::session::ScreeningSession;
//!
//! let mut session = ScreeningSession::new();
//! session.form.weight_kg = Some(70.0);
//! session.form.height_cm = Some(170.0);
//! session.form.age_years = Some(30.0);
//!
//! let report = session.calculate().unwrap();
//! assert_eq!(report.summary().bmi, 24.22);
//! assert!(session.has_calculated());
//!
//! session.reset();
//! assert!(!session.has_calculated());
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::screening::{screen, ScreeningForm, ScreeningReport};
use crate::config::ExportSettings;
use crate::errors::{CalcError, CalcResult};
use crate::export::export_report;

/// Form state plus the last calculated report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreeningSession {
    pub form: ScreeningForm,

    /// Report from the last successful calculation
    #[serde(skip)]
    report: Option<ScreeningReport>,
}

impl ScreeningSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from an already filled-in form.
    pub fn with_form(form: ScreeningForm) -> Self {
        ScreeningSession { form, report: None }
    }

    /// Validate the form and calculate a new report.
    ///
    /// On failure the previous report is discarded, so an export can never
    /// pick up results that no longer match the form.
    pub fn calculate(&mut self) -> CalcResult<&ScreeningReport> {
        self.report = None;
        let report = screen(&self.form)?;
        Ok(&*self.report.insert(report))
    }

    pub fn report(&self) -> Option<&ScreeningReport> {
        self.report.as_ref()
    }

    pub fn has_calculated(&self) -> bool {
        self.report.is_some()
    }

    /// Restore the fresh-form state and drop the report.
    pub fn reset(&mut self) {
        debug!("screening session reset");
        self.form = ScreeningForm::default();
        self.report = None;
    }

    /// Write the current report as a PDF. Returns the written path.
    pub fn export(&self, settings: &ExportSettings) -> CalcResult<PathBuf> {
        let report = self.report.as_ref().ok_or(CalcError::NotCalculated)?;
        export_report(report, settings)
    }

    /// Export, then reset the session once the file is written.
    ///
    /// A failed export leaves the session untouched.
    pub fn export_then_reset(&mut self, settings: &ExportSettings) -> CalcResult<PathBuf> {
        let path = self.export(settings)?;
        self.reset();
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::energy::{ActivityLevel, Gender, StressFactor};

    fn filled_session() -> ScreeningSession {
        let mut session = ScreeningSession::new();
        session.form.weight_kg = Some(70.0);
        session.form.height_cm = Some(170.0);
        session.form.age_years = Some(30.0);
        session
    }

    #[test]
    fn test_new_session_is_reset_state() {
        let session = ScreeningSession::new();
        assert_eq!(session.form, ScreeningForm::default());
        assert_eq!(session.form.meals_per_day, 3);
        assert!(!session.has_calculated());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = filled_session();
        session.form.gender = Gender::Female;
        session.form.stress_factor = StressFactor::Trauma;
        session.form.meals_per_day = 6;
        session.calculate().unwrap();

        session.reset();
        assert_eq!(session.form, ScreeningForm::default());
        assert!(session.report().is_none());
    }

    #[test]
    fn test_failed_calculation_clears_previous_report() {
        let mut session = filled_session();
        session.calculate().unwrap();
        assert!(session.has_calculated());

        session.form.height_cm = None;
        let err = session.calculate().unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
        assert!(!session.has_calculated());
    }

    #[test]
    fn test_recalculate_replaces_report() {
        let mut session = filled_session();
        session.calculate().unwrap();
        session.form.activity_level = ActivityLevel::VeryActive;
        let report = session.calculate().unwrap();
        assert!(report.summary().tdee.is_some());
    }

    #[test]
    fn test_export_before_calculate_fails() {
        let session = filled_session();
        let err = session.export(&ExportSettings::default()).unwrap_err();
        assert_eq!(err, CalcError::NotCalculated);
    }

    #[test]
    fn test_export_then_reset() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings {
            output_dir: dir.path().to_path_buf(),
            ..ExportSettings::default()
        };

        let mut session = filled_session();
        session.form.activity_level = ActivityLevel::Sedentary;
        session.calculate().unwrap();

        let path = session.export_then_reset(&settings).unwrap();
        assert_eq!(path, dir.path().join("diet_screening_results.pdf"));
        assert!(path.exists());
        assert!(!session.has_calculated());
        assert_eq!(session.form, ScreeningForm::default());
    }

    #[test]
    fn test_failed_export_keeps_session() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings {
            output_dir: dir.path().join("missing").join("nested"),
            ..ExportSettings::default()
        };

        let mut session = filled_session();
        session.calculate().unwrap();
        assert!(session.export_then_reset(&settings).is_err());
        assert!(session.has_calculated());
    }
}
