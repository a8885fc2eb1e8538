//! # diet_core - Diet Screening Calculation Engine
//!
//! `diet_core` computes nutrition screening metrics from a handful of
//! anthropometric inputs: BMI and its category, ideal body weight, basal
//! energy expenditure, daily energy needs for healthy individuals or
//! hospitalized patients, supplement offsets and a per-meal calorie split.
//! All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: `calculate` is a pure function of a validated input
//! - **JSON-First**: Form, report and errors implement Serialize
//! - **Rich Errors**: Every invalid field is reported, not just the first
//! - **Traceable**: Each report records the formulas it used
//!
//! ## Quick Start
//!
//! ```rust
//! use diet_core::session::ScreeningSession;
//! use diet_core::calculations::InpatientActivity;
//!
//! let mut session = ScreeningSession::new();
//! session.form.weight_kg = Some(62.0);
//! session.form.height_cm = Some(158.0);
//! session.form.age_years = Some(71.0);
//! session.form.inpatient_activity = InpatientActivity::Bedrest;
//!
//! let report = session.calculate().unwrap();
//! let json = serde_json::to_string_pretty(&report.summary()).unwrap();
//! assert!(json.contains("\"track\": \"inpatient\""));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Formulas, lookup tables and the screening report
//! - [`equations`] - Formula metadata and the references appendix
//! - [`session`] - Form state, calculate/reset/export lifecycle
//! - [`config`] - Export settings (file, environment)
//! - [`pdf`] - Typst PDF rendering
//! - [`export`] - Atomic report export
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod equations;
pub mod errors;
pub mod export;
pub mod pdf;
pub mod session;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{screen, ReportView, ScreeningForm, ScreeningReport};
pub use config::ExportSettings;
pub use errors::{CalcError, CalcResult, FieldError};
pub use export::export_report;
pub use session::ScreeningSession;
