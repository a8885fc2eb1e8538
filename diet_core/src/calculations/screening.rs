//! # Screening Calculation
//!
//! Turns a filled-in form into a [`ScreeningReport`].
//!
//! ## Tracks
//!
//! The report shows exactly one energy track, picked from which factors the
//! form sets:
//!
//! - any healthy **activity level** -> [`ReportView::Healthy`] (TDEE + meal plan)
//! - otherwise any **inpatient activity** or **stress factor** ->
//!   [`ReportView::Inpatient`] (TEE, supplement offset + meal plan)
//! - nothing set -> [`ReportView::Basic`] (BMI and ideal weight only)
//!
//! A form that sets both a healthy activity level and inpatient factors is
//! rejected with [`CalcError::ConflictingTracks`].
//!
//! ## Example
//!
//! ```rust
//! use diet_core::calculations::screening::{screen, ReportView, ScreeningForm};
//! use diet_core::calculations::energy::ActivityLevel;
//!
//! let form = ScreeningForm {
//!     weight_kg: Some(70.0),
//!     height_cm: Some(170.0),
//!     age_years: Some(30.0),
//!     activity_level: ActivityLevel::Sedentary,
//!     ..ScreeningForm::default()
//! };
//!
//! let report = screen(&form).unwrap();
//! assert_eq!(report.summary().bmi, 24.22);
//! assert!(matches!(report.view, ReportView::Healthy(_)));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::calculations::body_mass::{body_mass_index, ideal_body_weight, BmiCategory};
use crate::calculations::energy::{
    basal_energy_expenditure, total_daily_energy_expenditure, total_energy_expenditure, ActivityLevel,
    Gender, InpatientActivity, StressFactor,
};
use crate::calculations::enteral::{adjusted_energy, EnteralProduct};
use crate::calculations::meals::{meal_split_for_count, MealPlan, MealSlot, DEFAULT_MEALS_PER_DAY};
use crate::equations::{Equation, EquationTracker};
use crate::errors::{CalcError, CalcResult, FieldError};
use crate::units::{round2, Centimeters, Kcal, Kilograms};

// ============================================================================
// Raw Form
// ============================================================================

/// Form state as entered by the user.
///
/// `Default` is the state of a fresh (or reset) form: empty measurements,
/// male, every factor `none`, three meals.
///
/// Measurements accept a JSON number or a string. An empty string counts as
/// missing and text that is not a number is kept as NaN, so both surface as
/// field errors from [`ScreeningForm::validate`].
///
/// ## JSON Example
///
/// ```json
/// {
///   "weight_kg": 70.0,
///   "height_cm": 170.0,
///   "age_years": 30.0,
///   "gender": "male",
///   "activity_level": "none",
///   "inpatient_activity": "bedrest",
///   "stress_factor": "sepsis",
///   "enteral_product": "ensure_4",
///   "meals_per_day": 4
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningForm {
    #[serde(deserialize_with = "deserialize_measurement")]
    pub weight_kg: Option<f64>,
    #[serde(deserialize_with = "deserialize_measurement")]
    pub height_cm: Option<f64>,
    #[serde(deserialize_with = "deserialize_measurement")]
    pub age_years: Option<f64>,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub inpatient_activity: InpatientActivity,
    pub stress_factor: StressFactor,
    pub enteral_product: EnteralProduct,
    pub meals_per_day: u8,
}

impl Default for ScreeningForm {
    fn default() -> Self {
        ScreeningForm {
            weight_kg: None,
            height_cm: None,
            age_years: None,
            gender: Gender::Male,
            activity_level: ActivityLevel::None,
            inpatient_activity: InpatientActivity::None,
            stress_factor: StressFactor::None,
            enteral_product: EnteralProduct::None,
            meals_per_day: DEFAULT_MEALS_PER_DAY,
        }
    }
}

impl ScreeningForm {
    /// Parse a form from JSON. Missing keys take their reset values.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the form.
    ///
    /// Age, weight and height are checked independently and every failure is
    /// returned together in [`CalcError::Validation`].
    pub fn validate(&self) -> CalcResult<ScreeningInput> {
        let mut errors = Vec::new();

        let age = check_measurement("age_years", "age", self.age_years, &mut errors);
        let weight = check_measurement("weight_kg", "weight", self.weight_kg, &mut errors);
        let height = check_measurement("height_cm", "height", self.height_cm, &mut errors);

        let (Some(age_years), Some(weight_kg), Some(height_cm)) = (age, weight, height) else {
            return Err(CalcError::Validation { errors });
        };

        let track = EnergyTrack::select(self.activity_level, self.inpatient_activity, self.stress_factor)?;

        Ok(ScreeningInput {
            weight: Kilograms(weight_kg),
            height: Centimeters(height_cm),
            age_years,
            gender: self.gender,
            activity_level: self.activity_level,
            inpatient_activity: self.inpatient_activity,
            stress_factor: self.stress_factor,
            enteral_product: self.enteral_product,
            meals_per_day: self.meals_per_day,
            track,
        })
    }
}

fn deserialize_measurement<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Number(v)) => Some(v),
        Some(Raw::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.parse().unwrap_or(f64::NAN))
            }
        }
    })
}

fn check_measurement(field: &str, label: &str, value: Option<f64>, errors: &mut Vec<FieldError>) -> Option<f64> {
    match value {
        None => {
            errors.push(FieldError::new(field, format!("Please enter your {}", label)));
            None
        }
        Some(v) if v.is_nan() => {
            errors.push(FieldError::new(field, format!("Your {} must be a number", label)));
            None
        }
        Some(v) if !v.is_finite() || v <= 0.0 => {
            errors.push(FieldError::new(
                field,
                format!("Your {} must be a positive number (got {})", label, v),
            ));
            None
        }
        Some(v) => Some(v),
    }
}

// ============================================================================
// Track Selection
// ============================================================================

/// Which energy track a form selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyTrack {
    /// No factors set: BMI and ideal weight only
    Basic,
    /// Healthy individual (activity level set)
    Healthy,
    /// Hospitalized patient (inpatient activity and/or stress factor set)
    Inpatient,
}

impl EnergyTrack {
    pub fn select(
        activity_level: ActivityLevel,
        inpatient_activity: InpatientActivity,
        stress_factor: StressFactor,
    ) -> CalcResult<Self> {
        let inpatient = inpatient_activity.is_set() || stress_factor.is_set();
        match (activity_level.is_set(), inpatient) {
            (true, true) => Err(CalcError::ConflictingTracks {
                activity_level: activity_level.code().to_string(),
                inpatient: format!(
                    "activity '{}', stress '{}'",
                    inpatient_activity.code(),
                    stress_factor.code()
                ),
            }),
            (true, false) => Ok(EnergyTrack::Healthy),
            (false, true) => Ok(EnergyTrack::Inpatient),
            (false, false) => Ok(EnergyTrack::Basic),
        }
    }
}

// ============================================================================
// Validated Input
// ============================================================================

/// Validated screening input. Build it with [`ScreeningForm::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningInput {
    pub weight: Kilograms,
    pub height: Centimeters,
    pub age_years: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub inpatient_activity: InpatientActivity,
    pub stress_factor: StressFactor,
    pub enteral_product: EnteralProduct,
    pub meals_per_day: u8,
    track: EnergyTrack,
}

// ============================================================================
// Report
// ============================================================================

/// Healthy-individual energy block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthyTrack {
    pub activity_level: ActivityLevel,
    pub activity_multiplier: f64,
    pub tdee: Kcal,
    pub meal_plan: MealPlan,
}

/// Hospitalized-patient energy block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InpatientTrack {
    pub inpatient_activity: InpatientActivity,
    pub activity_multiplier: f64,
    pub stress_factor: StressFactor,
    pub stress_multiplier: f64,
    pub tee: Kcal,
    pub enteral_product: EnteralProduct,
    pub enteral_kcal: Kcal,
    /// TEE less the supplement; base of the meal plan
    pub adjusted_tee: Kcal,
    pub meal_plan: MealPlan,
}

/// The energy section of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "track", rename_all = "snake_case")]
pub enum ReportView {
    Basic,
    Healthy(HealthyTrack),
    Inpatient(InpatientTrack),
}

impl ReportView {
    pub fn track(&self) -> EnergyTrack {
        match self {
            ReportView::Basic => EnergyTrack::Basic,
            ReportView::Healthy(_) => EnergyTrack::Healthy,
            ReportView::Inpatient(_) => EnergyTrack::Inpatient,
        }
    }

    pub fn meal_plan(&self) -> Option<&MealPlan> {
        match self {
            ReportView::Basic => None,
            ReportView::Healthy(h) => Some(&h.meal_plan),
            ReportView::Inpatient(i) => Some(&i.meal_plan),
        }
    }
}

/// Full result of one screening calculation, at full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningReport {
    pub input: ScreeningInput,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub ideal_weight: Kilograms,
    /// Basal energy expenditure (shown only in the appendix)
    pub bee: Kcal,
    pub view: ReportView,
    pub equations: EquationTracker,
    pub generated_at: DateTime<Utc>,
}

/// Calories for one meal slot, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealCalories {
    pub slot: MealSlot,
    pub kcal: f64,
}

/// Display view of a report: every number rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub bmi: f64,
    pub bmi_category: String,
    pub ideal_weight_kg: f64,
    pub bee: f64,
    pub track: EnergyTrack,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tdee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enteral_kcal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjusted_tee: Option<f64>,
    pub calories_per_meal: Vec<MealCalories>,
}

impl ScreeningReport {
    /// Rounded values for display.
    pub fn summary(&self) -> ReportSummary {
        let (tdee, tee, enteral_kcal, adjusted_tee) = match &self.view {
            ReportView::Basic => (None, None, None, None),
            ReportView::Healthy(h) => (Some(round2(h.tdee.0)), None, None, None),
            ReportView::Inpatient(i) => (
                None,
                Some(round2(i.tee.0)),
                i.enteral_product.is_set().then(|| round2(i.enteral_kcal.0)),
                Some(round2(i.adjusted_tee.0)),
            ),
        };

        ReportSummary {
            bmi: round2(self.bmi),
            bmi_category: self.bmi_category.display_name().to_string(),
            ideal_weight_kg: round2(self.ideal_weight.0),
            bee: round2(self.bee.0),
            track: self.view.track(),
            tdee,
            tee,
            enteral_kcal,
            adjusted_tee,
            calories_per_meal: self.calories_per_meal(),
        }
    }

    /// Rounded per-meal calories, in slot order (empty for the basic view).
    pub fn calories_per_meal(&self) -> Vec<MealCalories> {
        self.view
            .meal_plan()
            .map(|plan| {
                plan.portions()
                    .iter()
                    .map(|p| MealCalories {
                        slot: p.slot,
                        kcal: round2(p.kcal.0),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// Compute every derived metric for a validated input.
pub fn calculate(input: &ScreeningInput) -> ScreeningReport {
    let mut equations = EquationTracker::new();

    let bmi = body_mass_index(input.weight, input.height);
    let bmi_category = BmiCategory::from_bmi(bmi);
    equations.record(Equation::BodyMassIndex, format!("BMI = {:.2} kg/m2", bmi));
    equations.record(Equation::BmiClassification, bmi_category.display_name());

    let ideal_weight = ideal_body_weight(input.height);
    equations.record(
        Equation::IdealBodyWeight,
        format!("Ideal weight = {:.2} kg", ideal_weight.0),
    );

    let bee = basal_energy_expenditure(input.gender, input.weight, input.height, input.age_years);
    let bee_equation = match input.gender {
        Gender::Male => Equation::BasalEnergyMale,
        Gender::Female => Equation::BasalEnergyFemale,
    };
    equations.record(bee_equation, format!("BEE = {:.2} kcal/day", bee.0));

    let view = match input.track {
        EnergyTrack::Basic => ReportView::Basic,
        EnergyTrack::Healthy => {
            let tdee = total_daily_energy_expenditure(bee, input.activity_level);
            equations.record(
                Equation::TotalDailyEnergyExpenditure,
                format!("TDEE = {:.2} kcal/day", tdee.0),
            );
            let meal_plan = split_meals(tdee, input.meals_per_day, &mut equations);
            ReportView::Healthy(HealthyTrack {
                activity_level: input.activity_level,
                activity_multiplier: input.activity_level.multiplier(),
                tdee,
                meal_plan,
            })
        }
        EnergyTrack::Inpatient => {
            let tee = total_energy_expenditure(bee, input.inpatient_activity, input.stress_factor);
            equations.record(
                Equation::TotalEnergyExpenditure,
                format!("TEE = {:.2} kcal/day", tee.0),
            );

            let adjusted_tee = adjusted_energy(tee, input.enteral_product);
            if input.enteral_product.is_set() {
                equations.record(
                    Equation::EnteralAdjustment,
                    format!(
                        "{}: {:.2} - {:.2} = {:.2} kcal/day",
                        input.enteral_product.display_name(),
                        tee.0,
                        input.enteral_product.kcal().0,
                        adjusted_tee.0
                    ),
                );
            }
            if adjusted_tee.0 < 0.0 {
                warn!(
                    tee = tee.0,
                    supplement_kcal = input.enteral_product.kcal().0,
                    "supplement exceeds total energy expenditure"
                );
            }

            let meal_plan = split_meals(adjusted_tee, input.meals_per_day, &mut equations);
            ReportView::Inpatient(InpatientTrack {
                inpatient_activity: input.inpatient_activity,
                activity_multiplier: input.inpatient_activity.multiplier(),
                stress_factor: input.stress_factor,
                stress_multiplier: input.stress_factor.multiplier(),
                tee,
                enteral_product: input.enteral_product,
                enteral_kcal: input.enteral_product.kcal(),
                adjusted_tee,
                meal_plan,
            })
        }
    };

    debug!(
        bmi,
        bee = bee.0,
        track = ?input.track,
        meals_per_day = input.meals_per_day,
        "screening calculated"
    );

    ScreeningReport {
        input: input.clone(),
        bmi,
        bmi_category,
        ideal_weight,
        bee,
        view,
        equations,
        generated_at: Utc::now(),
    }
}

fn split_meals(total: Kcal, meals_per_day: u8, equations: &mut EquationTracker) -> MealPlan {
    let plan = meal_split_for_count(total, meals_per_day);
    if plan.is_empty() {
        warn!(meals_per_day, "unsupported meal count, meal plan left empty");
    } else {
        equations.record(
            Equation::MealDistribution,
            format!("{} meals from {:.2} kcal/day", meals_per_day, total.0),
        );
    }
    plan
}

/// Validate a form and calculate its report in one step.
pub fn screen(form: &ScreeningForm) -> CalcResult<ScreeningReport> {
    let input = form.validate()?;
    Ok(calculate(&input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_form() -> ScreeningForm {
        ScreeningForm {
            weight_kg: Some(70.0),
            height_cm: Some(170.0),
            age_years: Some(30.0),
            ..ScreeningForm::default()
        }
    }

    #[test]
    fn test_reference_example() {
        let report = screen(&reference_form()).unwrap();
        let summary = report.summary();
        assert_eq!(summary.bee, 1671.67);
        assert_eq!(summary.bmi, 24.22);
        assert_eq!(summary.bmi_category, "Overweight");
        assert_eq!(summary.ideal_weight_kg, 65.03);
    }

    #[test]
    fn test_no_factors_gives_basic_view_and_empty_split() {
        let report = screen(&reference_form()).unwrap();
        assert_eq!(report.view, ReportView::Basic);
        assert!(report.calories_per_meal().is_empty());
        let summary = report.summary();
        assert_eq!(summary.tdee, None);
        assert_eq!(summary.tee, None);
    }

    #[test]
    fn test_all_missing_fields_reported() {
        let err = ScreeningForm::default().validate().unwrap_err();
        let fields: Vec<&str> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["age_years", "weight_kg", "height_cm"]);
        assert_eq!(err.field_errors()[0].message, "Please enter your age");
    }

    #[test]
    fn test_missing_and_invalid_reported_together() {
        let form = ScreeningForm {
            weight_kg: Some(-5.0),
            height_cm: Some(f64::NAN),
            age_years: None,
            ..ScreeningForm::default()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert_eq!(err.field_errors().len(), 3);
        assert!(err.field_errors()[1].message.contains("positive"));
    }

    #[test]
    fn test_zero_is_rejected() {
        let form = ScreeningForm {
            age_years: Some(0.0),
            ..reference_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, "age_years");
    }

    #[test]
    fn test_healthy_track() {
        let form = ScreeningForm {
            activity_level: ActivityLevel::ModeratelyActive,
            meals_per_day: 3,
            ..reference_form()
        };
        let report = screen(&form).unwrap();
        let ReportView::Healthy(healthy) = &report.view else {
            panic!("expected healthy track, got {:?}", report.view);
        };
        assert!((healthy.tdee.0 - 1671.672 * 1.55).abs() < 1e-9);
        assert_eq!(healthy.meal_plan.len(), 3);

        let summary = report.summary();
        let total: f64 = summary.calories_per_meal.iter().map(|m| m.kcal).sum();
        assert!((total - summary.tdee.unwrap()).abs() < 0.03);
    }

    #[test]
    fn test_inpatient_track_with_supplement() {
        let form = ScreeningForm {
            inpatient_activity: InpatientActivity::Bedrest,
            stress_factor: StressFactor::Surgical,
            enteral_product: EnteralProduct::Ensure4,
            meals_per_day: 5,
            ..reference_form()
        };
        let report = screen(&form).unwrap();
        let ReportView::Inpatient(inpatient) = &report.view else {
            panic!("expected inpatient track");
        };
        let expected_tee = 1671.672 * 1.2 * 1.4;
        assert!((inpatient.tee.0 - expected_tee).abs() < 1e-9);
        assert!((inpatient.tee.0 - inpatient.adjusted_tee.0 - 174.8).abs() < 1e-9);
        assert!((inpatient.meal_plan.total().0 - inpatient.adjusted_tee.0).abs() < 1e-9);
        assert_eq!(inpatient.meal_plan.len(), 5);
        assert_eq!(report.summary().enteral_kcal, Some(174.8));
    }

    #[test]
    fn test_no_supplement_leaves_tee_unchanged() {
        let form = ScreeningForm {
            stress_factor: StressFactor::Medical,
            ..reference_form()
        };
        let report = screen(&form).unwrap();
        let ReportView::Inpatient(inpatient) = &report.view else {
            panic!("expected inpatient track");
        };
        assert_eq!(inpatient.adjusted_tee, inpatient.tee);
        assert_eq!(inpatient.activity_multiplier, 1.0);
        assert_eq!(report.summary().enteral_kcal, None);
    }

    #[test]
    fn test_conflicting_tracks_rejected() {
        let form = ScreeningForm {
            activity_level: ActivityLevel::Sedentary,
            inpatient_activity: InpatientActivity::Sedated,
            ..reference_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.error_code(), "CONFLICTING_TRACKS");
    }

    #[test]
    fn test_unsupported_meal_count_gives_empty_plan() {
        let form = ScreeningForm {
            activity_level: ActivityLevel::Sedentary,
            meals_per_day: 8,
            ..reference_form()
        };
        let report = screen(&form).unwrap();
        assert!(report.calories_per_meal().is_empty());
        assert!(report.summary().tdee.is_some());
    }

    #[test]
    fn test_equations_recorded_per_track() {
        let female = ScreeningForm {
            gender: Gender::Female,
            stress_factor: StressFactor::Cancer,
            enteral_product: EnteralProduct::Nepro1,
            ..reference_form()
        };
        let report = screen(&female).unwrap();
        let used = report.equations.unique_equations();
        assert!(used.contains(&Equation::BasalEnergyFemale));
        assert!(used.contains(&Equation::TotalEnergyExpenditure));
        assert!(used.contains(&Equation::EnteralAdjustment));
        assert!(!used.contains(&Equation::TotalDailyEnergyExpenditure));
    }

    #[test]
    fn test_form_json_defaults() {
        let form = ScreeningForm::from_json(r#"{"weight_kg": 80, "stress_factor": "sepsis"}"#).unwrap();
        assert_eq!(form.weight_kg, Some(80.0));
        assert_eq!(form.stress_factor, StressFactor::Sepsis);
        assert_eq!(form.meals_per_day, 3);
        assert_eq!(form.gender, Gender::Male);
    }

    #[test]
    fn test_form_json_string_measurements() {
        let form =
            ScreeningForm::from_json(r#"{"weight_kg": "70", "height_cm": "abc", "age_years": ""}"#).unwrap();
        assert_eq!(form.weight_kg, Some(70.0));
        assert_eq!(form.age_years, None);

        let err = form.validate().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        let fields: Vec<&str> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["age_years", "height_cm"]);
        assert_eq!(err.field_errors()[1].message, "Your height must be a number");

        let form = ScreeningForm::from_json(r#"{"weight_kg": " 70.5 ", "height_cm": 170, "age_years": "30"}"#).unwrap();
        let input = form.validate().unwrap();
        assert_eq!(input.weight, Kilograms(70.5));
        assert_eq!(input.age_years, 30.0);
    }

    #[test]
    fn test_form_json_malformed() {
        let err = ScreeningForm::from_json("{\"weight_kg\": ").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_summary_json_omits_unused_track_values() {
        let report = screen(&reference_form()).unwrap();
        let json = serde_json::to_string(&report.summary()).unwrap();
        assert!(json.contains("\"track\":\"basic\""));
        assert!(!json.contains("tdee"));
    }
}
