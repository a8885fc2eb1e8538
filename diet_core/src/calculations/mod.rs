//! # Screening Calculations
//!
//! Every calculation follows the same shape:
//!
//! - `ScreeningForm` - raw form state, numeric fields may be empty
//! - `ScreeningInput` - validated input, only built by `ScreeningForm::validate`
//! - `calculate(input) -> ScreeningReport` - pure calculation function
//!
//! The submodules hold the formulas and lookup tables:
//!
//! - [`energy`] - Harris-Benedict BEE, TDEE and TEE multipliers
//! - [`body_mass`] - BMI, BMI category, ideal weight
//! - [`meals`] - Per-meal calorie split and guideline ranges
//! - [`enteral`] - Supplement calorie offsets
//! - [`screening`] - Form validation, track selection and the report

pub mod body_mass;
pub mod energy;
pub mod enteral;
pub mod meals;
pub mod screening;

// Re-export commonly used types
pub use body_mass::BmiCategory;
pub use energy::{ActivityLevel, Gender, InpatientActivity, StressFactor};
pub use enteral::EnteralProduct;
pub use meals::{MealPlan, MealSlot, MealsPerDay};
pub use screening::{calculate, screen, ReportView, ScreeningForm, ScreeningInput, ScreeningReport};

/// Serialize form enums as their form codes and parse them leniently, so
/// unknown codes fall back to the neutral variant instead of failing.
macro_rules! impl_form_code_serde {
    ($type:ty) => {
        impl serde::Serialize for $type {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.code())
            }
        }

        impl<'de> serde::Deserialize<'de> for $type {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = String::deserialize(deserializer)?;
                Ok(<$type>::from_code(&code))
            }
        }
    };
}

impl_form_code_serde!(Gender);
impl_form_code_serde!(ActivityLevel);
impl_form_code_serde!(InpatientActivity);
impl_form_code_serde!(StressFactor);
impl_form_code_serde!(EnteralProduct);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_codes_serialize() {
        let json = serde_json::to_string(&ActivityLevel::LightlyActive).unwrap();
        assert_eq!(json, "\"lightlyActive\"");
        let json = serde_json::to_string(&EnteralProduct::Glucerna4).unwrap();
        assert_eq!(json, "\"glucerna_4\"");
    }

    #[test]
    fn test_unknown_codes_deserialize_to_neutral() {
        let level: ActivityLevel = serde_json::from_str("\"couchPotato\"").unwrap();
        assert_eq!(level, ActivityLevel::None);
        let stress: StressFactor = serde_json::from_str("\"majorBurns\"").unwrap();
        assert_eq!(stress, StressFactor::MajorBurns);
        let product: EnteralProduct = serde_json::from_str("\"ensure_10\"").unwrap();
        assert_eq!(product, EnteralProduct::None);
        let activity: InpatientActivity = serde_json::from_str("\"conmove\"").unwrap();
        assert_eq!(activity, InpatientActivity::Conmov);
    }
}
