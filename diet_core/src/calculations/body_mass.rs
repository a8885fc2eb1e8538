//! # Body Mass
//!
//! BMI, its classification, and the ideal body weight at a target BMI of
//! 22.5 kg/m^2.
//!
//! Category bounds are exclusive upper limits, so a BMI sitting exactly on a
//! threshold belongs to the higher category.

use serde::{Deserialize, Serialize};

use crate::units::{Centimeters, Kilograms};

/// Target BMI used for the ideal weight (kg/m^2)
pub const TARGET_BMI: f64 = 22.5;

/// Body mass index in kg/m^2
pub fn body_mass_index(weight: Kilograms, height: Centimeters) -> f64 {
    weight.0 / height.squared_m2()
}

/// Weight at which the given height reaches [`TARGET_BMI`].
///
/// Depends on height only.
pub fn ideal_body_weight(height: Centimeters) -> Kilograms {
    Kilograms(TARGET_BMI * height.squared_m2())
}

/// BMI classification bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    PreObesity,
    ObesityClassI,
    ObesityClassII,
    ObesityClassIII,
}

impl BmiCategory {
    /// Bands in ascending order
    pub const ALL: [BmiCategory; 7] = [
        BmiCategory::Underweight,
        BmiCategory::NormalWeight,
        BmiCategory::Overweight,
        BmiCategory::PreObesity,
        BmiCategory::ObesityClassI,
        BmiCategory::ObesityClassII,
        BmiCategory::ObesityClassIII,
    ];

    /// Classify a BMI value.
    pub fn from_bmi(bmi: f64) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.upper_bound().map_or(true, |upper| bmi < upper))
            .unwrap_or(BmiCategory::ObesityClassIII)
    }

    /// Exclusive upper bound of the band (`None` for the open-ended top band)
    pub fn upper_bound(&self) -> Option<f64> {
        match self {
            BmiCategory::Underweight => Some(18.5),
            BmiCategory::NormalWeight => Some(22.9),
            BmiCategory::Overweight => Some(27.5),
            BmiCategory::PreObesity => Some(32.5),
            BmiCategory::ObesityClassI => Some(37.5),
            BmiCategory::ObesityClassII => Some(40.0),
            BmiCategory::ObesityClassIII => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::PreObesity => "Pre-obesity",
            BmiCategory::ObesityClassI => "Obesity Class I",
            BmiCategory::ObesityClassII => "Obesity Class II",
            BmiCategory::ObesityClassIII => "Obesity Class III",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
