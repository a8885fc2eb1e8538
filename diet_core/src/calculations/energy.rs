//! # Energy Expenditure
//!
//! Harris-Benedict basal energy expenditure (BEE) and the two multiplier
//! tracks built on top of it:
//!
//! - **Healthy individual**: `TDEE = BEE x activity level`
//! - **Hospitalized patient**: `TEE = BEE x inpatient activity x stress factor`
//!
//! Every factor enum has a `None` variant with a neutral 1.0 multiplier, and
//! unrecognized form codes map to it.
//!
//! ## Example
//!
//! ```rust
//! use diet_core::calculations::energy::{basal_energy_expenditure, ActivityLevel, Gender};
//! use diet_core::units::{Centimeters, Kilograms};
//!
//! let bee = basal_energy_expenditure(Gender::Male, Kilograms(70.0), Centimeters(170.0), 30.0);
//! let tdee = bee * ActivityLevel::Sedentary.multiplier();
//! assert!((tdee.0 - 2006.0064).abs() < 1e-6);
//! ```

use crate::units::{Centimeters, Kcal, Kilograms};

// ============================================================================
// Gender
// ============================================================================

/// Gender selector for the Harris-Benedict equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn try_from_code(code: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Parse a form code, falling back to the form default (male).
    pub fn from_code(code: &str) -> Self {
        Self::try_from_code(code).unwrap_or_default()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

// ============================================================================
// Harris-Benedict BEE
// ============================================================================

/// Basal energy expenditure (kcal/day), revised Harris-Benedict equations.
///
/// - male: `88.362 + 13.397 W + 4.799 H - 5.677 A`
/// - female: `447.593 + 9.247 W + 3.098 H - 4.33 A`
///
/// with W in kg, H in cm and A in years.
pub fn basal_energy_expenditure(gender: Gender, weight: Kilograms, height: Centimeters, age_years: f64) -> Kcal {
    let (w, h, a) = (weight.0, height.0, age_years);
    let bee = match gender {
        Gender::Male => 88.362 + 13.397 * w + 4.799 * h - 5.677 * a,
        Gender::Female => 447.593 + 9.247 * w + 3.098 * h - 4.33 * a,
    };
    Kcal(bee)
}

// ============================================================================
// Healthy-Individual Activity Level
// ============================================================================

/// Activity level of an ambulatory (healthy) individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivityLevel {
    #[default]
    None,
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 6] = [
        ActivityLevel::None,
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// TDEE multiplier applied to BEE
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::None => 1.0,
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ActivityLevel::None => "none",
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightlyActive",
            ActivityLevel::ModeratelyActive => "moderatelyActive",
            ActivityLevel::VeryActive => "veryActive",
            ActivityLevel::ExtraActive => "extraActive",
        }
    }

    pub fn try_from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.code() == code.trim())
    }

    /// Parse a form code; unknown codes are treated as `None`.
    pub fn from_code(code: &str) -> Self {
        Self::try_from_code(code).unwrap_or_default()
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::None => "None",
            ActivityLevel::Sedentary => "Sedentary (little or no exercise)",
            ActivityLevel::LightlyActive => "Lightly Active (exercise/sports 1-3 days/week)",
            ActivityLevel::ModeratelyActive => "Moderately Active (exercise/sports 3-5 days/week)",
            ActivityLevel::VeryActive => "Very Active (exercise/sports 6-7 days a week)",
            ActivityLevel::ExtraActive => "Extra Active (sports & physical job)",
        }
    }

    pub fn is_set(&self) -> bool {
        *self != ActivityLevel::None
    }
}

// ============================================================================
// Hospitalized-Patient Activity Factor
// ============================================================================

/// Activity factor for a hospitalized adult patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InpatientActivity {
    #[default]
    None,
    Sedated,
    Conscious,
    Bedrest,
    BedrestLong,
    Mobilising,
    MobFreq,
    Physio,
    Conmov,
}

impl InpatientActivity {
    pub const ALL: [InpatientActivity; 9] = [
        InpatientActivity::None,
        InpatientActivity::Sedated,
        InpatientActivity::Conscious,
        InpatientActivity::Bedrest,
        InpatientActivity::BedrestLong,
        InpatientActivity::Mobilising,
        InpatientActivity::MobFreq,
        InpatientActivity::Physio,
        InpatientActivity::Conmov,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            InpatientActivity::None => 1.0,
            InpatientActivity::Sedated => 0.9,
            InpatientActivity::Conscious => 1.0,
            InpatientActivity::Bedrest => 1.2,
            InpatientActivity::BedrestLong => 1.3,
            InpatientActivity::Mobilising => 1.4,
            InpatientActivity::MobFreq => 1.4,
            InpatientActivity::Physio => 1.5,
            InpatientActivity::Conmov => 1.6,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            InpatientActivity::None => "none",
            InpatientActivity::Sedated => "sedated",
            InpatientActivity::Conscious => "conscious",
            InpatientActivity::Bedrest => "bedrest",
            InpatientActivity::BedrestLong => "bedrestLong",
            InpatientActivity::Mobilising => "mobilising",
            InpatientActivity::MobFreq => "mobFreq",
            InpatientActivity::Physio => "physio",
            InpatientActivity::Conmov => "conmov",
        }
    }

    pub fn try_from_code(code: &str) -> Option<Self> {
        match code.trim() {
            // Older forms submit the continuous-movement option as "conmove"
            "conmove" => Some(InpatientActivity::Conmov),
            code => Self::ALL.iter().copied().find(|f| f.code() == code),
        }
    }

    /// Parse a form code; unknown codes are treated as `None`.
    pub fn from_code(code: &str) -> Self {
        Self::try_from_code(code).unwrap_or_default()
    }

    pub fn description(&self) -> &'static str {
        match self {
            InpatientActivity::None => "None",
            InpatientActivity::Sedated => "Lying still, sedated or asleep",
            InpatientActivity::Conscious => "Lying still, conscious",
            InpatientActivity::Bedrest => "Bedrest (moving self around bed)",
            InpatientActivity::BedrestLong => "Sitting out of bed long periods",
            InpatientActivity::Mobilising => "Mobilising occasionally on ward",
            InpatientActivity::MobFreq => "Mobilising frequently on ward",
            InpatientActivity::Physio => "Regular, intensive physiotherapy",
            InpatientActivity::Conmov => "Continuous movement/slow walking",
        }
    }

    pub fn is_set(&self) -> bool {
        *self != InpatientActivity::None
    }
}

// ============================================================================
// Stress / Injury Factor
// ============================================================================

/// Stress or injury factor for a hospitalized adult patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StressFactor {
    #[default]
    None,
    Medical,
    Surgical,
    Cancer,
    Trauma,
    Sepsis,
    MajorBurns,
    Ventilation,
    AfterVentilation,
}

impl StressFactor {
    pub const ALL: [StressFactor; 9] = [
        StressFactor::None,
        StressFactor::Medical,
        StressFactor::Surgical,
        StressFactor::Cancer,
        StressFactor::Trauma,
        StressFactor::Sepsis,
        StressFactor::MajorBurns,
        StressFactor::Ventilation,
        StressFactor::AfterVentilation,
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            StressFactor::None => 1.0,
            StressFactor::Medical => 1.1,
            StressFactor::Surgical => 1.4,
            StressFactor::Cancer => 1.3,
            StressFactor::Trauma => 1.2,
            StressFactor::Sepsis => 1.3,
            StressFactor::MajorBurns => 1.4,
            StressFactor::Ventilation => 1.3,
            StressFactor::AfterVentilation => 1.6,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StressFactor::None => "none",
            StressFactor::Medical => "medical",
            StressFactor::Surgical => "surgical",
            StressFactor::Cancer => "cancer",
            StressFactor::Trauma => "trauma",
            StressFactor::Sepsis => "sepsis",
            StressFactor::MajorBurns => "majorBurns",
            StressFactor::Ventilation => "ventilation",
            StressFactor::AfterVentilation => "afterVentilation",
        }
    }

    pub fn try_from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.code() == code.trim())
    }

    /// Parse a form code; unknown codes are treated as `None`.
    pub fn from_code(code: &str) -> Self {
        Self::try_from_code(code).unwrap_or_default()
    }

    pub fn description(&self) -> &'static str {
        match self {
            StressFactor::None => "None",
            StressFactor::Medical => "Medical: inflammatory bowel disease / liver / pancreatic disease",
            StressFactor::Surgical => "Surgical: transplant / fistula",
            StressFactor::Cancer => "Cancer: tumour / leukaemia",
            StressFactor::Trauma => "Trauma: skeletal injury / head injury / minor burns",
            StressFactor::Sepsis => "Sepsis & other major infection",
            StressFactor::MajorBurns => "Major burns",
            StressFactor::Ventilation => "Critical illness with mechanical ventilation",
            StressFactor::AfterVentilation => "Critical illness after mechanical ventilation",
        }
    }

    pub fn is_set(&self) -> bool {
        *self != StressFactor::None
    }
}

// ============================================================================
// Track Formulas
// ============================================================================

/// Total daily energy expenditure for a healthy individual.
pub fn total_daily_energy_expenditure(bee: Kcal, activity: ActivityLevel) -> Kcal {
    bee * activity.multiplier()
}

/// Total energy expenditure for a hospitalized patient.
pub fn total_energy_expenditure(bee: Kcal, activity: InpatientActivity, stress: StressFactor) -> Kcal {
    bee * activity.multiplier() * stress.multiplier()
}
