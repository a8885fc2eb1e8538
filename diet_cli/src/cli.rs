use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use diet_core::calculations::energy::{ActivityLevel, Gender, InpatientActivity, StressFactor};
use diet_core::calculations::enteral::EnteralProduct;
use diet_core::calculations::meals::DEFAULT_MEALS_PER_DAY;
use diet_core::{CalcResult, ExportSettings, ScreeningForm};

/// diet-screen: nutrition screening for healthy individuals and inpatients.
///
/// Computes BMI, ideal body weight and energy requirements, splits the daily
/// energy across meals and optionally exports the report as a PDF.
#[derive(Parser, Debug)]
#[command(name = "diet-screen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Body weight in kilograms.
    #[arg(short, long)]
    pub weight: Option<f64>,

    /// Height in centimeters.
    #[arg(short = 'H', long)]
    pub height: Option<f64>,

    /// Age in years.
    #[arg(short, long)]
    pub age: Option<f64>,

    /// Gender: male or female.
    #[arg(short, long, default_value = "male")]
    pub gender: String,

    /// Activity level of a healthy individual (e.g. sedentary, moderatelyActive).
    #[arg(long, default_value = "none")]
    pub activity: String,

    /// Inpatient activity (e.g. bedrest, mobilising).
    #[arg(long, default_value = "none")]
    pub inpatient: String,

    /// Stress factor (e.g. surgical, sepsis).
    #[arg(long, default_value = "none")]
    pub stress: String,

    /// Enteral supplement (e.g. ensure_4, nepro_1).
    #[arg(long, default_value = "none")]
    pub enteral: String,

    /// Meals per day (3 to 6).
    #[arg(short, long, default_value_t = DEFAULT_MEALS_PER_DAY)]
    pub meals: u8,

    /// Read the form from a JSON file; other input flags are ignored.
    #[arg(long, conflicts_with_all = ["weight", "height", "age"])]
    pub form: Option<PathBuf>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Export the report as a PDF.
    #[arg(long)]
    pub pdf: bool,

    /// Directory for the PDF (overrides config).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// PDF file name (overrides config).
    #[arg(long)]
    pub file_name: Option<String>,

    /// Clinic name printed on the PDF (overrides config).
    #[arg(long)]
    pub clinic: Option<String>,

    /// Settings file (defaults to ./diet_screen.toml if present).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// List every accepted option code and exit.
    #[arg(long)]
    pub list_options: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Build the form from the input flags. Unrecognized codes fall back to
    /// the neutral option with a warning.
    pub fn to_form(&self) -> ScreeningForm {
        ScreeningForm {
            weight_kg: self.weight,
            height_cm: self.height,
            age_years: self.age,
            gender: lenient("gender", &self.gender, Gender::try_from_code),
            activity_level: lenient("activity", &self.activity, ActivityLevel::try_from_code),
            inpatient_activity: lenient("inpatient", &self.inpatient, InpatientActivity::try_from_code),
            stress_factor: lenient("stress", &self.stress, StressFactor::try_from_code),
            enteral_product: lenient("enteral", &self.enteral, EnteralProduct::try_from_code),
            meals_per_day: self.meals,
        }
    }

    /// Load export settings and apply the command-line overrides.
    pub fn export_settings(&self) -> CalcResult<ExportSettings> {
        let mut settings = ExportSettings::load(self.config.as_deref())?;
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(name) = &self.file_name {
            settings.file_name = name.clone();
        }
        if let Some(clinic) = &self.clinic {
            settings.clinic = clinic.clone();
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn lenient<T: Default>(flag: &str, code: &str, parse: fn(&str) -> Option<T>) -> T {
    parse(code).unwrap_or_else(|| {
        warn!(flag, code, "unrecognized option code, using default");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_onto_form() {
        let cli = Cli::parse_from([
            "diet-screen", "-w", "70", "-H", "170", "-a", "30", "--gender", "female", "--stress", "sepsis",
            "--enteral", "glucerna_2", "--meals", "5",
        ]);
        let form = cli.to_form();
        assert_eq!(form.weight_kg, Some(70.0));
        assert_eq!(form.gender, Gender::Female);
        assert_eq!(form.stress_factor, StressFactor::Sepsis);
        assert_eq!(form.enteral_product, EnteralProduct::Glucerna2);
        assert_eq!(form.meals_per_day, 5);
        assert_eq!(form.activity_level, ActivityLevel::None);
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        let cli = Cli::parse_from(["diet-screen", "--activity", "couchPotato", "--inpatient", "conmove"]);
        let form = cli.to_form();
        assert_eq!(form.activity_level, ActivityLevel::None);
        assert_eq!(form.inpatient_activity, InpatientActivity::Conmov);
    }

    #[test]
    fn test_defaults_are_reset_form() {
        let cli = Cli::parse_from(["diet-screen"]);
        assert_eq!(cli.to_form(), ScreeningForm::default());
    }

    #[test]
    fn test_form_conflicts_with_measurements() {
        assert!(Cli::try_parse_from(["diet-screen", "--form", "f.json", "-w", "70"]).is_err());
    }
}
