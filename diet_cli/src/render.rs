//! Plain-text rendering of a screening report for the terminal.

use std::fmt;

use diet_core::calculations::energy::{ActivityLevel, InpatientActivity, StressFactor};
use diet_core::calculations::enteral::EnteralProduct;
use diet_core::calculations::meals::{MealsPerDay, MealSlot};
use diet_core::calculations::screening::{ReportView, ScreeningReport};

const RULE: &str = "═══════════════════════════════════════";

/// Terminal layout of a screening report.
pub struct ReportText<'a>(pub &'a ScreeningReport);

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let summary = report.summary();
        let input = &report.input;

        writeln!(out, "{}", RULE)?;
        writeln!(out, "  DIET SCREENING RESULTS")?;
        writeln!(out, "{}", RULE)?;
        writeln!(out)?;
        writeln!(out, "Personal details:")?;
        writeln!(out, "  Age:      {} years", input.age_years)?;
        writeln!(out, "  Gender:   {}", input.gender.display_name())?;
        writeln!(out, "  Weight:   {} kg", input.weight.0)?;
        writeln!(out, "  Height:   {} cm", input.height.0)?;
        writeln!(out)?;
        writeln!(out, "Body composition:")?;
        writeln!(out, "  BMI:           {:.2} kg/m2 ({})", summary.bmi, summary.bmi_category)?;
        writeln!(out, "  Ideal weight:  {:.2} kg", summary.ideal_weight_kg)?;
        writeln!(out)?;

        match &report.view {
            ReportView::Basic => {
                writeln!(out, "No activity or stress factors selected; energy needs not calculated.")?;
            }
            ReportView::Healthy(track) => {
                writeln!(out, "Energy (healthy individual):")?;
                writeln!(out, "  Activity:  {}", track.activity_level.description())?;
                writeln!(out, "  TDEE:      {:.2} kcal/day", summary.tdee.unwrap_or_default())?;
            }
            ReportView::Inpatient(track) => {
                writeln!(out, "Energy (hospitalized patient):")?;
                writeln!(out, "  Activity:  {}", track.inpatient_activity.description())?;
                writeln!(out, "  Stress:    {}", track.stress_factor.description())?;
                writeln!(out, "  TEE:       {:.2} kcal/day", track.tee.0)?;
                if let Some(kcal) = summary.enteral_kcal {
                    writeln!(out, "  Enteral:   {} (-{:.2} kcal/day)", track.enteral_product.display_name(), kcal)?;
                    writeln!(out, "  For meals: {:.2} kcal/day", summary.adjusted_tee.unwrap_or_default())?;
                }
            }
        }

        if !summary.calories_per_meal.is_empty() {
            let guidelines = MealsPerDay::from_count(input.meals_per_day)
                .map(|m| m.guidelines())
                .unwrap_or_default();
            writeln!(out)?;
            writeln!(out, "Calories per meal ({} meals):", input.meals_per_day)?;
            for meal in &summary.calories_per_meal {
                let range = guidelines
                    .iter()
                    .find(|g| g.slot == meal.slot)
                    .map(|g| format!("  (guideline {})", g.label()))
                    .unwrap_or_default();
                writeln!(out, "  {:<16} {:>9.2} kcal{}", meal.slot.display_name(), meal.kcal, range)?;
            }
        } else if report.view.meal_plan().is_some() {
            writeln!(out)?;
            writeln!(out, "No meal split defined for {} meals per day (use 3 to 6).", input.meals_per_day)?;
        }

        writeln!(out)?;
        writeln!(out, "Formulas used:")?;
        for equation in report.equations.unique_equations() {
            let meta = equation.metadata();
            writeln!(out, "  {:<34} {}", meta.name, meta.formula_plain)?;
        }

        Ok(())
    }
}

/// Every accepted option code with its description.
pub struct OptionsText;

impl fmt::Display for OptionsText {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "Activity levels (--activity):")?;
        for level in ActivityLevel::ALL {
            writeln!(out, "  {:<18} x{:<6} {}", level.code(), level.multiplier(), level.description())?;
        }
        writeln!(out)?;
        writeln!(out, "Inpatient activity (--inpatient):")?;
        for activity in InpatientActivity::ALL {
            writeln!(out, "  {:<18} x{:<6} {}", activity.code(), activity.multiplier(), activity.description())?;
        }
        writeln!(out)?;
        writeln!(out, "Stress factors (--stress):")?;
        for stress in StressFactor::ALL {
            writeln!(out, "  {:<18} x{:<6} {}", stress.code(), stress.multiplier(), stress.description())?;
        }
        writeln!(out)?;
        writeln!(out, "Enteral supplements (--enteral):")?;
        for product in EnteralProduct::ALL {
            writeln!(out, "  {:<18} {:>7.1} kcal  {}", product.code(), product.kcal().0, product.display_name())?;
        }
        writeln!(out)?;
        writeln!(out, "Meals per day (--meals):")?;
        for meals in MealsPerDay::ALL {
            let slots: Vec<&str> = meals.percentages().iter().map(|(slot, _)| MealSlot::display_name(slot)).collect();
            writeln!(out, "  {}  {}", meals.count(), slots.join(", "))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diet_core::calculations::screening::{screen, ScreeningForm};

    fn form() -> ScreeningForm {
        ScreeningForm {
            weight_kg: Some(70.0),
            height_cm: Some(170.0),
            age_years: Some(30.0),
            ..ScreeningForm::default()
        }
    }

    #[test]
    fn test_basic_report_text() {
        let text = ReportText(&screen(&form()).unwrap()).to_string();
        assert!(text.contains("BMI:           24.22 kg/m2 (Overweight)"));
        assert!(text.contains("Ideal weight:  65.03 kg"));
        assert!(text.contains("energy needs not calculated"));
        assert!(!text.contains("Calories per meal"));
        assert!(text.contains("BEE = 88.362 + 13.397 W"));
    }

    #[test]
    fn test_inpatient_report_text() {
        let form = ScreeningForm {
            stress_factor: StressFactor::Surgical,
            enteral_product: EnteralProduct::Ensure2,
            meals_per_day: 4,
            ..form()
        };
        let text = ReportText(&screen(&form).unwrap()).to_string();
        assert!(text.contains("Ensure 2 scoops (-87.40 kcal/day)"));
        assert!(text.contains("Morning Snack"));
        assert!(text.contains("(guideline 5 - 10%)"));
    }

    #[test]
    fn test_unsupported_meal_count_text() {
        let form = ScreeningForm {
            activity_level: ActivityLevel::Sedentary,
            meals_per_day: 9,
            ..form()
        };
        let text = ReportText(&screen(&form).unwrap()).to_string();
        assert!(text.contains("No meal split defined for 9 meals"));
    }

    #[test]
    fn test_options_text_lists_codes() {
        let text = OptionsText.to_string();
        assert!(text.contains("moderatelyActive"));
        assert!(text.contains("afterVentilation"));
        assert!(text.contains("nepro_3"));
    }
}
