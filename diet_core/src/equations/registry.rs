//! # Equation Registry
//!
//! Central registry of the screening formulas. Each equation carries the
//! metadata needed to print it in the report appendix: formula, variables,
//! assumptions and the literature it comes from.
//!
//! ## Usage
//!
//! ```rust
//! use diet_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record(Equation::BodyMassIndex, "BMI");
//!
//! let meta = Equation::BodyMassIndex.metadata();
//! assert_eq!(meta.name, "Body Mass Index");
//! assert!(tracker.generate_appendix_typst().contains("Body Mass Index"));
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// Literature References
// ============================================================================

/// Published source for a formula or table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Citation {
    Nuttall2015,
    PaiPaloucek2000,
    SpodarykKobylarz2005,
    RozaShizgal1984,
    HarrisBenedict1918,
    IomDri2005,
    IomCacfp2011,
    James1992,
    UkDoh1991,
    Who1998,
}

impl Citation {
    /// Every reference, in the order printed under "References"
    pub const ALL: [Citation; 10] = [
        Citation::Nuttall2015,
        Citation::PaiPaloucek2000,
        Citation::SpodarykKobylarz2005,
        Citation::RozaShizgal1984,
        Citation::HarrisBenedict1918,
        Citation::IomDri2005,
        Citation::IomCacfp2011,
        Citation::James1992,
        Citation::UkDoh1991,
        Citation::Who1998,
    ];

    /// Full bibliographic entry
    pub fn citation(&self) -> &'static str {
        match self {
            Citation::Nuttall2015 => {
                "Nuttall FQ. Body Mass Index: Obesity, BMI, and Health: A Critical Review. Nutrition Today; May 2015"
            }
            Citation::PaiPaloucek2000 => {
                "Pai MP, Paloucek FP. The origin of the \"ideal\" body weight equations. Annals of Pharmacotherapy; September 2000"
            }
            Citation::SpodarykKobylarz2005 => {
                "Spodaryk M, Kobylarz K. The Usability of Harris-Benedict and Curreri Equations in Nutritional Management of Thermal Injuries. Ann Burns Fire Disasters; September 2005"
            }
            Citation::RozaShizgal1984 => {
                "Roza AM, Shizgal HM. The Harris Benedict equation reevaluated: resting energy requirements and the body cell mass. The American Journal of Clinical Nutrition; July 1984"
            }
            Citation::HarrisBenedict1918 => {
                "Harris JA, Benedict FG. A Biometric Study of Human Basal Metabolism. Proceedings of the National Academy of Sciences; 1918"
            }
            Citation::IomDri2005 => {
                "Institute of Medicine. Dietary Reference Intakes for Energy, Carbohydrate, Fiber, Fat, Fatty Acids, Cholesterol, Protein, and Amino Acids. The National Academies Press; 2005"
            }
            Citation::IomCacfp2011 => {
                "Institute of Medicine (US) Committee to Review Child and Adult Care Food Program Meal Requirements; Murphy SP, Yaktine AL, West Suitor C, et al. Child and Adult Care Food Program: Aligning Dietary Guidance for All. National Academies Press (US); 2011"
            }
            Citation::James1992 => {
                "James WPT. From SDA to DIT to TEF. In: Kinney JM, Tucker HN, eds. Energy Metabolism: Tissue Determinants and Cellular Corollaries. New York: Raven Press; 1992: 163-86"
            }
            Citation::UkDoh1991 => {
                "UK Department of Health. Report on health and social subjects 41: dietary reference values for food energy and nutrients for the United Kingdom. London: HMSO; 1991"
            }
            Citation::Who1998 => {
                "WHO. Obesity: Preventing and Managing the Global Epidemic. Report of a WHO Consultation on Obesity. World Health Organization, Geneva; 1998"
            }
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            Citation::Nuttall2015 => "Nuttall 2015",
            Citation::PaiPaloucek2000 => "Pai & Paloucek 2000",
            Citation::SpodarykKobylarz2005 => "Spodaryk & Kobylarz 2005",
            Citation::RozaShizgal1984 => "Roza & Shizgal 1984",
            Citation::HarrisBenedict1918 => "Harris & Benedict 1918",
            Citation::IomDri2005 => "IOM 2005",
            Citation::IomCacfp2011 => "IOM 2011",
            Citation::James1992 => "James 1992",
            Citation::UkDoh1991 => "UK DoH 1991",
            Citation::Who1998 => "WHO 1998",
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for organizing equations in the appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// BMI, classification, ideal weight
    BodyComposition,
    /// BEE, TDEE, TEE
    EnergyExpenditure,
    /// Supplement offset and meal split
    MealPlanning,
}

impl EquationCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::BodyComposition => "Body Composition",
            EquationCategory::EnergyExpenditure => "Energy Expenditure",
            EquationCategory::MealPlanning => "Meal Planning",
        }
    }

    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::BodyComposition => 0,
            EquationCategory::EnergyExpenditure => 1,
            EquationCategory::MealPlanning => 2,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    pub symbol: &'static str,
    pub description: &'static str,
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Everything needed to print an equation in the report appendix.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    pub name: &'static str,
    pub description: &'static str,
    /// The formula in Typst math notation
    pub formula_typst: &'static str,
    /// The formula in plain text (terminal output)
    pub formula_plain: &'static str,
    pub references: Vec<Citation>,
    pub variables: Vec<Variable>,
    pub assumptions: Vec<&'static str>,
    pub category: EquationCategory,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All formulas used by the screening calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equation {
    BodyMassIndex,
    BmiClassification,
    IdealBodyWeight,
    BasalEnergyMale,
    BasalEnergyFemale,
    TotalDailyEnergyExpenditure,
    TotalEnergyExpenditure,
    EnteralAdjustment,
    MealDistribution,
}

impl Equation {
    pub const ALL: [Equation; 9] = [
        Equation::BodyMassIndex,
        Equation::BmiClassification,
        Equation::IdealBodyWeight,
        Equation::BasalEnergyMale,
        Equation::BasalEnergyFemale,
        Equation::TotalDailyEnergyExpenditure,
        Equation::TotalEnergyExpenditure,
        Equation::EnteralAdjustment,
        Equation::MealDistribution,
    ];

    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::BodyMassIndex => EquationMetadata {
                name: "Body Mass Index",
                description: "Weight relative to the square of height",
                formula_typst: r#"$"BMI" = W / H_m^2$"#,
                formula_plain: "BMI = W / H_m^2",
                references: vec![Citation::Nuttall2015],
                variables: vec![
                    Variable::new("W", "Body weight", "kg"),
                    Variable::new("H_m", "Height", "m"),
                ],
                assumptions: vec!["Adult, non-pregnant"],
                category: EquationCategory::BodyComposition,
            },
            Equation::BmiClassification => EquationMetadata {
                name: "BMI Classification",
                description: "Band boundaries are exclusive upper limits",
                formula_typst: r#"$18.5 | 22.9 | 27.5 | 32.5 | 37.5 | 40.0$"#,
                formula_plain: "<18.5 Underweight, <22.9 Normal, <27.5 Overweight, <32.5 Pre-obesity, <37.5 Obesity I, <40 Obesity II, else Obesity III",
                references: vec![Citation::Who1998],
                variables: vec![],
                assumptions: vec!["A value on a boundary belongs to the higher band"],
                category: EquationCategory::BodyComposition,
            },
            Equation::IdealBodyWeight => EquationMetadata {
                name: "Ideal Body Weight",
                description: "Weight at a target BMI of 22.5 kg/m2",
                formula_typst: r#"$W_"ideal" = 22.5 dot H_m^2$"#,
                formula_plain: "W_ideal = 22.5 * H_m^2",
                references: vec![Citation::PaiPaloucek2000],
                variables: vec![Variable::new("H_m", "Height", "m")],
                assumptions: vec!["Depends on height only"],
                category: EquationCategory::BodyComposition,
            },
            Equation::BasalEnergyMale => EquationMetadata {
                name: "Basal Energy Expenditure (Male)",
                description: "Revised Harris-Benedict equation for men",
                formula_typst: r#"$"BEE" = 88.362 + 13.397 W + 4.799 H - 5.677 A$"#,
                formula_plain: "BEE = 88.362 + 13.397 W + 4.799 H - 5.677 A",
                references: vec![Citation::HarrisBenedict1918, Citation::RozaShizgal1984],
                variables: vec![
                    Variable::new("W", "Body weight", "kg"),
                    Variable::new("H", "Height", "cm"),
                    Variable::new("A", "Age", "years"),
                ],
                assumptions: vec!["Resting, post-absorptive state"],
                category: EquationCategory::EnergyExpenditure,
            },
            Equation::BasalEnergyFemale => EquationMetadata {
                name: "Basal Energy Expenditure (Female)",
                description: "Revised Harris-Benedict equation for women",
                formula_typst: r#"$"BEE" = 447.593 + 9.247 W + 3.098 H - 4.33 A$"#,
                formula_plain: "BEE = 447.593 + 9.247 W + 3.098 H - 4.33 A",
                references: vec![Citation::HarrisBenedict1918, Citation::RozaShizgal1984],
                variables: vec![
                    Variable::new("W", "Body weight", "kg"),
                    Variable::new("H", "Height", "cm"),
                    Variable::new("A", "Age", "years"),
                ],
                assumptions: vec!["Resting, post-absorptive state"],
                category: EquationCategory::EnergyExpenditure,
            },
            Equation::TotalDailyEnergyExpenditure => EquationMetadata {
                name: "Total Daily Energy Expenditure",
                description: "BEE scaled by the activity level of a healthy individual",
                formula_typst: r#"$"TDEE" = "BEE" dot f_"activity"$"#,
                formula_plain: "TDEE = BEE * f_activity",
                references: vec![Citation::IomDri2005, Citation::James1992],
                variables: vec![Variable::new("f_activity", "Activity multiplier (1.2 - 1.9)", "-")],
                assumptions: vec!["Ambulatory, healthy adult"],
                category: EquationCategory::EnergyExpenditure,
            },
            Equation::TotalEnergyExpenditure => EquationMetadata {
                name: "Total Energy Expenditure",
                description: "BEE scaled by inpatient activity and stress/injury factors",
                formula_typst: r#"$"TEE" = "BEE" dot f_"activity" dot f_"stress"$"#,
                formula_plain: "TEE = BEE * f_activity * f_stress",
                references: vec![Citation::SpodarykKobylarz2005, Citation::UkDoh1991],
                variables: vec![
                    Variable::new("f_activity", "Inpatient activity factor (0.9 - 1.6)", "-"),
                    Variable::new("f_stress", "Stress/injury factor (1.1 - 1.6)", "-"),
                ],
                assumptions: vec!["Hospitalized adult patient"],
                category: EquationCategory::EnergyExpenditure,
            },
            Equation::EnteralAdjustment => EquationMetadata {
                name: "Enteral Supplement Adjustment",
                description: "Energy left for meals after the supplement's fixed contribution",
                formula_typst: r#"$"TEE"_"adj" = "TEE" - E_"supp"$"#,
                formula_plain: "TEE_adj = TEE - E_supp",
                references: vec![],
                variables: vec![Variable::new("E_supp", "Supplement energy per day", "kcal")],
                assumptions: vec!["Supplement taken in full every day"],
                category: EquationCategory::MealPlanning,
            },
            Equation::MealDistribution => EquationMetadata {
                name: "Meal Distribution",
                description: "Daily energy split across meal slots by fixed percentages",
                formula_typst: r#"$E_i = E_"day" dot p_i, quad sum_i p_i = 1$"#,
                formula_plain: "E_i = E_day * p_i, sum(p_i) = 1",
                references: vec![Citation::IomCacfp2011],
                variables: vec![
                    Variable::new("E_day", "Daily energy base (TDEE or adjusted TEE)", "kcal"),
                    Variable::new("p_i", "Share of meal slot i", "-"),
                ],
                assumptions: vec!["3 to 6 meals per day"],
                category: EquationCategory::MealPlanning,
            },
        }
    }
}

// ============================================================================
// Equation Tracking
// ============================================================================

/// Record of an equation being used in a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationUsage {
    pub equation: Equation,
    /// What the equation produced (e.g. "BMI = 24.22 kg/m2")
    pub context: String,
}

impl EquationUsage {
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
        }
    }
}

/// Collector for equation usage during a calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage::new(equation, context));
    }

    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Unique equations in first-use order
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    pub fn by_equation(&self) -> HashMap<Equation, Vec<&EquationUsage>> {
        let mut map: HashMap<Equation, Vec<&EquationUsage>> = HashMap::new();
        for usage in &self.usages {
            map.entry(usage.equation).or_default().push(usage);
        }
        map
    }

    /// Group unique equations by category for the appendix
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }
}

// ============================================================================
// Typst Appendix Generation
// ============================================================================

impl EquationTracker {
    /// Generate Typst markup for the "Formulas and References" appendix.
    pub fn generate_appendix_typst(&self) -> String {
        let mut output = String::new();

        output.push_str(r##"
#pagebreak()

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Appendix: Formulas and References]
  ]
]

#v(12pt)

#text(size: 10pt)[
  This appendix lists the formulas applied to produce this report and the values they returned.
]

#v(16pt)
"##);

        let by_category = self.by_category();
        if by_category.is_empty() {
            output.push_str("#text(style: \"italic\")[No formulas recorded for this report.]\n");
            return output;
        }

        let usage_by_eq = self.by_equation();

        for (category, equations) in by_category {
            output.push_str(&format!("\n== {}\n\n", category.display_name()));

            for equation in equations {
                let meta = equation.metadata();

                output.push_str(&format!("=== {}\n\n", meta.name));
                output.push_str(&format!("#text(size: 10pt)[{}]\n\n", meta.description));
                output.push_str(&format!("*Formula:* {}\n\n", meta.formula_typst));

                if !meta.references.is_empty() {
                    let refs: Vec<&str> = meta.references.iter().map(|c| c.short_form()).collect();
                    output.push_str(&format!("*Reference:* {}\n\n", escape_typst_text(&refs.join("; "))));
                }

                if !meta.variables.is_empty() {
                    output.push_str("*Variables:*\n");
                    output.push_str("#table(\n");
                    output.push_str("  columns: (auto, 1fr, auto),\n");
                    output.push_str("  inset: 6pt,\n");
                    output.push_str("  stroke: 0.5pt,\n");
                    output.push_str("  align: (left, left, left),\n");
                    output.push_str("  table.header([*Symbol*], [*Description*], [*Units*]),\n");
                    for var in &meta.variables {
                        output.push_str(&format!(
                            "  [${}$], [{}], [{}],\n",
                            escape_typst_math(var.symbol),
                            var.description,
                            var.units
                        ));
                    }
                    output.push_str(")\n\n");
                }

                if let Some(usages) = usage_by_eq.get(&equation) {
                    let results: Vec<String> = usages.iter().map(|u| escape_typst_text(&u.context)).collect();
                    output.push_str(&format!("*Result:* {}\n\n", results.join(", ")));
                }

                if !meta.assumptions.is_empty() {
                    output.push_str("*Assumptions:*\n");
                    for assumption in &meta.assumptions {
                        output.push_str(&format!("- {}\n", assumption));
                    }
                    output.push('\n');
                }

                output.push_str("#v(8pt)\n");
                output.push_str("#line(length: 100%, stroke: 0.25pt + gray)\n");
                output.push_str("#v(8pt)\n\n");
            }
        }

        output.push_str(&generate_references_typst(&Citation::ALL));
        output
    }
}

/// Numbered reference list in Typst markup.
pub fn generate_references_typst(citations: &[Citation]) -> String {
    let mut output = String::from("\n== References\n\n");
    for citation in citations {
        output.push_str(&format!(
            "+ #text(size: 9pt, style: \"italic\")[{}]\n",
            escape_typst_text(citation.citation())
        ));
    }
    output.push('\n');
    output
}

/// Turn subscript symbols like `f_activity` into Typst math (`f_"activity"`).
fn escape_typst_math(s: &str) -> String {
    match s.split_once('_') {
        Some((base, sub)) if sub.chars().count() > 1 => format!("{}_\"{}\"", base, sub),
        _ => s.to_string(),
    }
}

/// Escape markup characters in plain text placed inside Typst content.
pub(crate) fn escape_typst_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '/' | '`' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equations_have_metadata() {
        for eq in Equation::ALL {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty());
            assert!(meta.formula_typst.starts_with('$'), "{:?}", eq);
            assert!(!meta.formula_plain.is_empty());
        }
    }

    #[test]
    fn test_equation_tracker() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::BodyMassIndex, "BMI = 24.22 kg/m2");
        tracker.record(Equation::BasalEnergyMale, "BEE = 1671.67 kcal/day");
        tracker.record(Equation::BodyMassIndex, "again");

        assert_eq!(tracker.usages().len(), 3);
        assert_eq!(
            tracker.unique_equations(),
            vec![Equation::BodyMassIndex, Equation::BasalEnergyMale]
        );
        assert_eq!(tracker.by_equation()[&Equation::BodyMassIndex].len(), 2);
    }

    #[test]
    fn test_by_category_sorted() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::MealDistribution, "split");
        tracker.record(Equation::BasalEnergyFemale, "bee");
        tracker.record(Equation::IdealBodyWeight, "ibw");

        let cats: Vec<EquationCategory> = tracker.by_category().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            cats,
            vec![
                EquationCategory::BodyComposition,
                EquationCategory::EnergyExpenditure,
                EquationCategory::MealPlanning,
            ]
        );
    }

    #[test]
    fn test_appendix_markup() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::TotalEnergyExpenditure, "TEE = 2000.00 kcal/day");
        let typst = tracker.generate_appendix_typst();
        assert!(typst.contains("== Energy Expenditure"));
        assert!(typst.contains("[$f_\"stress\"$]"));
        assert!(typst.contains("== References"));

        let empty = EquationTracker::new().generate_appendix_typst();
        assert!(empty.contains("No formulas recorded"));
    }

    #[test]
    fn test_escape_typst_text() {
        assert_eq!(escape_typst_text("a_b #1 [x]"), "a\\_b \\#1 \\[x\\]");
        assert_eq!(escape_typst_text("Ward 7 // East /*"), "Ward 7 \\/\\/ East \\/\\*");
        assert_eq!(escape_typst_math("H_m"), "H_m");
        assert_eq!(escape_typst_math("f_stress"), "f_\"stress\"");
    }
}
