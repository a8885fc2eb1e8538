//! # PDF Generation Module
//!
//! Renders a [`ScreeningReport`] to PDF with Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected via string replacement before compilation
//! - Track-specific sections are built as Typst snippets
//! - The formulas appendix comes from the report's `EquationTracker`
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use diet_core::calculations::screening::{screen, ScreeningForm};
//! use diet_core::config::ExportSettings;
//! use diet_core::pdf::render_report_pdf;
//!
//! let form = ScreeningForm {
//!     weight_kg: Some(70.0),
//!     height_cm: Some(170.0),
//!     age_years: Some(30.0),
//!     ..ScreeningForm::default()
//! };
//! let report = screen(&form).unwrap();
//! let pdf_bytes = render_report_pdf(&report, &ExportSettings::default()).unwrap();
//! std::fs::write("diet_screening_results.pdf", pdf_bytes).unwrap();
//! ```

use chrono::{Datelike, Duration, Local, Utc};
use once_cell::sync::Lazy;
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::body_mass::BmiCategory;
use crate::calculations::meals::{MealPlan, MealsPerDay};
use crate::calculations::screening::{HealthyTrack, InpatientTrack, ReportView, ScreeningReport};
use crate::config::ExportSettings;
use crate::equations::registry::escape_typst_text;
use crate::errors::{CalcError, CalcResult};
use crate::units::round2;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Bundled fonts, parsed once per process.
static FONTS: Lazy<(FontBook, Vec<Font>)> = Lazy::new(|| {
    let fonts: Vec<Font> = typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data)))
        .collect();
    debug!(count = fonts.len(), "loaded bundled fonts");
    (FontBook::from_fonts(&fonts), fonts)
});

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let (book, fonts) = &*FONTS;

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book.clone()),
            fonts: fonts.clone(),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, offset: Option<i64>) -> Option<Datetime> {
        let date = match offset {
            Some(hours) => (Utc::now() + Duration::hours(hours)).date_naive(),
            None => Local::now().date_naive(),
        };
        Datetime::from_ymd(date.year(), date.month().try_into().ok()?, date.day().try_into().ok()?)
    }
}

// ============================================================================
// PDF Template
// ============================================================================

/// Typst template for the screening report
const REPORT_TEMPLATE: &str = r##"
#set page(
  paper: "{{PAPER}}",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, auto),
      align(left)[#text(size: 9pt)[Generated on: {{GENERATED_ON}}]],
      align(right)[#text(size: 9pt)[Page #counter(page).display()]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

// Title Block
#align(center)[
  #block(width: 100%, fill: rgb("#eef5ee"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[{{TITLE}}]
    {{CLINIC}}
  ]
]

#v(12pt)

== Personal Details

#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Parameter*], [*Value*], [*Unit*]),
  [Age], [{{AGE}}], [years],
  [Gender], [{{GENDER}}], [],
  [Weight], [{{WEIGHT}}], [kg],
  [Height], [{{HEIGHT}}], [cm],
)

#v(12pt)

== Body Composition

#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Metric*], [*Value*], [*Unit*]),
  [Body Mass Index], [{{BMI}}], [kg/m#super[2]],
  [BMI Category], [*{{BMI_CATEGORY}}*], [],
  [Ideal Body Weight], [{{IDEAL_WEIGHT}}], [kg],
)

#v(8pt)

#text(size: 9pt)[
  #table(
    columns: (1fr, auto),
    inset: 5pt,
    stroke: 0.25pt + gray,
    align: (left, right),
    table.header([*BMI Category*], [*Range (kg/m#super[2])*]),
{{BMI_BANDS}}  )
]

#v(12pt)

{{ENERGY_SECTION}}

{{APPENDIX}}
"##;

// ============================================================================
// Rendering
// ============================================================================

/// Render a screening report to PDF bytes.
pub fn render_report_pdf(report: &ScreeningReport, settings: &ExportSettings) -> CalcResult<Vec<u8>> {
    let source = build_report_source(report, settings);

    // Compile the Typst document
    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    // Render to PDF
    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    debug!(bytes = pdf_bytes.len(), "report rendered");
    Ok(pdf_bytes)
}

/// Fill the template with report data.
fn build_report_source(report: &ScreeningReport, settings: &ExportSettings) -> String {
    let input = &report.input;
    let generated_on = report.generated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string();

    let clinic = if settings.clinic.trim().is_empty() {
        String::new()
    } else {
        format!("#v(4pt)\n    #text(size: 12pt)[{}]", escape_typst_text(settings.clinic.trim()))
    };

    REPORT_TEMPLATE
        .replace("{{PAPER}}", settings.paper.typst_name())
        .replace("{{GENERATED_ON}}", &generated_on)
        .replace("{{TITLE}}", &escape_typst_text(&settings.title))
        .replace("{{CLINIC}}", &clinic)
        .replace("{{AGE}}", &fmt_value(input.age_years))
        .replace("{{GENDER}}", input.gender.display_name())
        .replace("{{WEIGHT}}", &fmt_value(input.weight.0))
        .replace("{{HEIGHT}}", &fmt_value(input.height.0))
        .replace("{{BMI}}", &format!("{:.2}", report.bmi))
        .replace("{{BMI_CATEGORY}}", report.bmi_category.display_name())
        .replace("{{IDEAL_WEIGHT}}", &format!("{:.2}", report.ideal_weight.0))
        .replace("{{BMI_BANDS}}", &build_bmi_band_rows(report.bmi_category))
        .replace("{{ENERGY_SECTION}}", &build_energy_section(report))
        .replace("{{APPENDIX}}", &report.equations.generate_appendix_typst())
}

/// Print whole numbers without decimals, everything else at 2 places.
fn fmt_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", round2(v))
    }
}

fn build_bmi_band_rows(current: BmiCategory) -> String {
    let mut rows = String::new();
    let mut lower: Option<f64> = None;

    for category in BmiCategory::ALL {
        let range = match (lower, category.upper_bound()) {
            (None, Some(upper)) => format!("< {:.1}", upper),
            (Some(low), Some(upper)) => format!("{:.1} - < {:.1}", low, upper),
            (Some(low), None) => format!(">= {:.1}", low),
            (None, None) => String::new(),
        };
        let name = if category == current {
            format!("*{}*", category.display_name())
        } else {
            category.display_name().to_string()
        };
        rows.push_str(&format!("    [{}], [{}],\n", name, escape_typst_text(&range)));
        lower = category.upper_bound();
    }

    rows
}

fn build_energy_section(report: &ScreeningReport) -> String {
    match &report.view {
        ReportView::Basic => String::from(
            "== Energy Requirements\n\n\
             #text(style: \"italic\")[No activity level, inpatient activity or stress factor was selected, \
             so energy requirements and the meal plan were not calculated.]\n",
        ),
        ReportView::Healthy(track) => build_healthy_section(track, report.input.meals_per_day),
        ReportView::Inpatient(track) => build_inpatient_section(track, report.input.meals_per_day),
    }
}

fn build_healthy_section(track: &HealthyTrack, meals_per_day: u8) -> String {
    let mut out = String::from("== Energy Requirements (Healthy Individual)\n\n");
    out.push_str(&format!(
        "#table(\n  columns: (1fr, auto),\n  inset: 8pt,\n  stroke: 0.5pt,\n  align: (left, right),\n  \
         table.header([*Factor*], [*Value*]),\n  \
         [Activity Level: {}], [x {:.3}],\n  \
         [*Total Daily Energy Expenditure*], [*{:.2} kcal/day*],\n)\n\n",
        escape_typst_text(track.activity_level.description()),
        track.activity_multiplier,
        track.tdee.0,
    ));
    out.push_str(&build_meal_section(&track.meal_plan, meals_per_day));
    out
}

fn build_inpatient_section(track: &InpatientTrack, meals_per_day: u8) -> String {
    let mut out = String::from("== Energy Requirements (Hospitalized Patient)\n\n");
    out.push_str(&format!(
        "#table(\n  columns: (1fr, auto),\n  inset: 8pt,\n  stroke: 0.5pt,\n  align: (left, right),\n  \
         table.header([*Factor*], [*Value*]),\n  \
         [Activity: {}], [x {:.2}],\n  \
         [Stress: {}], [x {:.2}],\n  \
         [*Total Energy Expenditure*], [*{:.2} kcal/day*],\n",
        escape_typst_text(track.inpatient_activity.description()),
        track.activity_multiplier,
        escape_typst_text(track.stress_factor.description()),
        track.stress_multiplier,
        track.tee.0,
    ));
    if track.enteral_product.is_set() {
        out.push_str(&format!(
            "  [Enteral Supplement: {}], [#sym.minus {:.2} kcal/day],\n  \
             [*Energy From Meals*], [*{:.2} kcal/day*],\n",
            escape_typst_text(&track.enteral_product.display_name()),
            track.enteral_kcal.0,
            track.adjusted_tee.0,
        ));
    }
    out.push_str(")\n\n");
    out.push_str(&build_meal_section(&track.meal_plan, meals_per_day));
    out
}

fn build_meal_section(plan: &MealPlan, meals_per_day: u8) -> String {
    let Some(meals) = MealsPerDay::from_count(meals_per_day) else {
        return format!(
            "#text(style: \"italic\")[No meal distribution is defined for {} meals per day.]\n",
            meals_per_day
        );
    };

    let mut out = format!("== Calories Per Meal ({})\n\n", meals.display_name());
    out.push_str(
        "#table(\n  columns: (1fr, auto, auto, auto),\n  inset: 8pt,\n  stroke: 0.5pt,\n  \
         align: (left, right, right, right),\n  \
         table.header([*Meal*], [*Share*], [*Calories*], [*Guideline*]),\n",
    );

    let guidelines = meals.guidelines();
    for portion in plan.portions() {
        let guideline = guidelines
            .iter()
            .find(|g| g.slot == portion.slot)
            .map(|g| g.label())
            .unwrap_or_default();
        out.push_str(&format!(
            "  [{}], [{:.0}%], [{:.2} kcal], [{}],\n",
            portion.slot.display_name(),
            portion.fraction * 100.0,
            portion.kcal.0,
            guideline,
        ));
    }
    out.push_str(")\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::energy::{ActivityLevel, Gender, InpatientActivity, StressFactor};
    use crate::calculations::enteral::EnteralProduct;
    use crate::calculations::screening::{screen, ScreeningForm};
    use crate::config::PaperSize;

    fn form() -> ScreeningForm {
        ScreeningForm {
            weight_kg: Some(70.0),
            height_cm: Some(170.0),
            age_years: Some(30.0),
            ..ScreeningForm::default()
        }
    }

    #[test]
    fn test_source_for_basic_view() {
        let report = screen(&form()).unwrap();
        let source = build_report_source(&report, &ExportSettings::default());
        assert!(source.contains("Generated on: "));
        assert!(source.contains("paper: \"a4\""));
        assert!(source.contains("[24.22]"));
        assert!(source.contains("were not calculated"));
        assert!(!source.contains("Calories Per Meal"));
        assert!(!source.contains("{{"));
    }

    #[test]
    fn test_source_for_inpatient_view() {
        let form = ScreeningForm {
            inpatient_activity: InpatientActivity::Physio,
            stress_factor: StressFactor::Ventilation,
            enteral_product: EnteralProduct::Nepro2,
            meals_per_day: 6,
            ..form()
        };
        let report = screen(&form).unwrap();
        let settings = ExportSettings {
            clinic: "Ward #4".to_string(),
            paper: PaperSize::Letter,
            ..ExportSettings::default()
        };
        let source = build_report_source(&report, &settings);
        assert!(source.contains("Hospitalized Patient"));
        assert!(source.contains("Nepro 2 bottles"));
        assert!(source.contains("Six Meals"));
        assert!(source.contains("Ward \\#4"));
        assert!(source.contains("us-letter"));
    }

    #[test]
    fn test_bmi_band_rows() {
        let rows = build_bmi_band_rows(BmiCategory::Overweight);
        assert!(rows.contains("[Underweight], [\\< 18.5]"));
        assert!(rows.contains("[*Overweight*], [22.9 - \\< 27.5]"));
        assert!(rows.contains("[Obesity Class III], [\\>= 40.0]"));
    }

    #[test]
    fn test_pdf_generation() {
        let form = ScreeningForm {
            activity_level: ActivityLevel::LightlyActive,
            meals_per_day: 4,
            ..form()
        };
        let report = screen(&form).unwrap();
        let pdf = render_report_pdf(&report, &ExportSettings::default());

        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }

    #[test]
    fn test_pdf_with_comment_markers_in_clinic() {
        let report = screen(&form()).unwrap();
        let settings = ExportSettings {
            clinic: "Ward 7 // East".to_string(),
            title: "Screening /* draft */".to_string(),
            ..ExportSettings::default()
        };
        let source = build_report_source(&report, &settings);
        assert!(source.contains("Ward 7 \\/\\/ East"));

        let pdf_bytes = render_report_pdf(&report, &settings).unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_inpatient_supplement_above_tee() {
        let form = ScreeningForm {
            weight_kg: Some(35.0),
            height_cm: Some(150.0),
            age_years: Some(90.0),
            gender: Gender::Female,
            inpatient_activity: InpatientActivity::Sedated,
            enteral_product: EnteralProduct::Nepro3,
            meals_per_day: 6,
            ..ScreeningForm::default()
        };
        let report = screen(&form).unwrap();
        let ReportView::Inpatient(track) = &report.view else {
            panic!("expected inpatient track, got {:?}", report.view);
        };
        assert!(track.adjusted_tee.0 < 0.0);
        assert!((track.tee.0 - track.adjusted_tee.0 - 1203.0).abs() < 1e-9);
        assert_eq!(track.meal_plan.len(), 6);
        assert!((track.meal_plan.total().0 - track.adjusted_tee.0).abs() < 1e-9);

        let pdf_bytes = render_report_pdf(&report, &ExportSettings::default()).unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"));
        assert!(pdf_bytes.len() > 1000);
    }
}
