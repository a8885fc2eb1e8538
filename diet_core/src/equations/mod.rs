//! # Screening Equations
//!
//! Metadata for every formula the calculator applies. Keeping the formulas
//! in one registry lets the report print exactly what was used, with the
//! literature behind each one.
//!
//! The formulas themselves live next to the code that evaluates them in
//! [`crate::calculations`]; this module only describes them.
//!
//! ## Modules
//!
//! - [`registry`] - Equation metadata, usage tracking and appendix generation

pub mod registry;

pub use registry::{
    Citation,
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    EquationUsage,
    Variable,
    generate_references_typst,
};
