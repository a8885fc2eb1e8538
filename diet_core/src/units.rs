//! # Unit Types
//!
//! Type-safe wrappers for the anthropometric and energy units used by the
//! screening formulas. They are plain f64 newtypes so JSON stays clean (just
//! numbers) while the formulas can't mix centimeters and meters by accident.
//!
//! ## Units
//!
//! - Mass: kilograms (kg)
//! - Length: centimeters (cm) as entered; BMI uses the square in m^2
//! - Energy: kilocalories (kcal), per day unless stated otherwise
//!
//! ## Example
//!
//! ```rust
//! use diet_core::units::{Centimeters, Kcal};
//!
//! assert_eq!(Centimeters(170.0).squared_m2(), 2.89);
//! assert_eq!((Kcal(2000.0) * 0.3).0, 600.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

impl Centimeters {
    /// Square of the length expressed in m^2.
    ///
    /// Squares the centimeter value before scaling so that heights entered
    /// in whole centimeters produce exact decimal areas (170 cm -> 2.89).
    pub fn squared_m2(self) -> f64 {
        self.0 * self.0 / 10_000.0
    }
}

// ============================================================================
// Energy Units
// ============================================================================

/// Energy in kilocalories
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kcal(pub f64);

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }
    };
}

impl_arithmetic!(Kilograms);
impl_arithmetic!(Centimeters);
impl_arithmetic!(Kcal);

// ============================================================================
// Display Rounding
// ============================================================================

/// Round to 2 decimal places for display.
///
/// Calculations keep full precision; only reports call this.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_m2() {
        assert_eq!(Centimeters(170.0).squared_m2(), 2.89);
        assert_eq!(Centimeters(200.0).squared_m2(), 4.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Kcal(2000.0);
        let b = Kcal(349.6);
        assert!(((a - b).0 - 1650.4).abs() < 1e-9);
        assert_eq!((a * 0.3).0, 600.0);
        assert_eq!((a / 4.0).0, 500.0);
        assert_eq!((a + b).0, 2349.6);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1695.874), 1695.87);
        assert_eq!(round2(-12.345678), -12.35);
        assert_eq!(round2(24.221453), 24.22);
    }

    #[test]
    fn test_serialization() {
        let kcal = Kcal(1695.87);
        let json = serde_json::to_string(&kcal).unwrap();
        assert_eq!(json, "1695.87");
    }
}
