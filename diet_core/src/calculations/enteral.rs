//! # Enteral Supplements
//!
//! Fixed calorie contribution of the oral/enteral nutrition products offered
//! on the inpatient track. The selected product's kcal is subtracted from TEE
//! before the meal split so that food intake covers only the remainder.
//!
//! Powdered products are counted in scoops; Nepro (220 ml) in bottles.

use crate::units::Kcal;

/// Supplement product and serving count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnteralProduct {
    #[default]
    None,
    Ensure2,
    Ensure4,
    Ensure6,
    Ensure8,
    Glucerna2,
    Glucerna4,
    Glucerna6,
    Glucerna8,
    Prosure2,
    Prosure4,
    Prosure6,
    Prosure8,
    Nepro1,
    Nepro2,
    Nepro3,
}

/// Product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnteralBrand {
    Ensure,
    Glucerna,
    Prosure,
    Nepro,
}

impl EnteralBrand {
    pub fn display_name(&self) -> &'static str {
        match self {
            EnteralBrand::Ensure => "Ensure",
            EnteralBrand::Glucerna => "Glucerna",
            EnteralBrand::Prosure => "Prosure",
            EnteralBrand::Nepro => "Nepro",
        }
    }

    /// Serving unit for the given count
    pub fn serving_unit(&self, count: u8) -> &'static str {
        match (self, count) {
            (EnteralBrand::Nepro, 1) => "bottle",
            (EnteralBrand::Nepro, _) => "bottles",
            (_, 1) => "scoop",
            _ => "scoops",
        }
    }
}

impl EnteralProduct {
    pub const ALL: [EnteralProduct; 16] = [
        EnteralProduct::None,
        EnteralProduct::Ensure2,
        EnteralProduct::Ensure4,
        EnteralProduct::Ensure6,
        EnteralProduct::Ensure8,
        EnteralProduct::Glucerna2,
        EnteralProduct::Glucerna4,
        EnteralProduct::Glucerna6,
        EnteralProduct::Glucerna8,
        EnteralProduct::Prosure2,
        EnteralProduct::Prosure4,
        EnteralProduct::Prosure6,
        EnteralProduct::Prosure8,
        EnteralProduct::Nepro1,
        EnteralProduct::Nepro2,
        EnteralProduct::Nepro3,
    ];

    /// Brand and serving count (`None` for no supplement)
    pub fn serving(&self) -> Option<(EnteralBrand, u8)> {
        use EnteralBrand::*;
        match self {
            EnteralProduct::None => None,
            EnteralProduct::Ensure2 => Some((Ensure, 2)),
            EnteralProduct::Ensure4 => Some((Ensure, 4)),
            EnteralProduct::Ensure6 => Some((Ensure, 6)),
            EnteralProduct::Ensure8 => Some((Ensure, 8)),
            EnteralProduct::Glucerna2 => Some((Glucerna, 2)),
            EnteralProduct::Glucerna4 => Some((Glucerna, 4)),
            EnteralProduct::Glucerna6 => Some((Glucerna, 6)),
            EnteralProduct::Glucerna8 => Some((Glucerna, 8)),
            EnteralProduct::Prosure2 => Some((Prosure, 2)),
            EnteralProduct::Prosure4 => Some((Prosure, 4)),
            EnteralProduct::Prosure6 => Some((Prosure, 6)),
            EnteralProduct::Prosure8 => Some((Prosure, 8)),
            EnteralProduct::Nepro1 => Some((Nepro, 1)),
            EnteralProduct::Nepro2 => Some((Nepro, 2)),
            EnteralProduct::Nepro3 => Some((Nepro, 3)),
        }
    }

    /// Calories supplied per day by this selection
    pub fn kcal(&self) -> Kcal {
        let kcal = match self {
            EnteralProduct::None => 0.0,
            EnteralProduct::Ensure2 => 87.4,
            EnteralProduct::Ensure4 => 174.8,
            EnteralProduct::Ensure6 => 262.2,
            EnteralProduct::Ensure8 => 349.6,
            EnteralProduct::Glucerna2 => 91.2,
            EnteralProduct::Glucerna4 => 182.4,
            EnteralProduct::Glucerna6 => 273.6,
            EnteralProduct::Glucerna8 => 364.8,
            EnteralProduct::Prosure2 => 67.2,
            EnteralProduct::Prosure4 => 134.4,
            EnteralProduct::Prosure6 => 201.6,
            EnteralProduct::Prosure8 => 268.8,
            EnteralProduct::Nepro1 => 401.0,
            EnteralProduct::Nepro2 => 802.0,
            EnteralProduct::Nepro3 => 1203.0,
        };
        Kcal(kcal)
    }

    /// Form code, e.g. "ensure_4"
    pub fn code(&self) -> String {
        match self.serving() {
            Some((brand, count)) => format!("{}_{}", brand.display_name().to_lowercase(), count),
            None => "none".to_string(),
        }
    }

    pub fn try_from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL.iter().copied().find(|p| p.code() == code)
    }

    /// Parse a form code; unknown codes mean no supplement.
    pub fn from_code(code: &str) -> Self {
        Self::try_from_code(code).unwrap_or_default()
    }

    /// Human label, e.g. "Ensure 4 scoops" or "None"
    pub fn display_name(&self) -> String {
        match self.serving() {
            Some((brand, count)) => format!("{} {} {}", brand.display_name(), count, brand.serving_unit(count)),
            None => "None".to_string(),
        }
    }

    pub fn is_set(&self) -> bool {
        *self != EnteralProduct::None
    }
}

/// Daily total left for meals once the supplement is accounted for.
pub fn adjusted_energy(tee: Kcal, product: EnteralProduct) -> Kcal {
    tee - product.kcal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kcal_table_range() {
        let values: Vec<f64> = EnteralProduct::ALL
            .iter()
            .filter(|p| p.is_set())
            .map(|p| p.kcal().0)
            .collect();
        assert_eq!(values.len(), 15);
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min, 67.2);
        assert_eq!(max, 1203.0);
    }

    #[test]
    fn test_codes() {
        assert_eq!(EnteralProduct::Glucerna6.code(), "glucerna_6");
        assert_eq!(EnteralProduct::from_code("nepro_2"), EnteralProduct::Nepro2);
        assert_eq!(EnteralProduct::from_code("ensure_3"), EnteralProduct::None);
        for product in EnteralProduct::ALL {
            assert_eq!(EnteralProduct::from_code(&product.code()), product);
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(EnteralProduct::Ensure4.display_name(), "Ensure 4 scoops");
        assert_eq!(EnteralProduct::Nepro1.display_name(), "Nepro 1 bottle");
        assert_eq!(EnteralProduct::Nepro3.display_name(), "Nepro 3 bottles");
        assert_eq!(EnteralProduct::None.display_name(), "None");
    }

    #[test]
    fn test_adjusted_energy() {
        let tee = Kcal(2000.0);
        assert_eq!(adjusted_energy(tee, EnteralProduct::None), tee);
        assert!((adjusted_energy(tee, EnteralProduct::Prosure4).0 - 1865.6).abs() < 1e-9);
    }
}
