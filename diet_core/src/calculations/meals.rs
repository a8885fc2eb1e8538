//! # Meal Planning
//!
//! Splits a daily calorie total across 3 to 6 meal slots using fixed
//! percentage tables, and carries the published distribution guideline
//! ranges printed next to every plan.
//!
//! | Meals | Breakfast | Morning snack | Lunch | Afternoon snack | Dinner | Supper |
//! |-------|-----------|---------------|-------|-----------------|--------|--------|
//! | 3     | 30%       |               | 35%   |                 | 35%    |        |
//! | 4     | 25%       | 10%           | 35%   |                 | 30%    |        |
//! | 5     | 20%       | 10%           | 30%   | 10%             | 30%    |        |
//! | 6     | 20%       | 10%           | 25%   | 10%             | 25%    | 10%    |
//!
//! ## Example
//!
//! ```rust
//! use diet_core::calculations::meals::{meal_split_for_count, MealSlot};
//! use diet_core::units::Kcal;
//!
//! let plan = meal_split_for_count(Kcal(2000.0), 3);
//! assert_eq!(plan.get(MealSlot::Breakfast).map(|k| k.0), Some(600.0));
//! assert!(meal_split_for_count(Kcal(2000.0), 7).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::units::Kcal;

/// Default number of meals on a fresh form
pub const DEFAULT_MEALS_PER_DAY: u8 = 3;

// ============================================================================
// Meal Slots
// ============================================================================

/// A named eating occasion within the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    Supper,
}

impl MealSlot {
    /// All slots in the order they occur during the day
    pub const ALL: [MealSlot; 6] = [
        MealSlot::Breakfast,
        MealSlot::MorningSnack,
        MealSlot::Lunch,
        MealSlot::AfternoonSnack,
        MealSlot::Dinner,
        MealSlot::Supper,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::MorningSnack => "morningSnack",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoonSnack",
            MealSlot::Dinner => "dinner",
            MealSlot::Supper => "supper",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::MorningSnack => "Morning Snack",
            MealSlot::Lunch => "Lunch",
            MealSlot::AfternoonSnack => "Afternoon Snack",
            MealSlot::Dinner => "Dinner",
            MealSlot::Supper => "Supper",
        }
    }
}

// ============================================================================
// Meals Per Day
// ============================================================================

/// Supported number of meals per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealsPerDay {
    Three,
    Four,
    Five,
    Six,
}

const SPLIT_THREE: &[(MealSlot, f64)] = &[
    (MealSlot::Breakfast, 0.30),
    (MealSlot::Lunch, 0.35),
    (MealSlot::Dinner, 0.35),
];

const SPLIT_FOUR: &[(MealSlot, f64)] = &[
    (MealSlot::Breakfast, 0.25),
    (MealSlot::MorningSnack, 0.10),
    (MealSlot::Lunch, 0.35),
    (MealSlot::Dinner, 0.30),
];

const SPLIT_FIVE: &[(MealSlot, f64)] = &[
    (MealSlot::Breakfast, 0.20),
    (MealSlot::MorningSnack, 0.10),
    (MealSlot::Lunch, 0.30),
    (MealSlot::AfternoonSnack, 0.10),
    (MealSlot::Dinner, 0.30),
];

const SPLIT_SIX: &[(MealSlot, f64)] = &[
    (MealSlot::Breakfast, 0.20),
    (MealSlot::MorningSnack, 0.10),
    (MealSlot::Lunch, 0.25),
    (MealSlot::AfternoonSnack, 0.10),
    (MealSlot::Dinner, 0.25),
    (MealSlot::Supper, 0.10),
];

const GUIDE_THREE: &[GuidelineRange] = &[
    GuidelineRange::new(MealSlot::Breakfast, 30, 35),
    GuidelineRange::new(MealSlot::Lunch, 35, 40),
    GuidelineRange::new(MealSlot::Dinner, 25, 35),
];

const GUIDE_FOUR: &[GuidelineRange] = &[
    GuidelineRange::new(MealSlot::Breakfast, 25, 30),
    GuidelineRange::new(MealSlot::MorningSnack, 5, 10),
    GuidelineRange::new(MealSlot::Lunch, 35, 40),
    GuidelineRange::new(MealSlot::Dinner, 25, 30),
];

const GUIDE_FIVE: &[GuidelineRange] = &[
    GuidelineRange::new(MealSlot::Breakfast, 25, 30),
    GuidelineRange::new(MealSlot::MorningSnack, 5, 10),
    GuidelineRange::new(MealSlot::Lunch, 35, 40),
    GuidelineRange::new(MealSlot::AfternoonSnack, 5, 10),
    GuidelineRange::new(MealSlot::Dinner, 15, 20),
];

const GUIDE_SIX: &[GuidelineRange] = &[
    GuidelineRange::new(MealSlot::Breakfast, 25, 30),
    GuidelineRange::new(MealSlot::MorningSnack, 5, 10),
    GuidelineRange::new(MealSlot::Lunch, 25, 30),
    GuidelineRange::new(MealSlot::AfternoonSnack, 5, 10),
    GuidelineRange::new(MealSlot::Dinner, 25, 30),
    GuidelineRange::new(MealSlot::Supper, 5, 10),
];

impl MealsPerDay {
    pub const ALL: [MealsPerDay; 4] = [
        MealsPerDay::Three,
        MealsPerDay::Four,
        MealsPerDay::Five,
        MealsPerDay::Six,
    ];

    /// Map a raw meal count; anything outside 3..=6 is unsupported.
    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            3 => Some(MealsPerDay::Three),
            4 => Some(MealsPerDay::Four),
            5 => Some(MealsPerDay::Five),
            6 => Some(MealsPerDay::Six),
            _ => None,
        }
    }

    pub fn count(&self) -> u8 {
        match self {
            MealsPerDay::Three => 3,
            MealsPerDay::Four => 4,
            MealsPerDay::Five => 5,
            MealsPerDay::Six => 6,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MealsPerDay::Three => "Three Meals",
            MealsPerDay::Four => "Four Meals",
            MealsPerDay::Five => "Five Meals",
            MealsPerDay::Six => "Six Meals",
        }
    }

    /// Fraction of the daily total assigned to each slot, in slot order.
    pub fn percentages(&self) -> &'static [(MealSlot, f64)] {
        match self {
            MealsPerDay::Three => SPLIT_THREE,
            MealsPerDay::Four => SPLIT_FOUR,
            MealsPerDay::Five => SPLIT_FIVE,
            MealsPerDay::Six => SPLIT_SIX,
        }
    }

    /// Published distribution guideline ranges for this meal count.
    pub fn guidelines(&self) -> &'static [GuidelineRange] {
        match self {
            MealsPerDay::Three => GUIDE_THREE,
            MealsPerDay::Four => GUIDE_FOUR,
            MealsPerDay::Five => GUIDE_FIVE,
            MealsPerDay::Six => GUIDE_SIX,
        }
    }

    /// Split a daily total across this many meals.
    pub fn split(&self, total: Kcal) -> MealPlan {
        let portions = self
            .percentages()
            .iter()
            .map(|&(slot, fraction)| MealPortion {
                slot,
                fraction,
                kcal: total * fraction,
            })
            .collect();
        MealPlan { portions }
    }
}

/// Split a daily total for a raw meal count; unsupported counts yield an
/// empty plan.
pub fn meal_split_for_count(total: Kcal, meals_per_day: u8) -> MealPlan {
    MealsPerDay::from_count(meals_per_day)
        .map(|m| m.split(total))
        .unwrap_or_default()
}

// ============================================================================
// Guideline Ranges
// ============================================================================

/// Recommended share of daily energy for a slot, in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineRange {
    pub slot: MealSlot,
    pub min_percent: u8,
    pub max_percent: u8,
}

impl GuidelineRange {
    pub const fn new(slot: MealSlot, min_percent: u8, max_percent: u8) -> Self {
        Self { slot, min_percent, max_percent }
    }

    /// Range as printed in reports, e.g. "30 - 35%"
    pub fn label(&self) -> String {
        format!("{} - {}%", self.min_percent, self.max_percent)
    }
}

// ============================================================================
// Meal Plan
// ============================================================================

/// Calories assigned to one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MealPortion {
    pub slot: MealSlot,
    /// Share of the daily total (0.0 - 1.0)
    pub fraction: f64,
    pub kcal: Kcal,
}

/// Ordered slot -> kcal mapping produced by a split.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealPlan {
    portions: Vec<MealPortion>,
}

impl MealPlan {
    pub fn portions(&self) -> &[MealPortion] {
        &self.portions
    }

    pub fn get(&self, slot: MealSlot) -> Option<Kcal> {
        self.portions.iter().find(|p| p.slot == slot).map(|p| p.kcal)
    }

    pub fn is_empty(&self) -> bool {
        self.portions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.portions.len()
    }

    /// Sum of all portions
    pub fn total(&self) -> Kcal {
        self.portions.iter().fold(Kcal(0.0), |acc, p| acc + p.kcal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_sum_to_one() {
        for meals in MealsPerDay::ALL {
            let sum: f64 = meals.percentages().iter().map(|(_, f)| f).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{:?} sums to {}", meals, sum);
            assert_eq!(meals.percentages().len(), meals.count() as usize);
        }
    }

    #[test]
    fn test_split_preserves_total() {
        for meals in MealsPerDay::ALL {
            let plan = meals.split(Kcal(2345.67));
            assert!((plan.total().0 - 2345.67).abs() < 1e-6);
        }
    }

    #[test]
    fn test_four_meal_order() {
        let plan = meal_split_for_count(Kcal(2000.0), 4);
        let slots: Vec<MealSlot> = plan.portions().iter().map(|p| p.slot).collect();
        assert_eq!(
            slots,
            vec![MealSlot::Breakfast, MealSlot::MorningSnack, MealSlot::Lunch, MealSlot::Dinner]
        );
        assert!((plan.get(MealSlot::MorningSnack).unwrap().0 - 200.0).abs() < 1e-9);
        assert!((plan.get(MealSlot::Lunch).unwrap().0 - 700.0).abs() < 1e-9);
        assert_eq!(plan.get(MealSlot::Supper), None);
    }

    #[test]
    fn test_six_meals_include_supper() {
        let plan = meal_split_for_count(Kcal(1000.0), 6);
        assert_eq!(plan.len(), 6);
        assert!((plan.get(MealSlot::Supper).unwrap().0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_meal_count_is_empty() {
        assert!(meal_split_for_count(Kcal(2000.0), 0).is_empty());
        assert!(meal_split_for_count(Kcal(2000.0), 2).is_empty());
        assert!(meal_split_for_count(Kcal(2000.0), 7).is_empty());
    }

    #[test]
    fn test_guidelines_cover_split_slots() {
        for meals in MealsPerDay::ALL {
            let guide: Vec<MealSlot> = meals.guidelines().iter().map(|g| g.slot).collect();
            let split: Vec<MealSlot> = meals.percentages().iter().map(|(s, _)| *s).collect();
            assert_eq!(guide, split);
        }
        assert_eq!(MealsPerDay::Three.guidelines()[0].label(), "30 - 35%");
    }

    #[test]
    fn test_plan_serializes_as_list() {
        let plan = meal_split_for_count(Kcal(1000.0), 3);
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"slot\":\"breakfast\""));
    }
}
