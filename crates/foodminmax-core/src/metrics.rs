use serde::{Deserialize, Serialize};

use crate::models::{Constraints, Food};

/// Derived metrics for a single food under the current constraints
///
/// Percentages are rounded half-up before the ratios divide them. That
/// two-stage rounding matches the numbers users have always seen, and the
/// band thresholds were tuned against it, so it stays: never switch this to
/// dividing the raw values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodMetrics {
    /// Percent of the minimum protein target (more is better)
    pub protein_percent: i64,
    /// Percent of the calorie budget (less is better)
    pub calorie_percent: i64,
    /// Percent of the sodium budget (less is better)
    pub sodium_percent: i64,
    /// Protein percent per calorie percent, 2-decimal canonical form
    pub protein_vs_calorie: String,
    /// Protein percent per sodium percent, 2-decimal canonical form
    pub protein_vs_sodium: String,
}

impl FoodMetrics {
    pub fn compute(food: &Food, constraints: &Constraints) -> Self {
        let protein_percent = percent_of(food.protein, constraints.min_protein);
        let calorie_percent = percent_of(food.calories, constraints.max_calories);
        let sodium_percent = percent_of(food.sodium, constraints.max_sodium);

        Self {
            protein_percent,
            calorie_percent,
            sodium_percent,
            protein_vs_calorie: format_ratio(protein_percent, calorie_percent),
            protein_vs_sodium: format_ratio(protein_percent, sodium_percent),
        }
    }

    /// Numeric form of the protein/calorie ratio, as displayed (2 decimals).
    pub fn protein_vs_calorie_value(&self) -> f64 {
        ratio_value(&self.protein_vs_calorie)
    }

    /// Numeric form of the protein/sodium ratio, as displayed (2 decimals).
    pub fn protein_vs_sodium_value(&self) -> f64 {
        ratio_value(&self.protein_vs_sodium)
    }

    pub fn protein_band(&self) -> Band {
        Band::for_protein_percent(self.protein_percent)
    }

    pub fn calorie_band(&self) -> Band {
        Band::for_calorie_percent(self.calorie_percent)
    }

    pub fn sodium_band(&self) -> Band {
        Band::for_sodium_percent(self.sodium_percent)
    }

    pub fn protein_vs_calorie_band(&self) -> Band {
        Band::for_protein_vs_calorie(self.protein_vs_calorie_value())
    }

    pub fn protein_vs_sodium_band(&self) -> Band {
        Band::for_protein_vs_sodium(self.protein_vs_sodium_value())
    }
}

/// Raw value as a rounded percentage of its constraint.
fn percent_of(value: f64, limit: f64) -> i64 {
    (value / limit * 100.0).round() as i64
}

/// Ratio of two already-rounded percentages. A zero denominator degrades to
/// zero rather than failing.
fn format_ratio(numerator_percent: i64, denominator_percent: i64) -> String {
    let ratio = if denominator_percent > 0 {
        numerator_percent as f64 / denominator_percent as f64
    } else {
        0.0
    };
    format!("{:.2}", ratio)
}

fn ratio_value(canonical: &str) -> f64 {
    // Parsing our own "{:.2}" output cannot fail
    canonical.parse().unwrap_or(0.0)
}

/// Qualitative tier for a metric or ratio. Ties at a threshold take the
/// higher band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Band {
    Good,
    Warning,
    Poor,
}

impl Band {
    pub fn for_protein_percent(percent: i64) -> Self {
        match percent {
            p if p >= 25 => Band::Good,
            p if p >= 15 => Band::Warning,
            _ => Band::Poor,
        }
    }

    pub fn for_calorie_percent(percent: i64) -> Self {
        match percent {
            p if p <= 10 => Band::Good,
            p if p <= 20 => Band::Warning,
            _ => Band::Poor,
        }
    }

    pub fn for_sodium_percent(percent: i64) -> Self {
        match percent {
            p if p <= 5 => Band::Good,
            p if p <= 15 => Band::Warning,
            _ => Band::Poor,
        }
    }

    pub fn for_protein_vs_calorie(ratio: f64) -> Self {
        if ratio >= 2.0 {
            Band::Good
        } else if ratio >= 1.0 {
            Band::Warning
        } else {
            Band::Poor
        }
    }

    pub fn for_protein_vs_sodium(ratio: f64) -> Self {
        if ratio >= 3.0 {
            Band::Good
        } else if ratio >= 1.0 {
            Band::Warning
        } else {
            Band::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Band::Good => "good",
            Band::Warning => "warning",
            Band::Poor => "poor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(name: &str, calories: f64, sodium: f64, protein: f64) -> Food {
        Food::new(name, calories, sodium, protein)
    }

    #[test]
    fn test_percentages_under_default_constraints() {
        let c = Constraints::default();
        let m = FoodMetrics::compute(&food("Chicken", 200.0, 100.0, 25.0), &c);

        assert_eq!(m.protein_percent, 50); // 25/50
        assert_eq!(m.calorie_percent, 10); // 200/2000
        assert_eq!(m.sodium_percent, 4); // 100/2300 -> 4.3 -> 4
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        let c = Constraints {
            max_calories: 200.0,
            max_sodium: 2300.0,
            min_protein: 50.0,
        };
        // 25/200 = 12.5% -> 13
        let m = FoodMetrics::compute(&food("x", 25.0, 0.0, 0.0), &c);
        assert_eq!(m.calorie_percent, 13);
    }

    #[test]
    fn test_ratios_divide_rounded_percentages() {
        let c = Constraints::default();
        let m = FoodMetrics::compute(&food("Chicken", 200.0, 100.0, 25.0), &c);

        // 50 / 10, not 25/200 over raw constraint math
        assert_eq!(m.protein_vs_calorie, "5.00");
        assert_eq!(m.protein_vs_calorie_value(), 5.0);
        assert_eq!(m.protein_vs_calorie_band(), Band::Good);

        // 50 / 4
        assert_eq!(m.protein_vs_sodium, "12.50");
    }

    #[test]
    fn test_zero_denominator_ratio_is_zero() {
        let c = Constraints::default();
        let m = FoodMetrics::compute(&food("Water", 0.0, 0.0, 30.0), &c);

        assert_eq!(m.protein_vs_calorie, "0.00");
        assert_eq!(m.protein_vs_sodium, "0.00");
        assert_eq!(m.protein_vs_calorie_value(), 0.0);
    }

    #[test]
    fn test_protein_band_thresholds() {
        assert_eq!(Band::for_protein_percent(25), Band::Good);
        assert_eq!(Band::for_protein_percent(24), Band::Warning);
        assert_eq!(Band::for_protein_percent(15), Band::Warning);
        assert_eq!(Band::for_protein_percent(14), Band::Poor);
        assert_eq!(Band::for_protein_percent(0), Band::Poor);
    }

    #[test]
    fn test_calorie_band_thresholds() {
        assert_eq!(Band::for_calorie_percent(10), Band::Good);
        assert_eq!(Band::for_calorie_percent(11), Band::Warning);
        assert_eq!(Band::for_calorie_percent(20), Band::Warning);
        assert_eq!(Band::for_calorie_percent(21), Band::Poor);
    }

    #[test]
    fn test_sodium_band_thresholds() {
        assert_eq!(Band::for_sodium_percent(5), Band::Good);
        assert_eq!(Band::for_sodium_percent(6), Band::Warning);
        assert_eq!(Band::for_sodium_percent(15), Band::Warning);
        assert_eq!(Band::for_sodium_percent(16), Band::Poor);
    }

    #[test]
    fn test_ratio_band_thresholds() {
        assert_eq!(Band::for_protein_vs_calorie(2.0), Band::Good);
        assert_eq!(Band::for_protein_vs_calorie(1.99), Band::Warning);
        assert_eq!(Band::for_protein_vs_calorie(1.0), Band::Warning);
        assert_eq!(Band::for_protein_vs_calorie(0.99), Band::Poor);

        assert_eq!(Band::for_protein_vs_sodium(3.0), Band::Good);
        assert_eq!(Band::for_protein_vs_sodium(2.99), Band::Warning);
        assert_eq!(Band::for_protein_vs_sodium(1.0), Band::Warning);
        assert_eq!(Band::for_protein_vs_sodium(0.5), Band::Poor);
    }

    #[test]
    fn test_bands_partition_every_value() {
        for p in -5..200 {
            // Each classifier always lands in exactly one band
            let _ = Band::for_protein_percent(p);
            let _ = Band::for_calorie_percent(p);
            let _ = Band::for_sodium_percent(p);
        }
    }
}
