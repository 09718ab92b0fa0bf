use std::cmp::Ordering;
use std::str::FromStr;

use crate::metrics::FoodMetrics;
use crate::models::{Constraints, Food};

/// Supported sort keys for the food list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    ProteinPercent,
    CaloriePercent,
    SodiumPercent,
    ProteinVsCalorie,
    ProteinVsSodium,
}

impl SortField {
    /// Direction a freshly selected key starts in. Numeric metrics default
    /// to descending so the best foods sort first.
    pub fn default_order(&self) -> SortOrder {
        match self {
            SortField::Name => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "proteinPercent" => Ok(SortField::ProteinPercent),
            "caloriePercent" => Ok(SortField::CaloriePercent),
            "sodiumPercent" => Ok(SortField::SodiumPercent),
            "proteinVsCalorie" => Ok(SortField::ProteinVsCalorie),
            "proteinVsSodium" => Ok(SortField::ProteinVsSodium),
            _ => Err(format!("Unsupported sort field: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Active sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::ProteinVsCalorie,
            order: SortOrder::Desc,
        }
    }
}

impl SortState {
    /// Toggle contract: re-selecting the active key flips the direction,
    /// selecting a new key resets to that key's default direction.
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.order = self.order.flipped();
        } else {
            self.field = field;
            self.order = field.default_order();
        }
    }
}

/// Recomputed-on-read ordered view over the food list. Never mutates the
/// underlying list; the sort is stable so equal keys keep insertion order.
pub fn sorted_view(foods: &[Food], constraints: &Constraints, state: SortState) -> Vec<Food> {
    let mut view: Vec<Food> = foods.to_vec();

    view.sort_by(|a, b| {
        let ordering = compare(a, b, constraints, state.field);
        match state.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    view
}

fn compare(a: &Food, b: &Food, constraints: &Constraints, field: SortField) -> Ordering {
    let ma = FoodMetrics::compute(a, constraints);
    let mb = FoodMetrics::compute(b, constraints);

    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::ProteinPercent => ma.protein_percent.cmp(&mb.protein_percent),
        SortField::CaloriePercent => ma.calorie_percent.cmp(&mb.calorie_percent),
        SortField::SodiumPercent => ma.sodium_percent.cmp(&mb.sodium_percent),
        SortField::ProteinVsCalorie => total_cmp(
            ma.protein_vs_calorie_value(),
            mb.protein_vs_calorie_value(),
        ),
        SortField::ProteinVsSodium => {
            total_cmp(ma.protein_vs_sodium_value(), mb.protein_vs_sodium_value())
        }
    }
}

// Ratios are finite by construction, so partial_cmp never actually fails
fn total_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
