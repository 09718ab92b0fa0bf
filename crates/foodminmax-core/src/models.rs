use chrono::{DateTime, Utc};
use foodminmax_api::{ConstraintsPatch, FoodRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tracked food - the star of the show
///
/// Mutated only by full replacement: edit-in-place by index or bulk replace
/// on import. The id is generated client-side and is stable for the lifetime
/// of the entry; anything loaded or imported without one gets a fresh id
/// before it is persisted or exported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Food {
    pub id: String,
    pub name: String,
    pub calories: f64,
    pub sodium: f64,
    pub protein: f64,
}

impl Food {
    pub fn new(name: impl Into<String>, calories: f64, sodium: f64, protein: f64) -> Self {
        Self {
            id: new_food_id(),
            name: name.into(),
            calories,
            sodium,
            protein,
        }
    }

    /// Lift a wire record into the model, backfilling a missing id.
    pub fn from_record(record: FoodRecord) -> Self {
        Self {
            id: record
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(new_food_id),
            name: record.name,
            calories: record.calories,
            sodium: record.sodium,
            protein: record.protein,
        }
    }

    pub fn to_record(&self) -> FoodRecord {
        FoodRecord {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            calories: self.calories,
            sodium: self.sodium,
            protein: self.protein,
        }
    }
}

/// Collision resistance is all the contract asks for; uniqueness only has to
/// hold within one resident list.
pub fn new_food_id() -> String {
    Uuid::new_v4().to_string()
}

/// The user's nutrition targets. Singleton per user.
///
/// Serialized with the original camelCase field names so documents written
/// by older clients keep loading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub max_calories: f64,
    pub max_sodium: f64,
    pub min_protein: f64,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_calories: 2000.0,
            max_sodium: 2300.0,
            min_protein: 50.0,
        }
    }
}

impl Constraints {
    /// Shallow field-by-field merge: patch values win, current values fill
    /// the gaps. Patch values that would break the positive-fields invariant
    /// are discarded the same way missing ones are; remote and imported
    /// documents are not trusted to keep the percentages finite.
    pub fn merged(self, patch: &ConstraintsPatch) -> Self {
        fn positive(value: Option<f64>) -> Option<f64> {
            value.filter(|v| v.is_finite() && *v > 0.0)
        }

        Self {
            max_calories: positive(patch.max_calories).unwrap_or(self.max_calories),
            max_sodium: positive(patch.max_sodium).unwrap_or(self.max_sodium),
            min_protein: positive(patch.min_protein).unwrap_or(self.min_protein),
        }
    }

    pub fn to_patch(self) -> ConstraintsPatch {
        ConstraintsPatch {
            max_calories: Some(self.max_calories),
            max_sodium: Some(self.max_sodium),
            min_protein: Some(self.min_protein),
        }
    }

    /// Constraints fields must stay positive; a zero limit would poison every
    /// derived percentage.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_calories <= 0.0 {
            return Err("maxCalories must be positive".to_string());
        }
        if self.max_sodium <= 0.0 {
            return Err("maxSodium must be positive".to_string());
        }
        if self.min_protein <= 0.0 {
            return Err("minProtein must be positive".to_string());
        }
        Ok(())
    }
}

/// The JSON document shape produced by export and consumed by import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEnvelope {
    pub foods: Vec<FoodRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<ConstraintsPatch>,
    /// Always written on export; tolerated as absent on import, since only
    /// the `foods` array is load-bearing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constraints() {
        let c = Constraints::default();
        assert_eq!(c.max_calories, 2000.0);
        assert_eq!(c.max_sodium, 2300.0);
        assert_eq!(c.min_protein, 50.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_constraints_merge_fills_gaps_from_current() {
        let merged = Constraints::default().merged(&ConstraintsPatch {
            max_calories: Some(1800.0),
            max_sodium: None,
            min_protein: Some(60.0),
        });
        assert_eq!(merged.max_calories, 1800.0);
        assert_eq!(merged.max_sodium, 2300.0);
        assert_eq!(merged.min_protein, 60.0);
    }

    #[test]
    fn test_constraints_merge_discards_non_positive_values() {
        let merged = Constraints::default().merged(&ConstraintsPatch {
            max_calories: Some(0.0),
            max_sodium: Some(-5.0),
            min_protein: Some(60.0),
        });

        // A zero or negative limit would poison every derived percentage
        assert_eq!(merged.max_calories, 2000.0);
        assert_eq!(merged.max_sodium, 2300.0);
        assert_eq!(merged.min_protein, 60.0);
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn test_constraints_camel_case_round_trip() {
        let json = serde_json::to_string(&Constraints::default()).unwrap();
        assert!(json.contains("maxCalories"));
        assert!(json.contains("maxSodium"));
        assert!(json.contains("minProtein"));

        let back: Constraints = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Constraints::default());
    }

    #[test]
    fn test_constraints_validation() {
        let mut c = Constraints::default();
        c.max_sodium = 0.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_food_from_record_backfills_id() {
        let food = Food::from_record(FoodRecord {
            id: None,
            name: "Chicken".to_string(),
            calories: 165.0,
            sodium: 74.0,
            protein: 31.0,
        });
        assert!(!food.id.is_empty());

        let kept = Food::from_record(FoodRecord {
            id: Some("abc".to_string()),
            name: "Rice".to_string(),
            calories: 200.0,
            sodium: 50.0,
            protein: 5.0,
        });
        assert_eq!(kept.id, "abc");
    }

    #[test]
    fn test_new_food_ids_are_unique() {
        let a = Food::new("A", 1.0, 1.0, 1.0);
        let b = Food::new("A", 1.0, 1.0, 1.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_import_envelope_field_names() {
        let envelope = ImportEnvelope {
            foods: vec![],
            constraints: None,
            exported_at: Some("2025-01-15T12:00:00Z".parse().unwrap()),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains("exportedAt"));
        assert!(!json.contains("constraints"));
    }
}
