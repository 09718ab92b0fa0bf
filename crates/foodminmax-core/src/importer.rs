use chrono::{DateTime, Local, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::models::{Constraints, Food, ImportEnvelope};
use crate::Result;
use foodminmax_api::ConstraintsPatch;

/// Each import rejection mode carries its own user-facing message; none of
/// them touches resident state.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Please select a JSON file.")]
    NotJsonFile,

    #[error("Error reading import file. Please ensure it is a valid JSON file.")]
    UnreadableJson(#[source] serde_json::Error),

    #[error("Invalid import file format. The file must contain a 'foods' array.")]
    MissingFoods,
}

/// A validated import, staged for preview. Nothing resident changes until
/// the user confirms.
#[derive(Debug, Clone)]
pub struct StagedImport {
    pub envelope: ImportEnvelope,
}

impl StagedImport {
    pub fn foods_count(&self) -> usize {
        self.envelope.foods.len()
    }

    pub fn exported_at(&self) -> Option<DateTime<Utc>> {
        self.envelope.exported_at
    }

    pub fn has_constraints(&self) -> bool {
        self.envelope.constraints.is_some()
    }

    pub fn constraints(&self) -> Option<&ConstraintsPatch> {
        self.envelope.constraints.as_ref()
    }

    /// Confirmation prompt; the wording shifts when constraints ride along.
    pub fn confirm_message(&self) -> String {
        if self.has_constraints() {
            "Are you sure you want to import this data? This will replace all your current \
             foods and constraints. This action cannot be undone."
                .to_string()
        } else {
            "Are you sure you want to import this data? This will replace all your current \
             foods. This action cannot be undone."
                .to_string()
        }
    }

    /// Summary reported after a confirmed import.
    pub fn success_message(&self) -> String {
        format!("Successfully imported {} foods.", self.foods_count())
    }
}

/// Import/export of the full application state as a JSON envelope.
pub struct Importer;

impl Importer {
    /// Validate an uploaded file into a staged import. Rejects on extension,
    /// parse failure, or a missing/wrong-shaped `foods` key, in that order.
    pub fn stage(file_name: &str, contents: &str) -> std::result::Result<StagedImport, ImportError> {
        if !file_name.to_lowercase().ends_with(".json") {
            return Err(ImportError::NotJsonFile);
        }

        let value: serde_json::Value =
            serde_json::from_str(contents).map_err(ImportError::UnreadableJson)?;

        if !value.get("foods").map(|f| f.is_array()).unwrap_or(false) {
            return Err(ImportError::MissingFoods);
        }

        let envelope: ImportEnvelope =
            serde_json::from_value(value).map_err(ImportError::UnreadableJson)?;

        Ok(StagedImport { envelope })
    }

    pub fn stage_file<P: AsRef<Path>>(path: P) -> Result<StagedImport> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        // The extension check must run before any read
        if !file_name.to_lowercase().ends_with(".json") {
            return Err(ImportError::NotJsonFile.into());
        }

        let contents = std::fs::read_to_string(path)?;
        Ok(Self::stage(file_name, &contents)?)
    }

    /// Build the export envelope, stamped with the current time.
    pub fn export_envelope(foods: &[Food], constraints: &Constraints) -> ImportEnvelope {
        ImportEnvelope {
            foods: foods.iter().map(Food::to_record).collect(),
            constraints: Some(constraints.to_patch()),
            exported_at: Some(Utc::now()),
        }
    }

    /// Pretty-printed JSON document for the envelope.
    pub fn to_json(envelope: &ImportEnvelope) -> Result<String> {
        Ok(serde_json::to_string_pretty(envelope)?)
    }

    /// Default export file name, dated with the local day.
    pub fn default_file_name() -> String {
        format!("foodminmax-export-{}.json", Local::now().format("%Y-%m-%d"))
    }

    /// Write the envelope to disk. The handle is flushed and dropped as soon
    /// as the write completes.
    pub fn export_to_file<P: AsRef<Path>>(
        foods: &[Food],
        constraints: &Constraints,
        path: P,
    ) -> Result<()> {
        let envelope = Self::export_envelope(foods, constraints);
        let content = Self::to_json(&envelope)?;

        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SecondsFormat;

    fn valid_payload() -> String {
        serde_json::json!({
            "foods": [
                {"id": "1", "name": "Chicken", "protein": 30, "calories": 165, "sodium": 74},
                {"id": "2", "name": "Rice", "protein": 5, "calories": 200, "sodium": 50},
            ],
            "exportedAt": "2025-01-15T12:00:00.000Z",
        })
        .to_string()
    }

    #[test]
    fn test_rejects_non_json_extension() {
        let result = Importer::stage("test.txt", "{}");
        assert!(matches!(result, Err(ImportError::NotJsonFile)));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Please select a JSON file."
        );
    }

    #[test]
    fn test_accepts_uppercase_extension() {
        assert!(Importer::stage("EXPORT.JSON", &valid_payload()).is_ok());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = Importer::stage("test.json", "invalid json {{{");
        assert_eq!(
            result.unwrap_err().to_string(),
            "Error reading import file. Please ensure it is a valid JSON file."
        );
    }

    #[test]
    fn test_rejects_missing_foods_key() {
        let result = Importer::stage("test.json", r#"{"invalid":"data"}"#);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid import file format. The file must contain a 'foods' array."
        );
    }

    #[test]
    fn test_rejects_non_array_foods() {
        let result = Importer::stage("test.json", r#"{"foods":{"name":"Chicken"}}"#);
        assert!(matches!(result, Err(ImportError::MissingFoods)));
    }

    #[test]
    fn test_stages_preview_without_constraints() {
        let staged = Importer::stage("test.json", &valid_payload()).unwrap();

        assert_eq!(staged.foods_count(), 2);
        assert!(!staged.has_constraints());
        assert_eq!(
            staged
                .exported_at()
                .unwrap()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            "2025-01-15T12:00:00.000Z"
        );
        assert!(staged.confirm_message().contains("all your current foods."));
    }

    #[test]
    fn test_stages_preview_with_constraints() {
        let payload = serde_json::json!({
            "foods": [],
            "constraints": {"maxCalories": 1800, "maxSodium": 2000, "minProtein": 60},
            "exportedAt": "2025-01-15T12:00:00.000Z",
        })
        .to_string();

        let staged = Importer::stage("test.json", &payload).unwrap();

        assert!(staged.has_constraints());
        assert_eq!(staged.constraints().unwrap().max_calories, Some(1800.0));
        assert!(staged
            .confirm_message()
            .contains("foods and constraints."));
    }

    #[test]
    fn test_success_message_counts_foods() {
        let staged = Importer::stage("test.json", &valid_payload()).unwrap();
        assert_eq!(staged.success_message(), "Successfully imported 2 foods.");
    }

    #[test]
    fn test_default_file_name_shape() {
        let name = Importer::default_file_name();
        assert!(name.starts_with("foodminmax-export-"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_export_round_trips_through_stage() {
        let foods = vec![
            Food::new("Chicken", 165.0, 74.0, 31.0),
            Food::new("Rice", 200.0, 50.0, 5.0),
        ];
        let constraints = Constraints::default();

        let envelope = Importer::export_envelope(&foods, &constraints);
        let json = Importer::to_json(&envelope).unwrap();

        let staged = Importer::stage("export.json", &json).unwrap();
        let restored: Vec<Food> = staged
            .envelope
            .foods
            .into_iter()
            .map(Food::from_record)
            .collect();

        // Ids survive the round trip
        assert_eq!(restored, foods);
    }
}
