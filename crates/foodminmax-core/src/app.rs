use std::path::PathBuf;

use crate::gateway::PersistenceGateway;
use crate::importer::{Importer, StagedImport};
use crate::models::{Constraints, Food};
use crate::session::{SessionApi, SessionResolver};
use crate::sort::{sorted_view, SortField, SortState};
use crate::{Error, Result};

/// The application state and its controller - no ambient globals
///
/// Owns the resident food list, the constraints singleton, the sort state,
/// and the persistence gateway. Every mutating operation validates first,
/// applies in full or not at all, then persists through the gateway.
pub struct FoodTracker {
    foods: Vec<Food>,
    constraints: Constraints,
    sort: SortState,
    gateway: PersistenceGateway,
}

impl FoodTracker {
    pub fn new(gateway: PersistenceGateway) -> Self {
        Self {
            foods: Vec::new(),
            constraints: Constraints::default(),
            sort: SortState::default(),
            gateway,
        }
    }

    /// Resolve the session user, then load both remote resources. Without a
    /// resolved identity this quietly stays on defaults.
    pub async fn init(&mut self, api: &dyn SessionApi) {
        if let Some(user) = SessionResolver::resolve(api).await {
            self.gateway.set_user(user);
        }

        let loaded = self.gateway.load().await;

        if let Some(foods) = loaded.foods {
            self.foods = foods;
        }
        if let Some(patch) = loaded.constraints {
            self.constraints = self.constraints.merged(&patch);
        }
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    /// The derived, recomputed-on-read ordering. Pure; the resident list is
    /// untouched.
    pub fn sorted_foods(&self) -> Vec<Food> {
        sorted_view(&self.foods, &self.constraints, self.sort)
    }

    pub fn sort_by(&mut self, field: SortField) {
        self.sort.select(field);
    }

    pub async fn add_food(
        &mut self,
        name: &str,
        calories: f64,
        sodium: f64,
        protein: f64,
    ) -> Result<()> {
        validate_food_input(name, calories, sodium, protein)?;

        self.foods.push(Food::new(name.trim(), calories, sodium, protein));
        self.gateway.save_foods(&self.foods).await
    }

    /// Full replacement by index; the entry keeps its id.
    pub async fn edit_food(
        &mut self,
        index: usize,
        name: &str,
        calories: f64,
        sodium: f64,
        protein: f64,
    ) -> Result<()> {
        validate_food_input(name, calories, sodium, protein)?;

        let food = self.foods.get_mut(index).ok_or(Error::NoSuchFood(index))?;
        *food = Food {
            id: food.id.clone(),
            name: name.trim().to_string(),
            calories,
            sodium,
            protein,
        };

        self.gateway.save_foods(&self.foods).await
    }

    pub async fn remove_food(&mut self, index: usize) -> Result<()> {
        if index >= self.foods.len() {
            return Err(Error::NoSuchFood(index));
        }

        self.foods.remove(index);
        self.gateway.save_foods(&self.foods).await
    }

    pub async fn set_constraints(&mut self, constraints: Constraints) -> Result<()> {
        constraints.validate().map_err(Error::InvalidInput)?;

        self.constraints = constraints;
        self.gateway.save_constraints(&self.constraints).await;
        Ok(())
    }

    /// Write the export envelope; returns the path written.
    pub fn export(&self, path: Option<PathBuf>) -> Result<PathBuf> {
        let path = path.unwrap_or_else(|| PathBuf::from(Importer::default_file_name()));
        Importer::export_to_file(&self.foods, &self.constraints, &path)?;
        Ok(path)
    }

    /// Stage an import file for preview. Resident state is untouched until
    /// `confirm_import`; dropping the staged value cancels.
    pub fn stage_import(&self, path: &std::path::Path) -> Result<StagedImport> {
        Importer::stage_file(path)
    }

    /// Apply a confirmed import: backfill ids, replace the food list
    /// wholesale, merge constraints if present, persist both.
    pub async fn confirm_import(&mut self, staged: StagedImport) -> Result<String> {
        let message = staged.success_message();

        self.foods = staged
            .envelope
            .foods
            .into_iter()
            .map(Food::from_record)
            .collect();

        if let Some(patch) = staged.envelope.constraints {
            self.constraints = self.constraints.merged(&patch);
        }

        self.gateway.save_constraints(&self.constraints).await;
        self.gateway.save_foods(&self.foods).await?;

        Ok(message)
    }
}

/// User-input validation gate: a rejected input blocks the mutation
/// entirely.
fn validate_food_input(name: &str, calories: f64, sodium: f64, protein: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput("Food name must not be empty".into()));
    }

    for (label, value) in [
        ("calories", calories),
        ("sodium", sodium),
        ("protein", protein),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidInput(format!(
                "{} must be a non-negative number",
                label
            )));
        }
    }

    Ok(())
}
