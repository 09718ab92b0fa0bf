use chrono::Local;

use crate::models::{Constraints, Food};
use crate::remote::NutritionStore;
use crate::{Error, Result};
use foodminmax_api::ConstraintsPatch;

/// What a joint load produced. Either side can be absent independently;
/// partial failure is expected and handled per field.
#[derive(Debug, Default)]
pub struct LoadedData {
    pub foods: Option<Vec<Food>>,
    pub constraints: Option<ConstraintsPatch>,
}

/// Reads and writes the user's remote JSON resources.
///
/// Every operation is a no-op until a user identity has been resolved.
/// Error policy is deliberately asymmetric: a failed foods save is surfaced
/// to the caller, a failed constraints save is only logged, and load
/// failures are swallowed entirely (no remote data is a normal state for a
/// fresh account). Keep the three policies independent.
pub struct PersistenceGateway {
    store: Box<dyn NutritionStore>,
    user_id: Option<String>,
    saving: bool,
    loading: bool,
    last_saved: Option<String>,
}

impl PersistenceGateway {
    pub fn new(store: Box<dyn NutritionStore>) -> Self {
        Self {
            store,
            user_id: None,
            saving: false,
            loading: false,
            last_saved: None,
        }
    }

    pub fn set_user(&mut self, user_id: String) {
        self.user_id = Some(user_id);
    }

    pub fn user(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Human-readable marker of the last successful save or load.
    pub fn last_saved(&self) -> Option<&str> {
        self.last_saved.as_deref()
    }

    /// Persist the full food list. Surfaces failure to the caller.
    pub async fn save_foods(&mut self, foods: &[Food]) -> Result<()> {
        let Some(user) = self.user_id.clone() else {
            return Ok(());
        };

        let records: Vec<_> = foods.iter().map(Food::to_record).collect();

        self.saving = true;
        let result = self.store.put_foods(&user, &records).await;
        self.saving = false;

        match result {
            Ok(()) => {
                self.mark_saved();
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to save foods: {}", e);
                Err(Error::SaveFoodsFailed(e))
            }
        }
    }

    /// Persist the constraints. Failures are logged, never surfaced.
    pub async fn save_constraints(&mut self, constraints: &Constraints) {
        let Some(user) = self.user_id.clone() else {
            return;
        };

        match self
            .store
            .put_constraints(&user, &constraints.to_patch())
            .await
        {
            Ok(()) => self.mark_saved(),
            Err(e) => tracing::error!("Failed to save constraints: {}", e),
        }
    }

    /// Load both remote resources concurrently. A failure in one does not
    /// block the other; any failure at all is treated as "no data".
    pub async fn load(&mut self) -> LoadedData {
        let Some(user) = self.user_id.clone() else {
            return LoadedData::default();
        };

        self.loading = true;
        let (foods_result, constraints_result) = tokio::join!(
            self.store.get_foods(&user),
            self.store.get_constraints(&user)
        );
        self.loading = false;

        let foods = match foods_result {
            Ok(records) => Some(records.into_iter().map(Food::from_record).collect()),
            Err(e) => {
                tracing::warn!("No remote foods loaded: {}", e);
                None
            }
        };

        let constraints = match constraints_result {
            Ok(patch) => Some(patch),
            Err(e) => {
                tracing::warn!("No remote constraints loaded: {}", e);
                None
            }
        };

        if foods.is_some() || constraints.is_some() {
            self.last_saved = Some("Data loaded".to_string());
        }

        LoadedData { foods, constraints }
    }

    fn mark_saved(&mut self) {
        self.last_saved = Some(Local::now().format("%H:%M:%S").to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockNutritionStore;
    use foodminmax_api::{store::StoreError, FoodRecord};

    fn gateway_with(store: MockNutritionStore) -> PersistenceGateway {
        PersistenceGateway::new(Box::new(store))
    }

    fn sample_food() -> Food {
        Food::new("Chicken", 165.0, 74.0, 31.0)
    }

    #[tokio::test]
    async fn test_save_foods_without_identity_makes_no_calls() {
        let mut store = MockNutritionStore::new();
        store.expect_put_foods().times(0);

        let mut gateway = gateway_with(store);
        let result = gateway.save_foods(&[sample_food()]).await;

        assert!(result.is_ok());
        assert!(gateway.last_saved().is_none());
    }

    #[tokio::test]
    async fn test_save_foods_sets_marker_on_success() {
        let mut store = MockNutritionStore::new();
        store
            .expect_put_foods()
            .times(1)
            .returning(|_, _| Ok(()));

        let mut gateway = gateway_with(store);
        gateway.set_user("alice".to_string());

        gateway.save_foods(&[sample_food()]).await.unwrap();

        assert!(!gateway.is_saving());
        assert!(gateway.last_saved().is_some());
    }

    #[tokio::test]
    async fn test_save_foods_failure_is_surfaced() {
        let mut store = MockNutritionStore::new();
        store.expect_put_foods().returning(|_, _| {
            Err(StoreError::RequestFailed("Status 500: boom".to_string()))
        });

        let mut gateway = gateway_with(store);
        gateway.set_user("alice".to_string());

        let result = gateway.save_foods(&[sample_food()]).await;

        assert!(matches!(result, Err(Error::SaveFoodsFailed(_))));
        assert!(!gateway.is_saving());
        assert!(gateway.last_saved().is_none());
    }

    #[tokio::test]
    async fn test_save_constraints_failure_is_swallowed() {
        let mut store = MockNutritionStore::new();
        store.expect_put_constraints().returning(|_, _| {
            Err(StoreError::RequestFailed("Status 500: boom".to_string()))
        });

        let mut gateway = gateway_with(store);
        gateway.set_user("alice".to_string());

        // Logged only, never an error
        gateway.save_constraints(&Constraints::default()).await;
        assert!(gateway.last_saved().is_none());
    }

    #[tokio::test]
    async fn test_load_partial_failure_keeps_other_side() {
        let mut store = MockNutritionStore::new();
        store
            .expect_get_foods()
            .returning(|_| Err(StoreError::NotFound("foods.json".to_string())));
        store.expect_get_constraints().returning(|_| {
            Ok(foodminmax_api::ConstraintsPatch {
                max_calories: Some(1800.0),
                max_sodium: None,
                min_protein: None,
            })
        });

        let mut gateway = gateway_with(store);
        gateway.set_user("alice".to_string());

        let loaded = gateway.load().await;

        assert!(loaded.foods.is_none());
        assert_eq!(loaded.constraints.unwrap().max_calories, Some(1800.0));
        assert_eq!(gateway.last_saved(), Some("Data loaded"));
    }

    #[tokio::test]
    async fn test_load_backfills_missing_ids() {
        let mut store = MockNutritionStore::new();
        store.expect_get_foods().returning(|_| {
            Ok(vec![FoodRecord {
                id: None,
                name: "Rice".to_string(),
                calories: 200.0,
                sodium: 50.0,
                protein: 5.0,
            }])
        });
        store
            .expect_get_constraints()
            .returning(|_| Err(StoreError::NotFound("constraints.json".to_string())));

        let mut gateway = gateway_with(store);
        gateway.set_user("alice".to_string());

        let loaded = gateway.load().await;
        let foods = loaded.foods.unwrap();

        assert_eq!(foods.len(), 1);
        assert!(!foods[0].id.is_empty());
    }

    #[tokio::test]
    async fn test_load_without_identity_is_empty() {
        let mut store = MockNutritionStore::new();
        store.expect_get_foods().times(0);
        store.expect_get_constraints().times(0);

        let mut gateway = gateway_with(store);
        let loaded = gateway.load().await;

        assert!(loaded.foods.is_none());
        assert!(loaded.constraints.is_none());
    }
}
