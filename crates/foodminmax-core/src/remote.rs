// Bridge between the gateway and the HTTP store client
use async_trait::async_trait;
use foodminmax_api::{store, ConstraintsPatch, FoodRecord, StoreClient};

/// Trait for the remote data store - makes testing easier and keeps things
/// flexible
///
/// The persistence gateway talks to this instead of a concrete HTTP client,
/// so tests can drop in a mock and assert on exactly which calls happen.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NutritionStore: Send + Sync {
    async fn get_foods(&self, user: &str) -> store::Result<Vec<FoodRecord>>;
    async fn put_foods(&self, user: &str, foods: &[FoodRecord]) -> store::Result<()>;
    async fn get_constraints(&self, user: &str) -> store::Result<ConstraintsPatch>;
    async fn put_constraints(&self, user: &str, constraints: &ConstraintsPatch)
        -> store::Result<()>;
}

/// Wrapper around StoreClient that implements NutritionStore
pub struct RemoteStore {
    client: StoreClient,
}

impl RemoteStore {
    pub fn new(base_url: String) -> Self {
        Self {
            client: StoreClient::new(base_url),
        }
    }
}

#[async_trait]
impl NutritionStore for RemoteStore {
    async fn get_foods(&self, user: &str) -> store::Result<Vec<FoodRecord>> {
        self.client.get_foods(user).await
    }

    async fn put_foods(&self, user: &str, foods: &[FoodRecord]) -> store::Result<()> {
        self.client.put_foods(user, foods).await
    }

    async fn get_constraints(&self, user: &str) -> store::Result<ConstraintsPatch> {
        self.client.get_constraints(user).await
    }

    async fn put_constraints(
        &self,
        user: &str,
        constraints: &ConstraintsPatch,
    ) -> store::Result<()> {
        self.client.put_constraints(user, constraints).await
    }
}
