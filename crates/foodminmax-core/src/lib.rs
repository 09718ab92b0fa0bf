// Core business logic lives here - the brain of the operation
pub mod app;
pub mod config;
pub mod error;
pub mod gateway;
pub mod importer;
pub mod login;
pub mod metrics;
pub mod models;
pub mod remote;
pub mod session;
pub mod sort;

pub use app::FoodTracker;
pub use config::Config;
pub use error::Error;
pub use gateway::{LoadedData, PersistenceGateway};
pub use importer::{ImportError, Importer, StagedImport};
pub use login::{EmailForm, LoginNavigation, TokenForm, DEFAULT_ERROR_MESSAGE};
pub use metrics::{Band, FoodMetrics};
pub use models::{Constraints, Food, ImportEnvelope};
pub use remote::{NutritionStore, RemoteStore};
pub use session::{SessionApi, SessionBridge, SessionResolver};
pub use sort::{SortField, SortOrder, SortState};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
