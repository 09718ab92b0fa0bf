use thiserror::Error;

/// All the ways things can go wrong in FoodMinMax
///
/// We use thiserror here because it generates the boilerplate for us.
/// Life's too short to manually implement Display and Error traits.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Session request failed: {0}")]
    SessionError(String),

    #[error("Failed to save foods. Please try again.")]
    SaveFoodsFailed(#[source] foodminmax_api::StoreError),

    #[error("Store operation failed: {0}")]
    StoreError(#[from] foodminmax_api::StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No food at index {0}")]
    NoSuchFood(usize),

    #[error(transparent)]
    ImportError(#[from] crate::importer::ImportError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
