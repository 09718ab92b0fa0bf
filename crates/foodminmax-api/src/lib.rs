// HTTP clients for the external backend endpoints
pub mod credits;
pub mod session;
pub mod store;

// Re-export common types
pub use credits::{CreditsClient, CREDITS_FALLBACK};
pub use session::{LoginReply, SessionClient, SessionData, SessionEnvelope, SessionError};
pub use store::{ConstraintsPatch, FoodRecord, StoreClient, StoreError};
