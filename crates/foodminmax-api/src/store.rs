use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    RequestFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unexpected document shape: {0}")]
    UnexpectedShape(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Client for the per-user JSON resources.
///
/// The backend is a dumb document store: `GET` returns whatever was last
/// `PUT`, so both documents are validated for shape here before anything
/// downstream trusts them.
pub struct StoreClient {
    client: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("FoodMinMax/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }

    fn foods_url(&self, user: &str) -> String {
        format!("{}/data/{}/foods.json", self.base_url, user)
    }

    fn constraints_url(&self, user: &str) -> String {
        format!("{}/data/{}/constraints.json", self.base_url, user)
    }

    /// Fetch the user's food list. The document must be a JSON array.
    pub async fn get_foods(&self, user: &str) -> Result<Vec<FoodRecord>> {
        let value = self.get_json(&self.foods_url(user)).await?;

        if !value.is_array() {
            return Err(StoreError::UnexpectedShape(
                "foods.json is not an array".to_string(),
            ));
        }

        let foods: Vec<FoodRecord> = serde_json::from_value(value)?;
        Ok(foods)
    }

    /// Replace the user's food list wholesale.
    pub async fn put_foods(&self, user: &str, foods: &[FoodRecord]) -> Result<()> {
        self.put_json(&self.foods_url(user), &serde_json::to_value(foods)?)
            .await
    }

    /// Fetch the user's constraints. The document must be a JSON object
    /// (null and arrays are rejected); fields may be missing.
    pub async fn get_constraints(&self, user: &str) -> Result<ConstraintsPatch> {
        let value = self.get_json(&self.constraints_url(user)).await?;

        if !value.is_object() {
            return Err(StoreError::UnexpectedShape(
                "constraints.json is not an object".to_string(),
            ));
        }

        let constraints: ConstraintsPatch = serde_json::from_value(value)?;
        Ok(constraints)
    }

    /// Replace the user's constraints wholesale.
    pub async fn put_constraints(&self, user: &str, constraints: &ConstraintsPatch) -> Result<()> {
        self.put_json(
            &self.constraints_url(user),
            &serde_json::to_value(constraints)?,
        )
        .await
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.client.get(url).send().await?;

        if response.status() == 404 {
            return Err(StoreError::NotFound(url.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let value: serde_json::Value = response.json().await?;
        Ok(value)
    }

    async fn put_json(&self, url: &str, body: &serde_json::Value) -> Result<()> {
        let response = self.client.put(url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(StoreError::RequestFailed(format!(
                "Status {}: {}",
                status, text
            )));
        }

        Ok(())
    }
}

/// Wire form of a food entry. Entries written before ids existed have no
/// `id` field, so it stays optional here and gets backfilled downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub calories: f64,
    pub sodium: f64,
    pub protein: f64,
}

/// Wire form of the constraints document. All fields optional so a partial
/// remote document merges over local defaults instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sodium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_protein: Option<f64>,
}
