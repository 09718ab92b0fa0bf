// Best-effort loader for the static credits fragment

const CREDITS_PATH: &str = "/credits.html";

pub const CREDITS_FALLBACK: &str = "Unable to load credits.";

/// Fetches the credits page, falling back to a static message on any
/// failure. Credits are decoration; nothing should ever break over them.
pub struct CreditsClient {
    client: reqwest::Client,
    base_url: String,
}

impl CreditsClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn fetch(&self) -> String {
        let url = format!("{}{}", self.base_url, CREDITS_PATH);

        let response = match self.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!("Credits request returned status {}", r.status());
                return CREDITS_FALLBACK.to_string();
            }
            Err(e) => {
                tracing::warn!("Credits request failed: {}", e);
                return CREDITS_FALLBACK.to_string();
            }
        };

        match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Credits body unreadable: {}", e);
                CREDITS_FALLBACK.to_string()
            }
        }
    }
}
