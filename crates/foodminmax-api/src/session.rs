use serde::{Deserialize, Serialize};
use thiserror::Error;

const SESSION_PATH: &str = "/.e/rest/session";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Client for the external session endpoint.
///
/// The same endpoint serves three exchanges: GET resolves the current
/// authenticated user, POST with `user_key` starts the passwordless login,
/// POST with `user_secret` completes it. The server keeps its own cookie
/// state; we only relay the documented JSON bodies.
pub struct SessionClient {
    client: reqwest::Client,
    base_url: String,
}

impl SessionClient {
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

    fn session_url(&self) -> String {
        format!("{}{}", self.base_url, SESSION_PATH)
    }

    /// Fetch the current session document.
    pub async fn fetch_session(&self) -> Result<SessionEnvelope> {
        let response = self.client.get(self.session_url()).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SessionError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let envelope: SessionEnvelope = response.json().await?;
        Ok(envelope)
    }

    /// Start the two-step login with the user's email address.
    pub async fn begin_login(&self, user_key: &str) -> Result<LoginReply> {
        self.post_login(&LoginRequest::Key {
            user_key,
            cookie_ok: true,
        })
        .await
    }

    /// Complete the login with the one-time token.
    pub async fn complete_login(&self, user_secret: &str) -> Result<LoginReply> {
        self.post_login(&LoginRequest::Secret {
            user_secret,
            cookie_ok: true,
        })
        .await
    }

    async fn post_login(&self, body: &LoginRequest<'_>) -> Result<LoginReply> {
        let response = self
            .client
            .post(self.session_url())
            .json(body)
            .send()
            .await?;

        // The endpoint reports outcomes in the JSON body, not the HTTP status
        let reply: LoginReply = response.json().await?;
        Ok(reply)
    }
}

/// Request body for the login POSTs. Untagged so each variant serializes to
/// exactly the flat document the endpoint expects.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum LoginRequest<'a> {
    Key { user_key: &'a str, cookie_ok: bool },
    Secret { user_secret: &'a str, cookie_ok: bool },
}

/// `GET /.e/rest/session` response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Option<SessionData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub user: Option<String>,
}

/// `POST /.e/rest/session` response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginReply {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}
