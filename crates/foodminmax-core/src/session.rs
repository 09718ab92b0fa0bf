// Session endpoint seam plus the identity resolver
use async_trait::async_trait;
use foodminmax_api::{session, LoginReply, SessionClient, SessionEnvelope};

/// Trait over the session endpoint so the resolver and login flow can be
/// tested against a mock instead of a live server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn fetch_session(&self) -> session::Result<SessionEnvelope>;
    async fn begin_login(&self, user_key: &str) -> session::Result<LoginReply>;
    async fn complete_login(&self, user_secret: &str) -> session::Result<LoginReply>;
}

/// Wrapper around SessionClient that implements SessionApi
pub struct SessionBridge {
    client: SessionClient,
}

impl SessionBridge {
    pub fn new(base_url: String) -> Self {
        Self {
            client: SessionClient::new(base_url),
        }
    }
}

#[async_trait]
impl SessionApi for SessionBridge {
    async fn fetch_session(&self) -> session::Result<SessionEnvelope> {
        self.client.fetch_session().await
    }

    async fn begin_login(&self, user_key: &str) -> session::Result<LoginReply> {
        self.client.begin_login(user_key).await
    }

    async fn complete_login(&self, user_secret: &str) -> session::Result<LoginReply> {
        self.client.complete_login(user_secret).await
    }
}

/// Resolves the authenticated user once per session.
///
/// Any failure - transport, shape, or simply no user in the response -
/// leaves identity unresolved, which keeps all persistence no-op.
pub struct SessionResolver;

impl SessionResolver {
    pub async fn resolve(api: &dyn SessionApi) -> Option<String> {
        match api.fetch_session().await {
            Ok(envelope) => envelope
                .data
                .and_then(|d| d.user)
                .filter(|user| !user.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to resolve session user: {}", e);
                None
            }
        }
    }
}
