use crate::session::SessionApi;
use foodminmax_api::LoginReply;

pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Where a successful login step sends the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginNavigation {
    /// Email accepted; move on to one-time token entry
    TokenEntry,
    /// Token accepted; the application root is open
    AppRoot,
}

/// Email step of the two-step passwordless login. Stateless apart from the
/// last error; each submission starts with the error cleared.
#[derive(Debug, Default)]
pub struct EmailForm {
    pub email: String,
    pub error: String,
}

impl EmailForm {
    pub async fn submit(&mut self, api: &dyn SessionApi) -> Option<LoginNavigation> {
        self.error.clear();

        match api.begin_login(&self.email).await {
            Ok(reply) => match interpret_reply(&reply, LoginNavigation::TokenEntry) {
                Ok(nav) => Some(nav),
                Err(message) => {
                    self.error = message;
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Login email submission failed: {}", e);
                self.error = DEFAULT_ERROR_MESSAGE.to_string();
                None
            }
        }
    }
}

/// Token step. Independent of the email step; same error contract.
#[derive(Debug, Default)]
pub struct TokenForm {
    pub token: String,
    pub error: String,
}

impl TokenForm {
    pub async fn submit(&mut self, api: &dyn SessionApi) -> Option<LoginNavigation> {
        self.error.clear();

        match api.complete_login(&self.token).await {
            Ok(reply) => match interpret_reply(&reply, LoginNavigation::AppRoot) {
                Ok(nav) => Some(nav),
                Err(message) => {
                    self.error = message;
                    None
                }
            },
            Err(e) => {
                tracing::warn!("Login token submission failed: {}", e);
                self.error = DEFAULT_ERROR_MESSAGE.to_string();
                None
            }
        }
    }
}

/// Success navigates; anything else surfaces the server message or the
/// generic fallback.
fn interpret_reply(
    reply: &LoginReply,
    on_success: LoginNavigation,
) -> std::result::Result<LoginNavigation, String> {
    if reply.is_success() {
        return Ok(on_success);
    }

    Err(reply
        .message
        .clone()
        .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()))
}
