//! Connection settings for [`RestCatalogClient`](super::RestCatalogClient).

use std::fmt;
use std::time::Duration;

/// Default user agent for catalog requests.
pub const DEFAULT_USER_AGENT: &str = "yatra-rest/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`RestCatalogClient`](super::RestCatalogClient).
///
/// `api_key` is the project's public (anon) key and is always sent as the
/// `apikey` header. Requests authorise with `access_token` when one is set
/// and fall back to the API key otherwise.
#[derive(Clone)]
pub struct RestClientConfig {
    /// Project URL, e.g. `"https://abc.supabase.co"`.
    pub base_url: String,
    /// Public API key.
    pub api_key: String,
    /// Signed-in user's access token.
    pub access_token: Option<String>,
    /// Request and connect timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl fmt::Debug for RestClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl RestClientConfig {
    /// Create a configuration for `base_url` authorised by `api_key`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Authorise requests as a signed-in user.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Token sent in the `Authorization` header.
    pub fn bearer_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }
}
