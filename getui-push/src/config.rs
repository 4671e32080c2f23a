//! Client configuration.

use std::fmt;
use std::time::Duration;
use url::Url;

use crate::{PushError, Result};

/// Default REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://restapi.getui.com/v1";

/// Application credentials issued by the GeTui console.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// App id, used in every request path.
    pub app_id: String,
    /// App key, sent with auth and every message.
    pub app_key: String,
    /// Master secret, only used to sign the auth request.
    pub master_secret: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        master_secret: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
            master_secret: master_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_key", &self.app_key)
            .field("master_secret", &"<redacted>")
            .finish()
    }
}

/// GeTui client configuration.
#[derive(Debug, Clone)]
pub struct GetuiConfig {
    /// Application credentials.
    pub credentials: Credentials,
    /// REST base URL, without the app id.
    pub base_url: String,
    /// Total request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Refresh the auth token when it expires within this margin.
    pub token_refresh_margin: Duration,
    /// User-Agent header.
    pub user_agent: String,
}

impl GetuiConfig {
    /// Create a configuration with default transport settings.
    pub fn new(
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        master_secret: impl Into<String>,
    ) -> Self {
        Self::with_credentials(Credentials::new(app_id, app_key, master_secret))
    }

    /// Create a configuration from existing credentials.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            token_refresh_margin: Duration::from_secs(60),
            user_agent: format!("getui-push/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `GETUI_APP_ID`, `GETUI_APP_KEY` and `GETUI_MASTER_SECRET` are
    /// required. `GETUI_BASE_URL` and `GETUI_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| PushError::Config(format!("{} is not set", key)))
        };

        let mut config = Self::new(
            required("GETUI_APP_ID")?,
            required("GETUI_APP_KEY")?,
            required("GETUI_MASTER_SECRET")?,
        );

        if let Some(base_url) = lookup("GETUI_BASE_URL") {
            config = config.base_url(base_url);
        }

        if let Some(secs) = lookup("GETUI_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| PushError::Config(format!("GETUI_TIMEOUT_SECS: invalid value {:?}", secs)))?;
            config = config.timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the token refresh margin.
    pub fn token_refresh_margin(mut self, margin: Duration) -> Self {
        self.token_refresh_margin = margin;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Check the configuration and parse the base URL.
    pub fn validate(&self) -> Result<Url> {
        let creds = &self.credentials;
        if creds.app_id.is_empty() || creds.app_key.is_empty() || creds.master_secret.is_empty() {
            return Err(PushError::Config(
                "app id, app key and master secret are required".to_string(),
            ));
        }

        let url = Url::parse(self.base_url.trim_end_matches('/'))?;
        if url.cannot_be_a_base() {
            return Err(PushError::Config(format!(
                "base URL cannot be a base: {}",
                self.base_url
            )));
        }
        Ok(url)
    }
}
