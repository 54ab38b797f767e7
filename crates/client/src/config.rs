use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the marketplace API lives and how to call it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root without the `/api/v1` prefix, e.g. `https://api.sokoni.app`.
    pub base_url: String,
    /// Bearer token sent on authenticated calls.
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from environment variables.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `SOKONI_API_URL`         | `http://localhost:3000` |
    /// | `SOKONI_ACCESS_TOKEN`    | none                    |
    /// | `SOKONI_TIMEOUT_SECS`    | `15`                    |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SOKONI_API_URL").unwrap_or_else(|_| "http://localhost:3000".into());
        let mut config = Self::new(base_url);

        if let Ok(token) = std::env::var("SOKONI_ACCESS_TOKEN") {
            if !token.is_empty() {
                config.access_token = Some(token);
            }
        }
        if let Some(secs) = std::env::var("SOKONI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    /// Absolute URL for an `/api/v1` path.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}
