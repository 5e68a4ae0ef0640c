//! Client configuration.
//!
//! [`ClientConfig`] carries the backend location, the auth endpoint paths and
//! transport settings. Values can be overridden from the environment with
//! [`ClientConfig::from_env`]:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `AULA_API_URL` | `base_url` |
//! | `AULA_TIMEOUT_SECS` | `timeout` |
//! | `AULA_STORAGE_DIR` | `storage_dir` |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::errors::{ApiError, ApiResult};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the API pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL; endpoints are resolved against it.
    pub base_url: Url,
    /// Credential exchange endpoint.
    pub login_path: String,
    /// Refresh-token exchange endpoint.
    pub refresh_path: String,
    /// Endpoint returning the current user's profile.
    pub profile_path: String,
    /// Request timeout.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Directory for file-backed session storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            login_path: "/auth/login".to_string(),
            refresh_path: "/auth/refresh".to_string(),
            profile_path: "/auth/me".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("aula/", env!("CARGO_PKG_VERSION")).to_string(),
            storage_dir: None,
        }
    }
}

impl ClientConfig {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config for a backend URL.
    pub fn with_base_url(base_url: &str) -> ApiResult<Self> {
        Ok(Self::new().base_url(Url::parse(base_url)?))
    }

    /// Load defaults, then apply `AULA_*` environment overrides.
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("AULA_API_URL") {
            config.base_url = Url::parse(url.trim())?;
        }
        if let Some(secs) = lookup("AULA_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ApiError::Configuration(format!("AULA_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = lookup("AULA_STORAGE_DIR") {
            config.storage_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Set the base URL.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = url;
        self
    }

    /// Set the login path.
    #[must_use]
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Set the refresh path.
    #[must_use]
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Set the profile path.
    #[must_use]
    pub fn profile_path(mut self, path: impl Into<String>) -> Self {
        self.profile_path = path.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the storage directory.
    #[must_use]
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Resolve an endpoint against the base URL.
    ///
    /// Absolute `http(s)://` endpoints are used as-is. Relative endpoints are
    /// appended to the base path, so a base of `https://host/backend` and an
    /// endpoint of `/api/groups` give `https://host/backend/api/groups`.
    pub fn endpoint_url(&self, endpoint: &str) -> ApiResult<Url> {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Ok(Url::parse(endpoint)?);
        }
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = endpoint.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|e| serde::de::Error::custom(format!("invalid timeout {}: {}", secs, e)))
    }
}
