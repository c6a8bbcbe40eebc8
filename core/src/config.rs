//! API endpoint and credential configuration.
//!
//! Loaded either programmatically (`ApiConfig::new` plus builders) or from
//! the environment:
//!
//! | variable             | required | default                       |
//! |----------------------|----------|-------------------------------|
//! | `CIRCONUS_API_TOKEN` | yes      |                               |
//! | `CIRCONUS_API_URL`   | no       | `https://api.circonus.com/v2` |
//! | `CIRCONUS_API_APP`   | no       | `circonus-api-client`         |

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.circonus.com/v2";
pub const DEFAULT_APP_NAME: &str = "circonus-api-client";

pub const ENV_API_TOKEN: &str = "CIRCONUS_API_TOKEN";
pub const ENV_API_URL: &str = "CIRCONUS_API_URL";
pub const ENV_API_APP: &str = "CIRCONUS_API_APP";

/// Where to reach the API and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub url: String,
    pub token: String,
    pub app_name: String,
}

impl ApiConfig {
    pub fn new(token: &str) -> Result<Self, ConfigError> {
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(Self {
            url: DEFAULT_API_URL.to_string(),
            token: token.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
        })
    }

    /// Override the API URL. A bare host name becomes `https://<host>/v2`.
    pub fn with_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.url = normalize_url(url)?;
        Ok(self)
    }

    /// Override the app name. Empty values keep the current name.
    pub fn with_app_name(mut self, app_name: &str) -> Self {
        if !app_name.is_empty() {
            self.app_name = app_name.to_string();
        }
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset and empty values
    /// are treated the same.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let token = get(ENV_API_TOKEN)
            .ok_or_else(|| ConfigError::EnvError(format!("{ENV_API_TOKEN} is not set")))?;
        let mut config = Self::new(&token)?;
        if let Some(url) = get(ENV_API_URL) {
            config = config.with_url(&url)?;
        }
        if let Some(app) = get(ENV_API_APP) {
            config = config.with_app_name(&app);
        }
        Ok(config)
    }
}

fn normalize_url(raw: &str) -> Result<String, ConfigError> {
    let candidate = if raw.contains('/') {
        raw.to_string()
    } else {
        format!("https://{raw}/v2")
    };
    let trimmed = candidate.trim_end_matches('/');
    Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    Ok(trimmed.to_string())
}
