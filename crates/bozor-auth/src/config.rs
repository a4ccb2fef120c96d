//! Gate configuration.
//!
//! The gate needs very little: where the backend lives, how long to wait for
//! it, how much clock skew to tolerate when checking token expiry, and which
//! routes to redirect to when access is denied.
//!
//! # Example (TOML)
//!
//! ```toml
//! api_base_url = "https://api.bozor.uz/api"
//! request_timeout = "5s"
//! token_leeway = "30s"
//!
//! [routes]
//! login = "/login"
//! company_onboarding = "/company/create"
//! ```
//!
//! Every key can be overridden from the environment with the `BOZOR` prefix
//! and `__` as the separator, e.g. `BOZOR__API_BASE_URL` or
//! `BOZOR__ROUTES__LOGIN`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "BOZOR";

/// Root configuration for the authorization gate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Base URL of the backend REST API, without the endpoint path.
    pub api_base_url: String,

    /// Upper bound for each outbound request.
    /// A request that exceeds it counts as a failure and the gate denies.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Clock skew tolerated when checking the access token's `exp` claim.
    #[serde(with = "humantime_serde")]
    pub token_leeway: Duration,

    /// Redirect targets for denied sessions.
    pub routes: RedirectRoutes,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            token_leeway: Duration::ZERO,
            routes: RedirectRoutes::default(),
        }
    }
}

/// Logical routes a denied session is sent to.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RedirectRoutes {
    /// Where unauthenticated sessions go.
    pub login: String,

    /// Where authenticated sessions without a matching role or company go.
    pub company_onboarding: String,
}

impl Default for RedirectRoutes {
    fn default() -> Self {
        Self {
            login: "/login".to_string(),
            company_onboarding: "/company/create".to_string(),
        }
    }
}

/// Errors raised while loading or validating [`GateConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration sources could not be read or merged.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A field holds a value the gate cannot work with.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

impl GateConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the expiry leeway.
    #[must_use]
    pub fn with_token_leeway(mut self, leeway: Duration) -> Self {
        self.token_leeway = leeway;
        self
    }

    /// Sets the redirect routes.
    #[must_use]
    pub fn with_routes(mut self, routes: RedirectRoutes) -> Self {
        self.routes = routes;
        self
    }

    /// Loads configuration from an optional TOML file and `BOZOR__*`
    /// environment variables, in that order of precedence (environment wins).
    ///
    /// A missing file is not an error; defaults fill any gaps.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            let path = PathBuf::from(path);
            if path.exists() {
                builder = builder.add_source(File::from(path));
            } else {
                tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            }
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .separator("__"),
        );

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api_base_url).map_err(|e| ConfigError::InvalidValue {
            field: "api_base_url",
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                message: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Full URL of the token refresh endpoint.
    #[must_use]
    pub fn refresh_url(&self) -> String {
        format!("{}/auth/refresh/", self.base())
    }

    /// Full URL of the company status endpoint.
    #[must_use]
    pub fn status_url(&self) -> String {
        format!("{}/companies/my_status/", self.base())
    }

    fn base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
