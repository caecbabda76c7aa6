//! Client configuration
//!
//! Read from the environment:
//! - `SISTEMA911_API_URL` backend origin (default `http://localhost:8000`)
//! - `SISTEMA911_API_PREFIX` version prefix (default `/v1`)
//! - `SISTEMA911_SCHEMA` insurance/bank dialect, `current` or `legacy`

use sistema911_model::SchemaVersion;
use std::env;

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/v1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_prefix: String,
    pub schema: SchemaVersion,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            schema: SchemaVersion::default(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base_url(base_url.into()),
            ..Self::default()
        }
    }

    pub fn with_schema(mut self, schema: SchemaVersion) -> Self {
        self.schema = schema;
        self
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = get("SISTEMA911_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "SISTEMA911_API_URL must start with http:// or https:// (got '{}')",
                base_url
            )));
        }

        let api_prefix = match get("SISTEMA911_API_PREFIX") {
            Some(prefix) => normalize_prefix(&prefix),
            None => DEFAULT_API_PREFIX.to_string(),
        };

        let schema = match get("SISTEMA911_SCHEMA") {
            Some(raw) => raw.parse::<SchemaVersion>().map_err(ApiError::Config)?,
            None => SchemaVersion::default(),
        };

        Ok(Self {
            base_url: trim_base_url(base_url),
            api_prefix,
            schema,
        })
    }

    /// Absolute URL of an API path such as `/addresses`
    pub fn url_for(&self, path: &str) -> String {
        let path = if path.starts_with('/') || path.is_empty() {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        format!("{}{}{}", self.base_url, self.api_prefix, path)
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// `v1/` -> `/v1`, `/` -> ``
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
