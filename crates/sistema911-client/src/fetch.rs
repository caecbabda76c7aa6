//! Authenticated fetch
//!
//! Every backend call goes through [`AuthenticatedFetch::request`]. It
//! attaches a fresh bearer token, resolves the URL, turns non-2xx statuses
//! into [`ApiError::Http`] and normalizes the `{success, data}` envelope some
//! endpoints wrap their payload in.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::session::IdentityProvider;
use crate::transport::{HttpRequest, Method, Transport};

/// Per-call options
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Override the defaults by name, case-insensitive
    pub headers: Vec<(String, String)>,
    /// Send without a bearer token (pre-login endpoints)
    pub anonymous: bool,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self::with_body(Method::Post, body)
    }

    pub fn put(body: Value) -> Self {
        Self::with_body(Method::Put, body)
    }

    pub fn patch(body: Value) -> Self {
        Self::with_body(Method::Patch, body)
    }

    pub fn delete() -> Self {
        Self {
            method: Method::Delete,
            ..Self::default()
        }
    }

    fn with_body(method: Method, body: Value) -> Self {
        Self {
            method,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

#[derive(Clone)]
pub struct AuthenticatedFetch {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
    identity: Arc<dyn IdentityProvider>,
}

impl AuthenticatedFetch {
    pub fn new(config: ApiConfig, transport: Arc<dyn Transport>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            config,
            transport,
            identity,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Issue one request and return its normalized JSON payload.
    ///
    /// Fails with [`ApiError::Unauthenticated`] before touching the network
    /// when the call needs a token and the session has none.
    #[instrument(level = "debug", skip(self, options), fields(method = %options.method))]
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];

        if !options.anonymous {
            let token = match self.identity.id_token().await? {
                Some(token) => token,
                None => {
                    warn!(path, "request without an authenticated session");
                    return Err(ApiError::Unauthenticated);
                }
            };
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        for (name, value) in options.headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
            headers.push((name, value));
        }

        let request = HttpRequest {
            method: options.method,
            url: self.config.url_for(path),
            headers,
            body: options.body,
        };

        let response = self.transport.send(request).await.map_err(|err| {
            warn!(path, error = %err, "request failed");
            err
        })?;
        debug!(status = response.status, "response received");

        if !response.is_success() {
            let err = http_error(response.status, &response.body);
            warn!(path, status = response.status, error = %err, "backend returned an error");
            return Err(err);
        }

        let body = parse_body(&response.body)?;
        normalize_envelope(body).map_err(|err| {
            warn!(path, error = %err, "backend reported failure");
            err
        })
    }
}

/// Empty bodies (204, bare DELETE) read as `null`
fn parse_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

/// Server-provided text of an error body: `message`, else `error`
fn server_message(body: &Value) -> Option<&str> {
    ["message", "error"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find(|m| !m.trim().is_empty())
}

fn http_error(status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);
    let message = server_message(&parsed)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP status {}", status));
    ApiError::Http { status, message }
}

/// Unwrap `{success, data}` envelopes.
///
/// An object with a boolean `success` key is an envelope: `false` is an
/// application error even on a 2xx status, `true` yields `data` (or `null`).
/// Anything else is returned unchanged.
pub fn normalize_envelope(body: Value) -> Result<Value, ApiError> {
    let success = match body.get("success").and_then(Value::as_bool) {
        Some(success) => success,
        None => return Ok(body),
    };

    if !success {
        let message = server_message(&body)
            .unwrap_or("La solicitud no pudo completarse")
            .to_string();
        return Err(ApiError::Application(message));
    }

    match body {
        Value::Object(mut fields) => Ok(fields.remove("data").unwrap_or(Value::Null)),
        other => Ok(other),
    }
}
