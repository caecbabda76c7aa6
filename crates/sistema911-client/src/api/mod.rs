//! Domain API client
//!
//! One method per resource and operation. Each method validates its input,
//! converts it to the wire dialect, issues exactly one request through the
//! authenticated fetch, and decodes the answer. Errors propagate unchanged;
//! nothing is retried or cached.

mod addresses;
mod auth;
mod bank_accounts;
mod contacts;
mod events;
mod insurance;
mod medical;
mod users;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sistema911_model::wire::{self, WireEntity};
use sistema911_model::{SchemaVersion, ValidationResult};
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::fetch::{AuthenticatedFetch, RequestOptions};
use crate::session::IdentityProvider;
use crate::transport::{Method, Transport};

#[derive(Clone)]
pub struct ApiClient {
    fetch: AuthenticatedFetch,
    identity: Arc<dyn IdentityProvider>,
    schema: SchemaVersion,
}

impl ApiClient {
    pub fn new(config: ApiConfig, transport: Arc<dyn Transport>, identity: Arc<dyn IdentityProvider>) -> Self {
        let schema = config.schema;
        Self {
            fetch: AuthenticatedFetch::new(config, transport, identity.clone()),
            identity,
            schema,
        }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    pub fn fetch(&self) -> &AuthenticatedFetch {
        &self.fetch
    }

    async fn get_one<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + WireEntity,
    {
        let body = self.fetch.request(path, RequestOptions::get()).await?;
        Ok(wire::decode(body, self.schema)?)
    }

    async fn get_list<T>(&self, path: &str) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned + WireEntity,
    {
        let body = self.fetch.request(path, RequestOptions::get()).await?;
        Ok(wire::decode_list(body, self.schema)?)
    }

    /// POST/PUT/PATCH `input` and decode the returned entity
    async fn send<I, T>(&self, method: Method, path: &str, input: &I) -> Result<T, ApiError>
    where
        I: Serialize + WireEntity,
        T: DeserializeOwned + WireEntity,
    {
        let body = wire::encode(input, self.schema)?;
        let options = RequestOptions {
            method,
            body: Some(body),
            ..RequestOptions::default()
        };
        let response = self.fetch.request(path, options).await?;
        Ok(wire::decode(response, self.schema)?)
    }

    async fn delete_at(&self, path: &str) -> Result<(), ApiError> {
        self.fetch.request(path, RequestOptions::delete()).await?;
        Ok(())
    }
}

/// Reject invalid input before anything is sent
fn check(result: ValidationResult) -> Result<(), ApiError> {
    result.into_result().map_err(ApiError::Validation)
}
