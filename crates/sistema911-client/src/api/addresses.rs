use sistema911_model::wire;
use sistema911_model::{Address, AddressUpdate, NewAddress};

use super::{check, ApiClient};
use crate::endpoints::{self, ADDRESSES};
use crate::error::ApiError;
use crate::fetch::RequestOptions;
use crate::transport::Method;

impl ApiClient {
    pub async fn get_addresses(&self) -> Result<Vec<Address>, ApiError> {
        self.get_list(ADDRESSES).await
    }

    pub async fn get_address(&self, id: &str) -> Result<Address, ApiError> {
        self.get_one(&endpoints::item(ADDRESSES, id)).await
    }

    pub async fn create_address(&self, input: &NewAddress) -> Result<Address, ApiError> {
        check(input.validate())?;
        self.send(Method::Post, ADDRESSES, input).await
    }

    pub async fn update_address(&self, id: &str, update: &AddressUpdate) -> Result<Address, ApiError> {
        check(update.validate())?;
        self.send(Method::Put, &endpoints::item(ADDRESSES, id), update).await
    }

    pub async fn delete_address(&self, id: &str) -> Result<(), ApiError> {
        self.delete_at(&endpoints::item(ADDRESSES, id)).await
    }

    /// Make `id` the primary address; the backend clears the others.
    pub async fn set_primary_address(&self, id: &str) -> Result<Address, ApiError> {
        let options = RequestOptions {
            method: Method::Patch,
            ..RequestOptions::default()
        };
        let body = self.fetch.request(&endpoints::address_primary(id), options).await?;
        Ok(wire::decode(body, self.schema)?)
    }
}
