use sistema911_model::{ProfileUpdate, User};

use super::{check, ApiClient};
use crate::endpoints;
use crate::error::ApiError;
use crate::transport::Method;

impl ApiClient {
    pub async fn get_profile(&self) -> Result<User, ApiError> {
        self.get_one(endpoints::USERS_ME).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        check(update.validate())?;
        self.send(Method::Put, endpoints::USERS_ME, update).await
    }

    pub async fn get_user_by_rut(&self, rut: &str) -> Result<User, ApiError> {
        self.get_one(&endpoints::user_by_rut(rut.trim())).await
    }

    pub async fn get_user_by_phone(&self, phone: &str) -> Result<User, ApiError> {
        self.get_one(&endpoints::user_by_phone(phone.trim())).await
    }
}
