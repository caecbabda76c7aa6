//! Medical info is a per-user singleton; a missing record is not an error.

use serde_json::Value;
use sistema911_model::wire;
use sistema911_model::{MedicalInfo, MedicalInfoInput, MedicalInfoUpdate};
use tracing::debug;

use super::{check, ApiClient};
use crate::endpoints::MEDICAL_INFO;
use crate::error::ApiError;
use crate::fetch::RequestOptions;
use crate::transport::Method;

impl ApiClient {
    /// `Ok(None)` when the user has not recorded anything yet (404)
    pub async fn get_medical_info(&self) -> Result<Option<MedicalInfo>, ApiError> {
        match self.fetch.request(MEDICAL_INFO, RequestOptions::get()).await {
            Ok(Value::Null) => Ok(None),
            Ok(body) => Ok(Some(wire::decode(body, self.schema)?)),
            Err(err) if err.is_not_found() => {
                debug!("no medical info recorded");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn create_medical_info(&self, input: MedicalInfoInput) -> Result<MedicalInfo, ApiError> {
        let input = input.normalized();
        check(input.validate())?;
        self.send(Method::Post, MEDICAL_INFO, &input).await
    }

    pub async fn update_medical_info(&self, update: MedicalInfoUpdate) -> Result<MedicalInfo, ApiError> {
        let update = update.normalized();
        check(update.validate())?;
        self.send(Method::Put, MEDICAL_INFO, &update).await
    }

    /// Create or replace in one call
    pub async fn upsert_medical_info(&self, input: MedicalInfoInput) -> Result<MedicalInfo, ApiError> {
        let input = input.normalized();
        check(input.validate())?;
        self.send(Method::Patch, MEDICAL_INFO, &input).await
    }

    pub async fn delete_medical_info(&self) -> Result<(), ApiError> {
        self.delete_at(MEDICAL_INFO).await
    }
}
