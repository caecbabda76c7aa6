use sistema911_model::{HealthInsurance, HealthInsuranceUpdate, NewHealthInsurance};

use super::{check, ApiClient};
use crate::endpoints::{self, HEALTH_INSURANCE};
use crate::error::ApiError;
use crate::transport::Method;

impl ApiClient {
    pub async fn get_health_insurances(&self) -> Result<Vec<HealthInsurance>, ApiError> {
        self.get_list(HEALTH_INSURANCE).await
    }

    pub async fn get_health_insurance(&self, id: &str) -> Result<HealthInsurance, ApiError> {
        self.get_one(&endpoints::item(HEALTH_INSURANCE, id)).await
    }

    pub async fn create_health_insurance(
        &self,
        input: &NewHealthInsurance,
    ) -> Result<HealthInsurance, ApiError> {
        check(input.validate())?;
        self.send(Method::Post, HEALTH_INSURANCE, input).await
    }

    pub async fn update_health_insurance(
        &self,
        id: &str,
        update: &HealthInsuranceUpdate,
    ) -> Result<HealthInsurance, ApiError> {
        check(update.validate())?;
        self.send(Method::Put, &endpoints::item(HEALTH_INSURANCE, id), update)
            .await
    }

    pub async fn delete_health_insurance(&self, id: &str) -> Result<(), ApiError> {
        self.delete_at(&endpoints::item(HEALTH_INSURANCE, id)).await
    }
}
