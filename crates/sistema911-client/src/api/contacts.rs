use sistema911_model::{EmergencyContact, EmergencyContactUpdate, NewEmergencyContact};

use super::{check, ApiClient};
use crate::endpoints::{self, EMERGENCY_CONTACTS};
use crate::error::ApiError;
use crate::transport::Method;

impl ApiClient {
    pub async fn get_emergency_contacts(&self) -> Result<Vec<EmergencyContact>, ApiError> {
        self.get_list(EMERGENCY_CONTACTS).await
    }

    pub async fn get_emergency_contact(&self, id: &str) -> Result<EmergencyContact, ApiError> {
        self.get_one(&endpoints::item(EMERGENCY_CONTACTS, id)).await
    }

    pub async fn create_emergency_contact(
        &self,
        input: &NewEmergencyContact,
    ) -> Result<EmergencyContact, ApiError> {
        check(input.validate())?;
        self.send(Method::Post, EMERGENCY_CONTACTS, input).await
    }

    pub async fn update_emergency_contact(
        &self,
        id: &str,
        update: &EmergencyContactUpdate,
    ) -> Result<EmergencyContact, ApiError> {
        check(update.validate())?;
        self.send(Method::Put, &endpoints::item(EMERGENCY_CONTACTS, id), update)
            .await
    }

    pub async fn delete_emergency_contact(&self, id: &str) -> Result<(), ApiError> {
        self.delete_at(&endpoints::item(EMERGENCY_CONTACTS, id)).await
    }
}
