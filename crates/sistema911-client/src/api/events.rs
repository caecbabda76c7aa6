use sistema911_model::{EmergencyEvent, EmergencyEventUpdate, EventStatus, NewEmergencyEvent};
use tracing::info;

use super::{check, ApiClient};
use crate::endpoints::{self, EMERGENCY_EVENTS};
use crate::error::ApiError;
use crate::transport::Method;

impl ApiClient {
    pub async fn get_emergency_events(&self) -> Result<Vec<EmergencyEvent>, ApiError> {
        self.get_list(EMERGENCY_EVENTS).await
    }

    pub async fn get_emergency_event(&self, id: &str) -> Result<EmergencyEvent, ApiError> {
        self.get_one(&endpoints::item(EMERGENCY_EVENTS, id)).await
    }

    /// Submit an emergency request
    pub async fn create_emergency_event(&self, input: &NewEmergencyEvent) -> Result<EmergencyEvent, ApiError> {
        check(input.validate())?;
        let event: EmergencyEvent = self.send(Method::Post, EMERGENCY_EVENTS, input).await?;
        info!(id = %event.id, kind = event.kind.as_str(), priority = ?event.priority, "emergency request submitted");
        Ok(event)
    }

    pub async fn update_emergency_event(
        &self,
        id: &str,
        update: &EmergencyEventUpdate,
    ) -> Result<EmergencyEvent, ApiError> {
        check(update.validate())?;
        self.send(Method::Put, &endpoints::item(EMERGENCY_EVENTS, id), update)
            .await
    }

    /// Cancel an open event. Resolved or cancelled events are refused
    /// without contacting the backend.
    pub async fn cancel_emergency_event(&self, event: &EmergencyEvent) -> Result<EmergencyEvent, ApiError> {
        if !event.status.can_cancel() {
            let state = match event.status {
                EventStatus::Resolved => "resuelta",
                _ => "cancelada",
            };
            return Err(ApiError::Validation(format!("status: la emergencia ya está {}", state)));
        }
        self.update_emergency_event(&event.id, &EmergencyEventUpdate::cancel())
            .await
    }

    pub async fn delete_emergency_event(&self, id: &str) -> Result<(), ApiError> {
        self.delete_at(&endpoints::item(EMERGENCY_EVENTS, id)).await
    }
}
