//! Resource stores
//!
//! State containers a UI binds to, one per resource. Each keeps the cached
//! data, a loading flag and the last error message, and turns successful
//! API calls into local updates.

mod list;
mod medical;
mod resources;

pub use list::{ListResource, ListStore, Messages};
pub use medical::MedicalInfoStore;
pub use resources::{
    AddressStore, Addresses, BankAccountStore, BankAccounts, EmergencyContactStore, EmergencyContacts,
    EmergencyEventStore, EmergencyEvents, HealthInsuranceStore, HealthInsurances,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::testing::{FakeIdentity, InMemoryBackend};
    use crate::{ApiClient, ApiError};
    use serde_json::json;
    use sistema911_model::{
        AddressUpdate, EmergencyKind, EventStatus, MedicalInfoInput, NewAddress, NewEmergencyContact,
        NewEmergencyEvent,
    };
    use std::sync::Arc;

    fn client(backend: &Arc<InMemoryBackend>) -> ApiClient {
        ApiClient::new(
            ApiConfig::default(),
            backend.clone(),
            Arc::new(FakeIdentity::signed_in("uid-1", "maria@example.com")),
        )
    }

    fn address(street: &str) -> NewAddress {
        NewAddress {
            street: street.to_string(),
            city: "Santiago".to_string(),
            state: "Región Metropolitana".to_string(),
            country: "Chile".to_string(),
            postal_code: "8320000".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_address_store_crud_without_refetch() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut store = AddressStore::new(client(&backend));
        store.mount().await.unwrap();
        assert!(store.items().is_empty());
        assert!(!store.is_loading());

        let created = store.create(&address("Av. Providencia 1234")).await.unwrap();
        let update = AddressUpdate {
            street: Some("456 Updated Street".to_string()),
            ..Default::default()
        };
        store.update(&created.id, &update).await.unwrap();
        assert_eq!(store.items()[0].street, "456 Updated Street");

        store.delete(&created.id).await.unwrap();
        assert!(store.items().is_empty());

        // one GET from mount, then POST, PUT, DELETE
        assert_eq!(backend.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_set_primary_leaves_one_primary() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut store = AddressStore::new(client(&backend));
        store.mount().await.unwrap();

        let a = store.create(&address("Calle Uno 1")).await.unwrap();
        let b = store.create(&address("Calle Dos 2")).await.unwrap();
        store.set_primary(&a.id).await.unwrap();
        store.set_primary(&b.id).await.unwrap();

        let primaries: Vec<&str> = store
            .items()
            .iter()
            .filter(|a| a.is_primary)
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(primaries, vec![b.id.as_str()]);
        assert_eq!(store.primary().map(|a| a.id.as_str()), Some(b.id.as_str()));
    }

    #[tokio::test]
    async fn test_set_primary_on_uncached_address() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut store = AddressStore::new(client(&backend));
        store.mount().await.unwrap();
        let home = store.create(&address("Calle Uno 1")).await.unwrap();
        store.set_primary(&home.id).await.unwrap();

        // added by another session after this store loaded
        let other = backend.seed(
            "addresses",
            json!({ "street_address": "Calle Dos 2", "city": "Santiago", "is_primary": false }),
        );
        store.set_primary(&other).await.unwrap();

        let primaries: Vec<&str> = store
            .items()
            .iter()
            .filter(|a| a.is_primary)
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(primaries, vec![other.as_str()]);
        assert_eq!(store.items().len(), 2);
    }

    #[tokio::test]
    async fn test_error_is_stored_with_message() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut store = EmergencyContactStore::new(client(&backend));

        backend.fail_next(500, json!({ "message": "Base de datos no disponible" }));
        let err = store.mount().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(store.error(), Some("Base de datos no disponible"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_validation_error_reaches_store() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut store = EmergencyContactStore::new(client(&backend));

        let err = store.create(&NewEmergencyContact::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(store.error().is_some());
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_envelope_failure_without_message() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut store = AddressStore::new(client(&backend));

        backend.fail_next(200, json!({ "success": false, "message": "" }));
        store.mount().await.unwrap_err();
        // the envelope had no usable message, so the generic one applies
        assert_eq!(store.error(), Some("La solicitud no pudo completarse"));
    }

    #[tokio::test]
    async fn test_medical_store_404_is_no_data() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut store = MedicalInfoStore::new(client(&backend));

        store.mount().await.unwrap();
        assert!(store.medical_info().is_none());
        assert!(store.error().is_none());

        let input = MedicalInfoInput {
            blood_type: Some("o+".to_string()),
            allergies: vec!["Penicilina".to_string(), " ".to_string()],
            ..Default::default()
        };
        let saved = store.upsert(input).await.unwrap();
        assert_eq!(saved.blood_type.as_deref(), Some("O+"));
        assert_eq!(saved.allergies, vec!["Penicilina"]);

        store.delete().await.unwrap();
        assert!(store.medical_info().is_none());
    }

    #[tokio::test]
    async fn test_cancel_event() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut store = EmergencyEventStore::new(client(&backend));
        store.mount().await.unwrap();

        let request = NewEmergencyEvent {
            kind: EmergencyKind::Medical,
            description: "Caída en escalera".to_string(),
            contact_info: sistema911_model::ContactInfo {
                phone: "+56912345678".to_string(),
                alternative_phone: None,
            },
            ..Default::default()
        };
        let event = store.create(&request).await.unwrap();
        assert_eq!(event.status, EventStatus::Pending);
        assert_eq!(store.open_events().count(), 1);

        let cancelled = store.cancel(&event.id).await.unwrap();
        assert_eq!(cancelled.status, EventStatus::Cancelled);
        assert_eq!(store.open_events().count(), 0);

        let sent = backend.requests().len();
        let err = store.cancel(&event.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(backend.requests().len(), sent);
    }
}
