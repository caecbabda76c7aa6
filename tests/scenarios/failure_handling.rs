//! Failure Handling Scenarios
//!
//! What the user sees when the backend or the session misbehaves:
//! - `{"success": false}` envelopes fail reads and writes even on HTTP 200
//! - no session means no request leaves the client
//! - a missing medical record is "no data", not an error
//! - the dashboard survives individual endpoint failures

use anyhow::Result;
use serde_json::json;
use sistema911_client::testing::{FakeIdentity, InMemoryBackend};
use sistema911_client::{load_dashboard, ApiClient, ApiConfig, ApiError, MedicalInfoStore};
use sistema911_model::{
    ContactInfo, EmergencyContactUpdate, EmergencyEventUpdate, HealthInsuranceUpdate, MedicalInfoInput,
    NewAddress, NewEmergencyContact, NewEmergencyEvent, NewHealthInsurance,
};
use std::sync::Arc;

// ============================================================================//
// Setup
// ============================================================================//

fn setup(identity: FakeIdentity) -> (Arc<InMemoryBackend>, ApiClient) {
    let backend = Arc::new(InMemoryBackend::new());
    let api = ApiClient::new(ApiConfig::default(), backend.clone(), Arc::new(identity));
    (backend, api)
}

fn maria() -> FakeIdentity {
    FakeIdentity::signed_in("uid-maria", "maria@example.com")
}

fn rejected(err: ApiError) -> bool {
    err == ApiError::Application("Operación rechazada".to_string())
}

// ============================================================================//
// Envelopes
// ============================================================================//

#[tokio::test]
async fn test_unsuccessful_envelope_fails_reads_and_writes() -> Result<()> {
    let (backend, api) = setup(maria());
    let address = NewAddress {
        street: "Av. Providencia 1234".to_string(),
        city: "Santiago".to_string(),
        state: "Región Metropolitana".to_string(),
        country: "Chile".to_string(),
        postal_code: "7500000".to_string(),
        ..Default::default()
    };
    let contact = NewEmergencyContact {
        name: "María González".to_string(),
        phone: "+56912345678".to_string(),
        relationship: "Madre".to_string(),
        ..Default::default()
    };
    let insurance = NewHealthInsurance {
        provider_name: "Fonasa".to_string(),
        member_id: "F-001".to_string(),
        ..Default::default()
    };
    let event = NewEmergencyEvent {
        description: "Dolor torácico".to_string(),
        contact_info: ContactInfo {
            phone: "+56912345678".to_string(),
            alternative_phone: None,
        },
        ..Default::default()
    };

    // reads
    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.get_profile().await.unwrap_err()));

    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.get_addresses().await.unwrap_err()));

    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.get_medical_info().await.unwrap_err()));

    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.get_bank_accounts().await.unwrap_err()));

    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.get_emergency_events().await.unwrap_err()));

    // addresses
    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.create_address(&address).await.unwrap_err()));

    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.set_primary_address("a1").await.unwrap_err()));

    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.delete_address("a1").await.unwrap_err()));

    // contacts
    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.create_emergency_contact(&contact).await.unwrap_err()));

    backend.fail_next_with_envelope("Operación rechazada");
    let update = EmergencyContactUpdate {
        relationship: Some("Hermana".to_string()),
        ..Default::default()
    };
    assert!(rejected(api.update_emergency_contact("c1", &update).await.unwrap_err()));

    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.delete_emergency_contact("c1").await.unwrap_err()));

    // insurance
    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.create_health_insurance(&insurance).await.unwrap_err()));

    backend.fail_next_with_envelope("Operación rechazada");
    let update = HealthInsuranceUpdate {
        plan_name: Some("Tramo B".to_string()),
        ..Default::default()
    };
    assert!(rejected(api.update_health_insurance("h1", &update).await.unwrap_err()));

    // medical info
    backend.fail_next_with_envelope("Operación rechazada");
    let medical = MedicalInfoInput {
        blood_type: Some("A+".to_string()),
        ..Default::default()
    };
    assert!(rejected(api.upsert_medical_info(medical).await.unwrap_err()));

    // emergency events
    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.create_emergency_event(&event).await.unwrap_err()));

    backend.fail_next_with_envelope("Operación rechazada");
    let cancel = EmergencyEventUpdate::cancel();
    assert!(rejected(api.update_emergency_event("e1", &cancel).await.unwrap_err()));

    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.delete_emergency_event("e1").await.unwrap_err()));

    // nothing was written
    assert!(backend.collection("addresses").is_empty());
    assert!(backend.collection("emergency-contacts").is_empty());
    assert!(backend.collection("health-insurance").is_empty());
    assert!(backend.collection("emergency-events").is_empty());
    assert!(backend.medical_info().is_none());

    // logout reports the refusal but still ends the session
    backend.fail_next_with_envelope("Operación rechazada");
    assert!(rejected(api.logout().await.unwrap_err()));
    assert_eq!(api.get_profile().await.unwrap_err(), ApiError::Unauthenticated);

    Ok(())
}

#[tokio::test]
async fn test_http_error_without_message_reports_status() -> Result<()> {
    let (backend, api) = setup(maria());

    backend.fail_next(502, json!({}));
    let err = api.get_emergency_contacts().await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "HTTP status 502");

    Ok(())
}

// ============================================================================//
// Session
// ============================================================================//

#[tokio::test]
async fn test_no_session_means_no_request() -> Result<()> {
    let (backend, api) = setup(FakeIdentity::signed_out());

    assert_eq!(api.get_profile().await.unwrap_err(), ApiError::Unauthenticated);
    assert_eq!(api.get_addresses().await.unwrap_err(), ApiError::Unauthenticated);
    assert_eq!(api.delete_bank_account("b1").await.unwrap_err(), ApiError::Unauthenticated);
    assert!(backend.requests().is_empty());

    // the availability check is the one call allowed without a session
    let availability = api.check_email("nueva@example.com").await?;
    assert!(availability.available);
    assert_eq!(backend.requests().len(), 1);
    assert!(backend.requests()[0].bearer_token().is_none());

    Ok(())
}

// ============================================================================//
// Medical info
// ============================================================================//

#[tokio::test]
async fn test_missing_medical_record_is_no_data() -> Result<()> {
    let (backend, api) = setup(maria());
    let mut store = MedicalInfoStore::new(api);

    store.mount().await?;
    assert!(store.medical_info().is_none());
    assert!(store.error().is_none());
    assert!(!store.is_loading());

    let saved = store
        .create(MedicalInfoInput {
            blood_type: Some("AB-".to_string()),
            allergies: vec!["Penicilina".to_string()],
            ..Default::default()
        })
        .await?;
    assert_eq!(saved.blood_type.as_deref(), Some("AB-"));
    assert!(backend.medical_info().is_some());

    // a second create is refused by the backend and surfaced by the store
    let err = store.create(MedicalInfoInput::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(store.error(), Some("La información médica ya existe"));
    assert!(store.medical_info().is_some());

    Ok(())
}

// ============================================================================//
// Dashboard
// ============================================================================//

#[tokio::test]
async fn test_dashboard_tolerates_failing_sections() -> Result<()> {
    let (backend, api) = setup(maria());
    backend.set_profile(json!({ "id": "uid-maria", "email": "maria@example.com", "first_name": "María" }));
    backend.seed("addresses", json!({ "street_address": "Av. Providencia 1234", "city": "Santiago" }));
    backend.seed("bank-accounts", json!({ "bank_name": "BancoEstado", "account_number": "123" }));

    backend.fail_next(500, json!({ "message": "caído" }));
    backend.fail_next_with_envelope("rechazado");
    let snapshot = load_dashboard(&api).await;

    assert_eq!(backend.requests().len(), 7);
    assert_eq!(snapshot.failed.len(), 2);
    // short account numbers are shown as they are
    for (_, number) in snapshot.masked_accounts() {
        assert!(number == "123" || number.starts_with("****"));
    }

    Ok(())
}
