//! Registry Flow Scenarios
//!
//! Walks a user through the registry the way the pages do: sign up, sign in,
//! fill in contacts and addresses, open the dashboard, sign out. Runs the
//! real client stack against the in-memory backend.

use anyhow::Result;
use serde_json::json;
use sistema911_client::testing::{FakeIdentity, InMemoryBackend};
use sistema911_client::{
    load_dashboard, watch_session, AddressStore, ApiClient, ApiConfig, ApiError, EmergencyContactStore,
    IdentityProvider, SessionState,
};
use sistema911_model::{EmbeddedContact, LoginCredentials, NewAddress, NewEmergencyContact, RegistrationForm};
use std::sync::Arc;

// ============================================================================//
// Setup
// ============================================================================//

fn client(backend: &Arc<InMemoryBackend>, identity: &Arc<FakeIdentity>) -> ApiClient {
    ApiClient::new(ApiConfig::default(), backend.clone(), identity.clone())
}

fn signed_in() -> (Arc<InMemoryBackend>, Arc<FakeIdentity>, ApiClient) {
    let backend = Arc::new(InMemoryBackend::new());
    let identity = Arc::new(FakeIdentity::signed_in("uid-maria", "maria@example.com"));
    let api = client(&backend, &identity);
    (backend, identity, api)
}

fn registration() -> RegistrationForm {
    RegistrationForm {
        email: "maria@example.com".to_string(),
        password: "Segura123".to_string(),
        confirm_password: "Segura123".to_string(),
        accept_terms: true,
        first_name: "María".to_string(),
        last_name: "González".to_string(),
        phone: "+56912345678".to_string(),
        blood_type: Some("O+".to_string()),
        emergency_contact: Some(EmbeddedContact {
            name: "Pedro González".to_string(),
            phone: "+56987654321".to_string(),
            relationship: "Hermano".to_string(),
        }),
        ..Default::default()
    }
}

fn home_address() -> NewAddress {
    NewAddress {
        street: "Av. Providencia 1234".to_string(),
        city: "Santiago".to_string(),
        state: "Región Metropolitana".to_string(),
        country: "Chile".to_string(),
        postal_code: "7500000".to_string(),
        label: Some("Casa".to_string()),
        additional_info: None,
    }
}

// ============================================================================//
// Registration
// ============================================================================//

#[tokio::test]
async fn test_registration_creates_identity_and_profile() -> Result<()> {
    let backend = Arc::new(InMemoryBackend::new());
    let identity = Arc::new(FakeIdentity::signed_out());
    let api = client(&backend, &identity);

    let user = api.register(registration()).await?;
    assert!(identity.account_exists("maria@example.com"));
    assert!(identity.session().is_authenticated());

    let registrations = backend.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0]["uid"], json!(user.uid));
    assert_eq!(registrations[0]["firstName"], "María");
    assert!(registrations[0].get("password").is_none());

    let profile = api.get_profile().await?;
    assert_eq!(profile.email, "maria@example.com");
    assert_eq!(profile.display_name(), "María González");

    Ok(())
}

#[tokio::test]
async fn test_rejected_registration_removes_identity_account() -> Result<()> {
    let backend = Arc::new(InMemoryBackend::new());
    let identity = Arc::new(FakeIdentity::signed_out());
    let api = client(&backend, &identity);

    backend.fail_next(500, json!({ "message": "No se pudo crear el perfil" }));
    let err = api.register(registration()).await.unwrap_err();

    assert_eq!(err.to_string(), "No se pudo crear el perfil");
    assert_eq!(identity.deleted_users().len(), 1);
    assert!(!identity.account_exists("maria@example.com"));
    assert!(!identity.session().is_authenticated());

    Ok(())
}

#[tokio::test]
async fn test_invalid_registration_touches_nothing() -> Result<()> {
    let backend = Arc::new(InMemoryBackend::new());
    let identity = Arc::new(FakeIdentity::signed_out());
    let api = client(&backend, &identity);

    let form = RegistrationForm {
        confirm_password: "Distinta123".to_string(),
        ..registration()
    };
    let err = api.register(form).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(ref m) if m.contains("confirmPassword")));
    assert!(!identity.account_exists("maria@example.com"));
    assert!(backend.requests().is_empty());

    Ok(())
}

// ============================================================================//
// Sign in / sign out
// ============================================================================//

#[tokio::test]
async fn test_login_and_logout_drive_route_guard() -> Result<()> {
    let backend = Arc::new(InMemoryBackend::new());
    let identity = Arc::new(FakeIdentity::signed_out().with_account("maria@example.com", "Segura123", "uid-maria"));
    let api = client(&backend, &identity);

    let mut guard = watch_session(identity.subscribe(), "/login");
    assert_eq!(guard.check(), None);

    let wrong = LoginCredentials {
        email: "maria@example.com".to_string(),
        password: "Incorrecta1".to_string(),
    };
    let err = api.login(&wrong).await.unwrap_err();
    assert_eq!(err.to_string(), "Contraseña incorrecta");

    let credentials = LoginCredentials {
        email: "maria@example.com".to_string(),
        password: "Segura123".to_string(),
    };
    let user = api.login(&credentials).await?;
    assert_eq!(user.uid, "uid-maria");

    let redirect = guard.next_redirect().await.expect("redirect after sign-in");
    assert_eq!(redirect.to, "/dashboard");

    api.logout().await?;
    assert_eq!(identity.session(), SessionState::SignedOut);
    let redirect = guard.next_redirect().await.expect("redirect after sign-out");
    assert_eq!(redirect.to, "/login");

    Ok(())
}

// ============================================================================//
// Contacts and addresses
// ============================================================================//

#[tokio::test]
async fn test_new_contact_is_listed_with_server_id() -> Result<()> {
    let (backend, _identity, api) = signed_in();

    let contact = NewEmergencyContact {
        name: "María González".to_string(),
        phone: "+56912345678".to_string(),
        relationship: "Madre".to_string(),
        ..Default::default()
    };
    let created = api.create_emergency_contact(&contact).await?;

    let contacts = api.get_emergency_contacts().await?;
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].id, created.id);
    assert!(!contacts[0].id.is_empty());
    assert_eq!(contacts[0].name, "María González");

    let stored = backend.collection("emergency-contacts");
    assert_eq!(stored[0]["contact_name"], "María González");
    assert_eq!(stored[0]["phone_number"], "+56912345678");

    Ok(())
}

#[tokio::test]
async fn test_set_primary_keeps_exactly_one_primary() -> Result<()> {
    let (backend, _identity, api) = signed_in();
    let mut store = AddressStore::new(api.clone());
    store.mount().await?;

    let home = store.create(&home_address()).await?;
    let work = store
        .create(&NewAddress {
            street: "Av. Apoquindo 3000".to_string(),
            label: Some("Trabajo".to_string()),
            ..home_address()
        })
        .await?;

    store.set_primary(&home.id).await?;
    store.set_primary(&work.id).await?;

    let primaries: Vec<_> = store.items().iter().filter(|a| a.is_primary).collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0].id, work.id);

    // the server agrees with the cached list
    let refetched = api.get_addresses().await?;
    assert_eq!(refetched.iter().filter(|a| a.is_primary).count(), 1);
    assert_eq!(backend.collection("addresses").len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_dashboard_reports_onboarding() -> Result<()> {
    let (_backend, _identity, api) = signed_in();

    let before = load_dashboard(&api).await;
    assert!(!before.has_completed_onboarding());
    assert!(before.medical_info.is_none());

    let mut contacts = EmergencyContactStore::new(api.clone());
    contacts
        .create(&NewEmergencyContact {
            name: "Pedro González".to_string(),
            phone: "+56987654321".to_string(),
            relationship: "Hermano".to_string(),
            ..Default::default()
        })
        .await?;

    let after = load_dashboard(&api).await;
    assert!(after.has_completed_onboarding());
    assert_eq!(after.contacts.len(), 1);

    Ok(())
}
