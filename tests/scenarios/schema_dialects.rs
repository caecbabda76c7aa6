//! Schema Dialect Scenarios
//!
//! Insurance and bank accounts exist in two backend shapes. The client picks
//! one through `SchemaVersion` and every field must land under the name that
//! shape uses, and come back intact.

use anyhow::Result;
use sistema911_client::testing::{FakeIdentity, InMemoryBackend};
use sistema911_client::{ApiClient, ApiConfig, ApiError};
use sistema911_model::{AccountType, NewBankAccount, NewHealthInsurance, SchemaVersion};
use std::sync::Arc;

// ============================================================================//
// Setup
// ============================================================================//

fn setup(schema: SchemaVersion) -> (Arc<InMemoryBackend>, ApiClient) {
    let backend = Arc::new(InMemoryBackend::new());
    let identity = Arc::new(FakeIdentity::signed_in("uid-maria", "maria@example.com"));
    let api = ApiClient::new(ApiConfig::default().with_schema(schema), backend.clone(), identity);
    (backend, api)
}

fn insurance() -> NewHealthInsurance {
    NewHealthInsurance {
        provider_name: "Isapre Colmena".to_string(),
        plan_name: Some("Plan Oro".to_string()),
        member_id: "POL-2024-001".to_string(),
        is_primary: Some(true),
        ..Default::default()
    }
}

fn account() -> NewBankAccount {
    NewBankAccount {
        bank_name: "Banco de Chile".to_string(),
        account_number: "00123456789".to_string(),
        account_type: AccountType::Savings,
        holder_name: Some("María González".to_string()),
        national_id: Some("12.345.678-5".to_string()),
        ..Default::default()
    }
}

// ============================================================================//
// Health insurance
// ============================================================================//

#[tokio::test]
async fn test_current_insurance_shape() -> Result<()> {
    let (backend, api) = setup(SchemaVersion::Current);

    api.create_health_insurance(&insurance()).await?;
    let stored = backend.collection("health-insurance");
    assert_eq!(stored[0]["provider_name"], "Isapre Colmena");
    assert_eq!(stored[0]["member_id"], "POL-2024-001");
    assert_eq!(stored[0]["primary_provider"], true);

    let listed = api.get_health_insurances().await?;
    assert_eq!(listed[0].provider_name, "Isapre Colmena");
    assert!(listed[0].is_primary);

    Ok(())
}

#[tokio::test]
async fn test_legacy_insurance_shape() -> Result<()> {
    let (backend, api) = setup(SchemaVersion::Legacy);

    let created = api.create_health_insurance(&insurance()).await?;
    assert_eq!(created.member_id, "POL-2024-001");

    let stored = backend.collection("health-insurance");
    assert_eq!(stored[0]["provider"], "Isapre Colmena");
    assert_eq!(stored[0]["policyNumber"], "POL-2024-001");
    assert_eq!(stored[0]["planName"], "Plan Oro");
    assert!(stored[0].get("provider_name").is_none());

    let listed = api.get_health_insurances().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].provider_name, "Isapre Colmena");
    assert_eq!(listed[0].plan_name.as_deref(), Some("Plan Oro"));

    Ok(())
}

// ============================================================================//
// Bank accounts
// ============================================================================//

#[tokio::test]
async fn test_bank_account_shapes() -> Result<()> {
    let (current_backend, current) = setup(SchemaVersion::Current);
    current.create_bank_account(&account()).await?;
    let stored = current_backend.collection("bank-accounts");
    assert_eq!(stored[0]["account_holder_name"], "María González");
    assert_eq!(stored[0]["account_type"], "savings");
    assert_eq!(stored[0]["rut"], "12.345.678-5");

    let (legacy_backend, legacy) = setup(SchemaVersion::Legacy);
    legacy.create_bank_account(&account()).await?;
    let stored = legacy_backend.collection("bank-accounts");
    assert_eq!(stored[0]["accountHolderName"], "María González");
    assert_eq!(stored[0]["accountNumber"], "00123456789");
    assert_eq!(stored[0]["accountType"], "savings");

    let listed = legacy.get_bank_accounts().await?;
    assert_eq!(listed[0].holder_name.as_deref(), Some("María González"));
    assert_eq!(listed[0].masked_number(), "****6789");

    Ok(())
}

#[tokio::test]
async fn test_bad_rut_is_refused_locally() -> Result<()> {
    let (backend, api) = setup(SchemaVersion::Current);

    let input = NewBankAccount {
        national_id: Some("12.345.678-9".to_string()),
        ..account()
    };
    let err = api.create_bank_account(&input).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(backend.requests().is_empty());

    Ok(())
}
