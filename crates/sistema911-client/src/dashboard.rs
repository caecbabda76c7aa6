//! Dashboard aggregate
//!
//! Loads everything the dashboard shows in one concurrent fan-out. A failing
//! fetch is logged and replaced by an empty result so one broken endpoint
//! never blanks the whole page.

use futures::join;
use serde::Serialize;
use sistema911_model::{
    mask_account_number, Address, BankAccount, EmergencyContact, EmergencyEvent, HealthInsurance,
    MedicalInfo, User,
};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ApiError;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub profile: Option<User>,
    pub addresses: Vec<Address>,
    pub contacts: Vec<EmergencyContact>,
    pub events: Vec<EmergencyEvent>,
    pub bank_accounts: Vec<BankAccount>,
    pub insurances: Vec<HealthInsurance>,
    pub medical_info: Option<MedicalInfo>,
    /// Which sections could not be loaded
    pub failed: Vec<&'static str>,
}

impl DashboardSnapshot {
    /// Onboarding counts as done once the user has an address or a contact
    pub fn has_completed_onboarding(&self) -> bool {
        !self.addresses.is_empty() || !self.contacts.is_empty()
    }

    /// `(bank name, masked account number)` for display
    pub fn masked_accounts(&self) -> Vec<(String, String)> {
        self.bank_accounts
            .iter()
            .map(|a| (a.bank_name.clone(), mask_account_number(&a.account_number)))
            .collect()
    }

    pub fn open_events(&self) -> impl Iterator<Item = &EmergencyEvent> {
        self.events.iter().filter(|e| e.is_open())
    }
}

fn or_empty<T: Default>(section: &'static str, result: Result<T, ApiError>, failed: &mut Vec<&'static str>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(section, error = %err, "dashboard section failed to load");
            failed.push(section);
            T::default()
        }
    }
}

/// Fetch the seven dashboard sections concurrently
pub async fn load_dashboard(api: &ApiClient) -> DashboardSnapshot {
    let (profile, addresses, contacts, events, bank_accounts, insurances, medical_info) = join!(
        api.get_profile(),
        api.get_addresses(),
        api.get_emergency_contacts(),
        api.get_emergency_events(),
        api.get_bank_accounts(),
        api.get_health_insurances(),
        api.get_medical_info(),
    );

    let mut failed = Vec::new();
    let snapshot = DashboardSnapshot {
        profile: or_empty("profile", profile.map(Some), &mut failed),
        addresses: or_empty("addresses", addresses, &mut failed),
        contacts: or_empty("emergency_contacts", contacts, &mut failed),
        events: or_empty("emergency_events", events, &mut failed),
        bank_accounts: or_empty("bank_accounts", bank_accounts, &mut failed),
        insurances: or_empty("health_insurance", insurances, &mut failed),
        medical_info: or_empty("medical_info", medical_info, &mut failed),
        failed: Vec::new(),
    };

    info!(failed = failed.len(), "dashboard loaded");
    DashboardSnapshot { failed, ..snapshot }
}
