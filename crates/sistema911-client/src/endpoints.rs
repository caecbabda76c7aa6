//! Backend paths, relative to the configured API prefix
//!
//! Ids, RUTs, phones and emails are percent-encoded as single path segments
//! or query values.

use urlencoding::encode;

pub const AUTH_REGISTER: &str = "/auth/register";
pub const AUTH_LOGOUT: &str = "/auth/logout";
pub const AUTH_VERIFY_EMAIL: &str = "/auth/verify-email";
pub const USERS_ME: &str = "/users/me";
pub const ADDRESSES: &str = "/addresses";
pub const EMERGENCY_CONTACTS: &str = "/emergency-contacts";
pub const MEDICAL_INFO: &str = "/medical-info";
pub const HEALTH_INSURANCE: &str = "/health-insurance";
pub const BANK_ACCOUNTS: &str = "/bank-accounts";
pub const EMERGENCY_EVENTS: &str = "/emergency-events";

/// `{collection}/{id}`
pub fn item(collection: &str, id: &str) -> String {
    format!("{}/{}", collection, encode(id))
}

pub fn address_primary(id: &str) -> String {
    format!("{}/primary", item(ADDRESSES, id))
}

pub fn user_by_rut(rut: &str) -> String {
    format!("/users/rut/{}", encode(rut))
}

pub fn user_by_phone(phone: &str) -> String {
    format!("/users/phone/{}", encode(phone))
}

pub fn check_email(email: &str) -> String {
    format!("/auth/check-email?email={}", encode(email))
}
