//! Users, profiles and registration
//!
//! The identity provider owns credentials; the backend owns the profile. A
//! registration therefore produces two records, and [`RegistrationForm`]
//! carries everything both need.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::EmbeddedContact;
use crate::validation::{
    require, validate_blood_type, validate_email, validate_password, validate_phone, validate_rut,
    ValidationErrorCode, ValidationResult,
};
use crate::wire::{wire_format, WireFormat};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
    Agent,
}

fn default_active() -> bool {
    true
}

/// Backend profile of the signed-in user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Chilean national id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rut: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Full name if set, else first and last name, else the email
    pub fn display_name(&self) -> String {
        if let Some(full) = self.full_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return full.trim().to_string();
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }

    /// Either phone field, preferring `phone`
    pub fn contact_phone(&self) -> Option<&str> {
        self.phone
            .as_deref()
            .or(self.phone_number.as_deref())
            .filter(|p| !p.is_empty())
    }
}

/// Profile edit; only the fields that are set are sent
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rut: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(phone) = &self.phone {
            result.merge(validate_phone("phone", phone));
        }
        if let Some(rut) = &self.rut {
            result.merge(validate_rut("rut", rut));
        }
        result
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.merge(validate_email("email", &self.email));
        result.merge(require("password", &self.password));
        result
    }
}

/// Everything the sign-up page collects
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    /// Free text, comma separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmbeddedContact>,
}

impl RegistrationForm {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.merge(validate_email("email", &self.email));
        result.merge(validate_password("password", &self.password));
        if self.password != self.confirm_password {
            result.add_error(
                "confirmPassword",
                "las contraseñas no coinciden",
                ValidationErrorCode::Mismatch,
            );
        }
        if !self.accept_terms {
            result.add_error(
                "acceptTerms",
                "debes aceptar los términos y condiciones",
                ValidationErrorCode::Required,
            );
        }
        result.merge(require("firstName", &self.first_name));
        result.merge(require("lastName", &self.last_name));
        result.merge(validate_phone("phone", &self.phone));
        if let Some(blood_type) = self.blood_type.as_deref().filter(|b| !b.trim().is_empty()) {
            result.merge(validate_blood_type("bloodType", blood_type));
        }
        if let Some(contact) = &self.emergency_contact {
            result.merge(require("emergencyContact.name", &contact.name));
            result.merge(validate_phone("emergencyContact.phone", &contact.phone));
        }
        result
    }

    /// Display name given to the identity account
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Backend profile for the identity user `uid`. The password never
    /// leaves the identity provider.
    pub fn into_profile(self, uid: &str) -> RegistrationProfile {
        RegistrationProfile {
            uid: uid.to_string(),
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.unwrap_or_default(),
            blood_type: self.blood_type.unwrap_or_default(),
            allergies: self.allergies.unwrap_or_default(),
            medical_conditions: self.medical_conditions.unwrap_or_default(),
            emergency_contact: self.emergency_contact,
        }
    }
}

/// Body of `POST /auth/register`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationProfile {
    pub uid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub blood_type: String,
    pub allergies: String,
    pub medical_conditions: String,
    pub emergency_contact: Option<EmbeddedContact>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAvailability {
    pub available: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerification {
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

wire_format!(WireFormat::Cased => User, ProfileUpdate, EmailAvailability, EmailVerification);
wire_format!(WireFormat::Verbatim => RegistrationProfile, LoginCredentials);
