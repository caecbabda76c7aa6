//! Emergency contacts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::list::{Keyed, Primary};
use crate::validation::{require, validate_email, validate_phone, ValidationResult};
use crate::wire::{tables, wire_format, WireFormat};

/// Person to call on the user's behalf
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    pub phone: String,
    /// "Madre", "Hermano", ...
    #[serde(default)]
    pub relationship: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContactUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

wire_format!(
    WireFormat::Table(&tables::EMERGENCY_CONTACT) =>
    EmergencyContact, NewEmergencyContact, EmergencyContactUpdate
);

impl NewEmergencyContact {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.merge(require("name", &self.name));
        result.merge(validate_phone("phone", &self.phone));
        result.merge(require("relationship", &self.relationship));
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            result.merge(validate_email("email", email));
        }
        result
    }
}

impl EmergencyContactUpdate {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(name) = &self.name {
            result.merge(require("name", name));
        }
        if let Some(phone) = &self.phone {
            result.merge(validate_phone("phone", phone));
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            result.merge(validate_email("email", email));
        }
        result
    }
}

impl Keyed for EmergencyContact {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Primary for EmergencyContact {
    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn set_primary(&mut self, primary: bool) {
        self.is_primary = primary;
    }
}
