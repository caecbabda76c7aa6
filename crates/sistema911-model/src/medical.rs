//! Medical information
//!
//! A singleton per user. The record may not exist yet; the backend answers
//! 404 in that case and clients treat it as "no data".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{validate_blood_type, ValidationResult};
use crate::wire::{wire_format, WireFormat};

/// Medical data responders see during an emergency
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full record for create and upsert
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalInfoInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalInfoUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

wire_format!(WireFormat::Cased => MedicalInfo, MedicalInfoInput, MedicalInfoUpdate);

/// Trim every entry and drop the blank ones, keeping order.
fn clean_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

fn clean_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

impl MedicalInfoInput {
    /// Form input as it should be stored: blank list entries dropped, empty
    /// blood type and notes unset.
    pub fn normalized(self) -> Self {
        Self {
            blood_type: clean_text(self.blood_type).map(|b| b.to_ascii_uppercase()),
            allergies: clean_entries(self.allergies),
            medications: clean_entries(self.medications),
            conditions: clean_entries(self.conditions),
            notes: clean_text(self.notes),
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(blood_type) = &self.blood_type {
            result.merge(validate_blood_type("bloodType", blood_type));
        }
        result
    }
}

impl MedicalInfoUpdate {
    pub fn normalized(self) -> Self {
        Self {
            blood_type: clean_text(self.blood_type).map(|b| b.to_ascii_uppercase()),
            allergies: self.allergies.map(clean_entries),
            medications: self.medications.map(clean_entries),
            conditions: self.conditions.map(clean_entries),
            notes: clean_text(self.notes),
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(blood_type) = &self.blood_type {
            result.merge(validate_blood_type("bloodType", blood_type));
        }
        result
    }
}

impl MedicalInfo {
    /// True when nothing useful has been recorded
    pub fn is_empty(&self) -> bool {
        self.blood_type.is_none()
            && self.allergies.is_empty()
            && self.medications.is_empty()
            && self.conditions.is_empty()
            && self.notes.is_none()
    }
}
