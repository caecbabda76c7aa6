//! Emergency events
//!
//! An event is created when the user submits an emergency request. Status
//! transitions belong to the backend and its agents; the client reads events
//! and may cancel one that is still open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::list::Keyed;
use crate::validation::{require, validate_coordinates, validate_phone, ValidationResult};
use crate::wire::{wire_format, WireFormat};

/// Kind of emergency
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyKind {
    #[default]
    Medical,
    Fire,
    Security,
    Technical,
    #[serde(other)]
    Other,
}

impl EmergencyKind {
    pub const ALL: [EmergencyKind; 5] = [
        EmergencyKind::Medical,
        EmergencyKind::Fire,
        EmergencyKind::Security,
        EmergencyKind::Technical,
        EmergencyKind::Other,
    ];

    /// Label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            EmergencyKind::Medical => "Emergencia Médica",
            EmergencyKind::Fire => "Incendio",
            EmergencyKind::Security => "Seguridad",
            EmergencyKind::Technical => "Técnica",
            EmergencyKind::Other => "Otra",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmergencyKind::Medical => "medical",
            EmergencyKind::Fire => "fire",
            EmergencyKind::Security => "security",
            EmergencyKind::Technical => "technical",
            EmergencyKind::Other => "other",
        }
    }
}

impl fmt::Display for EmergencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Cancelled,
}

impl EventStatus {
    /// Resolved and cancelled events never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventStatus::Resolved | EventStatus::Cancelled)
    }

    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventStatus::Pending => "pending",
            EventStatus::InProgress => "in_progress",
            EventStatus::Resolved => "resolved",
            EventStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// How responders reach the person in trouble
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

/// Medical data copied into the event at submission time
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalSnapshot {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allergies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medications: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmbeddedContact>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyEvent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: EmergencyKind,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_info: Option<MedicalSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent_id: Option<String>,
}

impl EmergencyEvent {
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// Emergency request as submitted by the user
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmergencyEvent {
    #[serde(rename = "type")]
    pub kind: EmergencyKind,
    pub priority: Priority,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
    pub contact_info: ContactInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_info: Option<MedicalSnapshot>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyEventUpdate {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EmergencyKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_info: Option<MedicalSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl EmergencyEventUpdate {
    /// The update sent when the user cancels a request
    pub fn cancel() -> Self {
        Self {
            status: Some(EventStatus::Cancelled),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(description) = &self.description {
            result.merge(require("description", description));
        }
        if let Some(contact) = &self.contact_info {
            result.merge(validate_phone("contactInfo.phone", &contact.phone));
        }
        if let Some(location) = &self.location {
            result.merge(validate_coordinates(location.latitude, location.longitude));
        }
        result
    }
}

wire_format!(WireFormat::Cased => EmergencyEvent, NewEmergencyEvent, EmergencyEventUpdate);

impl NewEmergencyEvent {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.merge(require("description", &self.description));
        result.merge(validate_phone("contactInfo.phone", &self.contact_info.phone));
        if let Some(alt) = self
            .contact_info
            .alternative_phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
        {
            result.merge(validate_phone("contactInfo.alternativePhone", alt));
        }
        if let Some(location) = &self.location {
            result.merge(validate_coordinates(location.latitude, location.longitude));
        }
        result
    }
}

impl Keyed for EmergencyEvent {
    fn key(&self) -> &str {
        &self.id
    }
}
