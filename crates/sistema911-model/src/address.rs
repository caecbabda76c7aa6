//! Addresses
//!
//! A user keeps any number of addresses; the backend guarantees at most one
//! of them is primary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::list::{Keyed, Primary};
use crate::validation::{require, ValidationResult};
use crate::wire::{tables, wire_format, WireFormat};

/// A registered address
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    /// Region, e.g. "Región Metropolitana"
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub is_primary: bool,
    /// "Casa", "Trabajo", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating an address
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// Partial update; only the fields that are set are sent
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

wire_format!(WireFormat::Table(&tables::ADDRESS) => Address, NewAddress, AddressUpdate);

impl NewAddress {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.merge(require("street", &self.street));
        result.merge(require("city", &self.city));
        result.merge(require("country", &self.country));
        result
    }
}

impl AddressUpdate {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(street) = &self.street {
            result.merge(require("street", street));
        }
        if let Some(city) = &self.city {
            result.merge(require("city", city));
        }
        result
    }
}

impl Address {
    /// One-line rendering used in listings
    pub fn summary(&self) -> String {
        let mut parts = vec![self.street.as_str(), self.city.as_str()];
        if !self.state.is_empty() {
            parts.push(self.state.as_str());
        }
        if !self.country.is_empty() {
            parts.push(self.country.as_str());
        }
        parts.retain(|p| !p.is_empty());
        parts.join(", ")
    }
}

impl Keyed for Address {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Primary for Address {
    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn set_primary(&mut self, primary: bool) {
        self.is_primary = primary;
    }
}
