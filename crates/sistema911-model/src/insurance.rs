//! Health insurance
//!
//! The backend has shipped two shapes for this entity. Both decode into the
//! same [`HealthInsurance`]; [`SchemaVersion`] selects the table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::list::{Keyed, Primary};
use crate::validation::{require, ValidationResult};
use crate::wire::{tables, SchemaVersion, WireEntity, WireFormat};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInsurance {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Isapre / Fonasa / insurer name
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    /// Member id or policy number
    #[serde(default)]
    pub member_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthInsurance {
    pub provider_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    pub member_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInsuranceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

fn insurance_format(schema: SchemaVersion) -> WireFormat {
    match schema {
        SchemaVersion::Current => WireFormat::Table(&tables::HEALTH_INSURANCE),
        SchemaVersion::Legacy => WireFormat::Table(&tables::HEALTH_INSURANCE_LEGACY),
    }
}

impl WireEntity for HealthInsurance {
    fn wire_format(schema: SchemaVersion) -> WireFormat {
        insurance_format(schema)
    }
}

impl WireEntity for NewHealthInsurance {
    fn wire_format(schema: SchemaVersion) -> WireFormat {
        insurance_format(schema)
    }
}

impl WireEntity for HealthInsuranceUpdate {
    fn wire_format(schema: SchemaVersion) -> WireFormat {
        insurance_format(schema)
    }
}

impl NewHealthInsurance {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.merge(require("providerName", &self.provider_name));
        result.merge(require("memberId", &self.member_id));
        result
    }
}

impl HealthInsuranceUpdate {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(provider) = &self.provider_name {
            result.merge(require("providerName", provider));
        }
        if let Some(member_id) = &self.member_id {
            result.merge(require("memberId", member_id));
        }
        result
    }
}

impl Keyed for HealthInsurance {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Primary for HealthInsurance {
    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn set_primary(&mut self, primary: bool) {
        self.is_primary = primary;
    }
}
