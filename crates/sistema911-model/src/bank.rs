//! Bank accounts
//!
//! Used by the backend to route emergency-related payments. Account numbers
//! are only ever displayed masked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::list::{Keyed, Primary};
use crate::validation::{require, validate_rut, ValidationResult};
use crate::wire::{tables, SchemaVersion, WireEntity, WireFormat};

/// Mask an account number for display: numbers of up to 4 characters are
/// returned unchanged, longer ones become `****` plus the last 4.
pub fn mask_account_number(number: &str) -> String {
    let count = number.chars().count();
    if count <= 4 {
        return number.to_string();
    }
    let last4: String = number.chars().skip(count - 4).collect();
    format!("****{}", last4)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Cuenta corriente
    #[default]
    Checking,
    /// Cuenta de ahorro
    Savings,
    #[serde(other)]
    Other,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Checking => write!(f, "Cuenta Corriente"),
            AccountType::Savings => write!(f, "Cuenta de Ahorro"),
            AccountType::Other => write!(f, "Otra"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub bank_name: String,
    pub account_number: String,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,
    /// Holder's RUT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

fn bank_account_format(schema: SchemaVersion) -> WireFormat {
    match schema {
        SchemaVersion::Current => WireFormat::Table(&tables::BANK_ACCOUNT),
        SchemaVersion::Legacy => WireFormat::Table(&tables::BANK_ACCOUNT_LEGACY),
    }
}

impl WireEntity for BankAccount {
    fn wire_format(schema: SchemaVersion) -> WireFormat {
        bank_account_format(schema)
    }
}

impl WireEntity for NewBankAccount {
    fn wire_format(schema: SchemaVersion) -> WireFormat {
        bank_account_format(schema)
    }
}

impl WireEntity for BankAccountUpdate {
    fn wire_format(schema: SchemaVersion) -> WireFormat {
        bank_account_format(schema)
    }
}

impl BankAccount {
    pub fn masked_number(&self) -> String {
        mask_account_number(&self.account_number)
    }
}

impl NewBankAccount {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.merge(require("bankName", &self.bank_name));
        result.merge(require("accountNumber", &self.account_number));
        if let Some(rut) = self.national_id.as_deref().filter(|r| !r.trim().is_empty()) {
            result.merge(validate_rut("nationalId", rut));
        }
        result
    }
}

impl BankAccountUpdate {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        if let Some(bank_name) = &self.bank_name {
            result.merge(require("bankName", bank_name));
        }
        if let Some(number) = &self.account_number {
            result.merge(require("accountNumber", number));
        }
        if let Some(rut) = self.national_id.as_deref().filter(|r| !r.trim().is_empty()) {
            result.merge(validate_rut("nationalId", rut));
        }
        result
    }
}

impl Keyed for BankAccount {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Primary for BankAccount {
    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn set_primary(&mut self, primary: bool) {
        self.is_primary = primary;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{decode, encode};
    use serde_json::json;

    #[test]
    fn test_mask_short_numbers_unchanged() {
        assert_eq!(mask_account_number(""), "");
        assert_eq!(mask_account_number("12"), "12");
        assert_eq!(mask_account_number("1234"), "1234");
    }

    #[test]
    fn test_mask_long_numbers() {
        assert_eq!(mask_account_number("12345"), "****2345");
        assert_eq!(mask_account_number("1234567890"), "****7890");
        assert_eq!(mask_account_number("00-123-456-789"), "****-789");
    }

    #[test]
    fn test_mask_counts_characters_not_bytes() {
        assert_eq!(mask_account_number("ñ1234"), "****1234");
        assert_eq!(mask_account_number("ññññ"), "ññññ");
    }

    #[test]
    fn test_current_schema_round_trip() {
        let input = NewBankAccount {
            bank_name: "Banco de Chile".to_string(),
            account_number: "1234567890".to_string(),
            account_type: AccountType::Checking,
            national_id: Some("12.345.678-5".to_string()),
            ..Default::default()
        };
        assert!(input.validate().is_valid());

        let wire = encode(&input, SchemaVersion::Current).unwrap();
        assert_eq!(
            wire,
            json!({
                "bank_name": "Banco de Chile",
                "account_number": "1234567890",
                "account_type": "checking",
                "rut": "12.345.678-5"
            })
        );
    }

    #[test]
    fn test_legacy_schema_decoding() {
        let account: BankAccount = decode(
            json!({
                "id": "b-1",
                "bankName": "Banco Santander",
                "accountNumber": "9876543210",
                "accountType": "savings",
                "accountHolderName": "Juan Pérez",
                "routingNumber": "002",
                "swiftCode": "SANXCLRM",
                "isPrimary": false
            }),
            SchemaVersion::Legacy,
        )
        .unwrap();

        assert_eq!(account.holder_name.as_deref(), Some("Juan Pérez"));
        assert_eq!(account.account_type, AccountType::Savings);
        assert_eq!(account.masked_number(), "****3210");
    }

    #[test]
    fn test_unknown_account_type_is_other() {
        let account: BankAccount = decode(
            json!({
                "id": "b-2",
                "bank_name": "BancoEstado",
                "account_number": "55501234",
                "account_type": "cuenta_rut"
            }),
            SchemaVersion::Current,
        )
        .unwrap();
        assert_eq!(account.account_type, AccountType::Other);
    }

    #[test]
    fn test_invalid_rut_rejected() {
        let input = NewBankAccount {
            bank_name: "Banco de Chile".to_string(),
            account_number: "1234567890".to_string(),
            national_id: Some("12345678-9".to_string()),
            ..Default::default()
        };
        assert!(!input.validate().is_valid());
    }
}
