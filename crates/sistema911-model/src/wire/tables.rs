//! Per-entity field tables
//!
//! Each table lists every `(ui_key, wire_key)` pair of one entity in one
//! schema version. Tables are bijective and only touch the top-level keys of
//! an object (or of each object in an array). Keys a table does not know pass
//! through unchanged.

use serde_json::{Map, Value};

/// Explicit rename table for one entity in one schema version
#[derive(Debug, PartialEq, Eq)]
pub struct FieldTable {
    pub entity: &'static str,
    pub pairs: &'static [(&'static str, &'static str)],
}

impl FieldTable {
    /// Wire name for a UI key, if the table knows it
    pub fn wire_key(&self, ui_key: &str) -> Option<&'static str> {
        self.pairs.iter().find(|(ui, _)| *ui == ui_key).map(|(_, wire)| *wire)
    }

    /// UI name for a wire key, if the table knows it
    pub fn ui_key(&self, wire_key: &str) -> Option<&'static str> {
        self.pairs.iter().find(|(_, wire)| *wire == wire_key).map(|(ui, _)| *ui)
    }

    /// Rename UI keys to wire keys
    pub fn to_wire(&self, value: Value) -> Value {
        self.rename(value, |key| self.wire_key(key))
    }

    /// Rename wire keys to UI keys
    pub fn from_wire(&self, value: Value) -> Value {
        self.rename(value, |key| self.ui_key(key))
    }

    fn rename(&self, value: Value, lookup: impl Fn(&str) -> Option<&'static str> + Copy) -> Value {
        match value {
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|v| self.rename(v, lookup)).collect())
            }
            Value::Object(fields) => {
                let mut out = Map::with_capacity(fields.len());
                for (key, v) in fields {
                    let renamed = lookup(&key).map(str::to_string).unwrap_or(key);
                    out.insert(renamed, v);
                }
                Value::Object(out)
            }
            other => other,
        }
    }
}

pub static ADDRESS: FieldTable = FieldTable {
    entity: "address",
    pairs: &[
        ("id", "id"),
        ("userId", "user_id"),
        ("street", "street_address"),
        ("city", "city"),
        ("state", "region"),
        ("country", "country"),
        ("postalCode", "postal_code"),
        ("isPrimary", "is_primary"),
        ("label", "address_type"),
        ("additionalInfo", "additional_info"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
};

pub static EMERGENCY_CONTACT: FieldTable = FieldTable {
    entity: "emergency_contact",
    pairs: &[
        ("id", "id"),
        ("userId", "user_id"),
        ("name", "contact_name"),
        ("phone", "phone_number"),
        ("relationship", "relationship"),
        ("email", "email"),
        ("address", "address"),
        ("isPrimary", "is_primary"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
};

pub static HEALTH_INSURANCE: FieldTable = FieldTable {
    entity: "health_insurance",
    pairs: &[
        ("id", "id"),
        ("userId", "user_id"),
        ("providerName", "provider_name"),
        ("planName", "plan_name"),
        ("memberId", "member_id"),
        ("groupNumber", "group_number"),
        ("coverageInfo", "coverage_info"),
        ("startDate", "start_date"),
        ("endDate", "end_date"),
        ("isPrimary", "primary_provider"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
};

/// provider / policyNumber shape used by the first onboarding flow
pub static HEALTH_INSURANCE_LEGACY: FieldTable = FieldTable {
    entity: "health_insurance_legacy",
    pairs: &[
        ("id", "id"),
        ("userId", "userId"),
        ("providerName", "provider"),
        ("planName", "planName"),
        ("memberId", "policyNumber"),
        ("groupNumber", "groupNumber"),
        ("coverageInfo", "coverageType"),
        ("startDate", "startDate"),
        ("endDate", "endDate"),
        ("isPrimary", "isPrimary"),
        ("createdAt", "createdAt"),
        ("updatedAt", "updatedAt"),
    ],
};

pub static BANK_ACCOUNT: FieldTable = FieldTable {
    entity: "bank_account",
    pairs: &[
        ("id", "id"),
        ("userId", "user_id"),
        ("bankName", "bank_name"),
        ("accountNumber", "account_number"),
        ("accountType", "account_type"),
        ("holderName", "account_holder_name"),
        ("routingNumber", "routing_number"),
        ("swiftCode", "swift_code"),
        ("nationalId", "rut"),
        ("isPrimary", "is_primary"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
};

/// camelCase shape with holder name and routing/SWIFT codes
pub static BANK_ACCOUNT_LEGACY: FieldTable = FieldTable {
    entity: "bank_account_legacy",
    pairs: &[
        ("id", "id"),
        ("userId", "userId"),
        ("bankName", "bankName"),
        ("accountNumber", "accountNumber"),
        ("accountType", "accountType"),
        ("holderName", "accountHolderName"),
        ("routingNumber", "routingNumber"),
        ("swiftCode", "swiftCode"),
        ("nationalId", "rut"),
        ("isPrimary", "isPrimary"),
        ("createdAt", "createdAt"),
        ("updatedAt", "updatedAt"),
    ],
};

pub static ALL_TABLES: [&FieldTable; 6] = [
    &ADDRESS,
    &EMERGENCY_CONTACT,
    &HEALTH_INSURANCE,
    &HEALTH_INSURANCE_LEGACY,
    &BANK_ACCOUNT,
    &BANK_ACCOUNT_LEGACY,
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_tables_are_bijective() {
        for table in ALL_TABLES {
            let ui: HashSet<_> = table.pairs.iter().map(|(u, _)| *u).collect();
            let wire: HashSet<_> = table.pairs.iter().map(|(_, w)| *w).collect();
            assert_eq!(ui.len(), table.pairs.len(), "duplicate UI key in {}", table.entity);
            assert_eq!(wire.len(), table.pairs.len(), "duplicate wire key in {}", table.entity);
        }
    }

    #[test]
    fn test_address_street_round_trip() {
        let ui = json!({ "street": "Av. Providencia 1234", "state": "RM", "isPrimary": true });

        let wire = ADDRESS.to_wire(ui.clone());
        assert_eq!(wire, json!({ "street_address": "Av. Providencia 1234", "region": "RM", "is_primary": true }));

        assert_eq!(ADDRESS.from_wire(wire), ui);
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let wire = ADDRESS.to_wire(json!({ "street": "X", "someOtherField": 1 }));
        assert_eq!(wire["street_address"], "X");
        assert_eq!(wire["someOtherField"], 1);

        let ui = EMERGENCY_CONTACT.from_wire(json!({ "contact_name": "Ana", "priority_order": 2 }));
        assert_eq!(ui["name"], "Ana");
        assert_eq!(ui["priority_order"], 2);
    }

    #[test]
    fn test_arrays_map_each_element() {
        let wire = json!([
            { "id": "a1", "contact_name": "María", "phone_number": "+56912345678" },
            { "id": "a2", "contact_name": "Pedro", "phone_number": "+56987654321" }
        ]);

        let ui = EMERGENCY_CONTACT.from_wire(wire);
        assert_eq!(ui[0]["name"], "María");
        assert_eq!(ui[1]["phone"], "+56987654321");
    }

    #[test]
    fn test_insurance_dialects_differ() {
        let ui = json!({ "providerName": "Isapre Cruz Blanca", "memberId": "POL-123456789", "isPrimary": true });

        let current = HEALTH_INSURANCE.to_wire(ui.clone());
        assert_eq!(current["provider_name"], "Isapre Cruz Blanca");
        assert_eq!(current["member_id"], "POL-123456789");
        assert_eq!(current["primary_provider"], true);

        let legacy = HEALTH_INSURANCE_LEGACY.to_wire(ui.clone());
        assert_eq!(legacy["provider"], "Isapre Cruz Blanca");
        assert_eq!(legacy["policyNumber"], "POL-123456789");
        assert_eq!(legacy["isPrimary"], true);

        assert_eq!(HEALTH_INSURANCE.from_wire(current), ui);
        assert_eq!(HEALTH_INSURANCE_LEGACY.from_wire(legacy), ui);
    }

    #[test]
    fn test_bank_account_national_id_is_rut() {
        assert_eq!(BANK_ACCOUNT.wire_key("nationalId"), Some("rut"));
        assert_eq!(BANK_ACCOUNT_LEGACY.wire_key("nationalId"), Some("rut"));
        assert_eq!(BANK_ACCOUNT.ui_key("account_holder_name"), Some("holderName"));
        assert_eq!(BANK_ACCOUNT_LEGACY.ui_key("accountHolderName"), Some("holderName"));
    }
}
