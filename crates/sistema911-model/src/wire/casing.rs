//! Generic key-caser
//!
//! Re-cases object keys between camelCase (UI dialect) and snake_case (wire
//! dialect), walking nested objects and arrays. Values are never touched.

use serde_json::{Map, Value};

/// `blood_type` -> `bloodType`. Only `_` followed by a lowercase ASCII letter
/// is folded; anything else is kept as-is.
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    out.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// `bloodType` -> `blood_type`. Every uppercase ASCII letter becomes `_` plus
/// its lowercase form.
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Recursively re-case every object key to camelCase.
pub fn keys_to_camel_case(value: Value) -> Value {
    rekey(value, &to_camel_case)
}

/// Recursively re-case every object key to snake_case.
pub fn keys_to_snake_case(value: Value) -> Value {
    rekey(value, &to_snake_case)
}

fn rekey(value: Value, case: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(|v| rekey(v, case)).collect()),
        Value::Object(fields) => {
            let mut out = Map::with_capacity(fields.len());
            for (key, v) in fields {
                out.insert(case(&key), rekey(v, case));
            }
            Value::Object(out)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_single_keys() {
        assert_eq!(to_camel_case("blood_type"), "bloodType");
        assert_eq!(to_camel_case("assigned_agent_id"), "assignedAgentId");
        assert_eq!(to_camel_case("id"), "id");
        assert_eq!(to_snake_case("bloodType"), "blood_type");
        assert_eq!(to_snake_case("assignedAgentId"), "assigned_agent_id");
    }

    #[test]
    fn test_unusual_keys_pass_through() {
        // Only `_[a-z]` is folded
        assert_eq!(to_camel_case("a__b"), "a_B");
        assert_eq!(to_camel_case("line_1"), "line_1");
        assert_eq!(to_camel_case("trailing_"), "trailing_");
    }

    #[test]
    fn test_nested_objects_and_arrays() {
        let ui = json!({
            "contactInfo": { "phone": "+56911111111", "alternativePhone": "+56922222222" },
            "medicalInfo": {
                "allergies": ["Penicilina"],
                "emergencyContact": { "name": "Ana", "phone": "+56933333333", "relationship": "Hermana" }
            },
            "history": [{ "changedAt": "2024-01-01T00:00:00Z" }]
        });

        let wire = keys_to_snake_case(ui.clone());
        assert_eq!(wire["contact_info"]["alternative_phone"], "+56922222222");
        assert_eq!(wire["medical_info"]["emergency_contact"]["name"], "Ana");
        assert_eq!(wire["history"][0]["changed_at"], "2024-01-01T00:00:00Z");
        // Values are never re-cased
        assert_eq!(wire["medical_info"]["allergies"][0], "Penicilina");

        assert_eq!(keys_to_camel_case(wire), ui);
    }

    #[test]
    fn test_scalars_untouched() {
        assert_eq!(keys_to_snake_case(json!("someValue")), json!("someValue"));
        assert_eq!(keys_to_camel_case(json!(null)), json!(null));
    }

    proptest! {
        #[test]
        fn prop_camel_keys_round_trip(key in "[a-z]{1,8}([A-Z][a-z]{1,8}){0,3}") {
            prop_assert_eq!(to_camel_case(&to_snake_case(&key)), key);
        }

        #[test]
        fn prop_records_round_trip(
            keys in proptest::collection::vec("[a-z]{1,6}([A-Z][a-z]{1,6}){0,2}", 1..6),
            nested in "[a-z]{1,6}[A-Z][a-z]{1,6}",
        ) {
            let mut record = Map::new();
            for (i, key) in keys.iter().enumerate() {
                record.insert(key.clone(), json!(i));
            }
            let mut inner = Map::new();
            inner.insert(nested.clone(), json!(true));
            record.insert(nested, Value::Array(vec![Value::Object(inner)]));
            let original = Value::Object(record);

            prop_assert_eq!(keys_to_camel_case(keys_to_snake_case(original.clone())), original);
        }
    }
}
