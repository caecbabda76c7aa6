//! Wire dialect mapping
//!
//! The UI-facing form of every entity is its camelCase serde representation.
//! The backend speaks a different dialect, and not uniformly: some entities
//! are plain snake_case, some rename fields, and insurance and bank accounts
//! exist in two incompatible shapes. Each type therefore declares exactly one
//! [`WireFormat`] per [`SchemaVersion`]; the generic key-caser and the field
//! tables are never combined for the same entity.

pub mod casing;
pub mod tables;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub use casing::{keys_to_camel_case, keys_to_snake_case, to_camel_case, to_snake_case};
pub use tables::FieldTable;

/// Which backend dialect the insurance and bank-account endpoints speak
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// snake_case shape (`provider_name`, `member_id`, `rut`, ...)
    #[default]
    Current,
    /// camelCase shape (`provider`, `policyNumber`, `accountHolderName`, ...)
    Legacy,
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::Current => write!(f, "current"),
            SchemaVersion::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(SchemaVersion::Current),
            "legacy" => Ok(SchemaVersion::Legacy),
            other => Err(format!("unknown schema version '{}' (expected current or legacy)", other)),
        }
    }
}

/// How one entity's UI record maps onto the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireFormat {
    /// Sent and received exactly as serialized
    Verbatim,
    /// Generic recursive key-caser (camelCase <-> snake_case)
    Cased,
    /// Explicit per-entity rename table
    Table(&'static FieldTable),
}

impl WireFormat {
    /// UI record -> wire record
    pub fn outbound(&self, value: Value) -> Value {
        match self {
            WireFormat::Verbatim => value,
            WireFormat::Cased => keys_to_snake_case(value),
            WireFormat::Table(table) => table.to_wire(value),
        }
    }

    /// Wire record -> UI record
    pub fn inbound(&self, value: Value) -> Value {
        match self {
            WireFormat::Verbatim => value,
            WireFormat::Cased => keys_to_camel_case(value),
            WireFormat::Table(table) => table.from_wire(value),
        }
    }
}

/// A type with a declared wire dialect
pub trait WireEntity {
    fn wire_format(schema: SchemaVersion) -> WireFormat;
}

/// Serialize `entity` and convert it to the wire dialect.
pub fn encode<T>(entity: &T, schema: SchemaVersion) -> Result<Value, serde_json::Error>
where
    T: Serialize + WireEntity,
{
    let ui = serde_json::to_value(entity)?;
    Ok(T::wire_format(schema).outbound(ui))
}

/// Convert a wire record to the UI dialect and deserialize it.
pub fn decode<T>(value: Value, schema: SchemaVersion) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + WireEntity,
{
    serde_json::from_value(T::wire_format(schema).inbound(value))
}

/// Decode a wire array. A `null` body decodes to an empty list.
pub fn decode_list<T>(value: Value, schema: SchemaVersion) -> Result<Vec<T>, serde_json::Error>
where
    T: DeserializeOwned + WireEntity,
{
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(T::wire_format(schema).inbound(value))
}

/// Declare the wire format of types that share one dialect regardless of
/// schema version.
macro_rules! wire_format {
    ($format:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl $crate::wire::WireEntity for $ty {
                fn wire_format(_schema: $crate::wire::SchemaVersion) -> $crate::wire::WireFormat {
                    $format
                }
            }
        )+
    };
}

pub(crate) use wire_format;
