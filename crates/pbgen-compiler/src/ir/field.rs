//! Processed field intermediate representation.

use serde::Serialize;

/// Rust type a field maps to, with optionality stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetType {
    /// `String`
    Text,
    /// `bool`
    Bool,
    /// `f64`
    Number,
    /// `pbgen_runtime::DateTime`
    DateTime,
    /// `Vec<String>` of record or file identifiers.
    IdList,
    /// `serde_json::Value`
    Json,
}

impl TargetType {
    /// Rust type name as written in generated code.
    pub fn rust_type(&self) -> &'static str {
        match self {
            TargetType::Text => "String",
            TargetType::Bool => "bool",
            TargetType::Number => "f64",
            TargetType::DateTime => "DateTime",
            TargetType::IdList => "Vec<String>",
            TargetType::Json => "serde_json::Value",
        }
    }

    /// Whether an optional field of this type is wrapped in `Option`.
    ///
    /// Dates, lists and JSON carry their own empty value.
    pub fn is_nullable(&self) -> bool {
        matches!(self, TargetType::Text | TargetType::Bool | TargetType::Number)
    }

    /// Runtime item the generated code must import, if any.
    pub fn import(&self) -> Option<&'static str> {
        match self {
            TargetType::DateTime => Some("DateTime"),
            _ => None,
        }
    }
}

/// How generated code reads a field from and writes it to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Accessor {
    /// Plain value, zero value when missing.
    Direct,
    /// `Option<_>`, `None` when missing; the setter takes the unwrapped value.
    Optional,
    /// Timestamp, zero timestamp when missing.
    Timestamp,
    /// List of identifiers, empty when missing.
    List,
    /// Raw JSON value, `null` when missing.
    Json,
}

/// A field after dialect rules, type mapping and naming have been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedField {
    /// PascalCase identifier, unique within the collection.
    pub identifier: String,

    /// Original field key, used on the wire.
    pub key: String,

    /// Full Rust type name (e.g. `Option<String>`).
    pub type_name: String,

    /// Rust type name without the `Option` wrapper.
    pub base_type: String,

    /// Whether the field is wrapped in `Option`.
    pub is_pointer: bool,

    /// Read/write strategy for generated code.
    pub accessor: Accessor,

    /// Target type with optionality stripped.
    pub target: TargetType,
}

impl ProcessedField {
    /// Record getter the generated code calls for this field.
    pub fn getter(&self) -> &'static str {
        match (self.target, self.accessor) {
            (TargetType::Text, Accessor::Optional) => "get_optional_string",
            (TargetType::Bool, Accessor::Optional) => "get_optional_bool",
            (TargetType::Number, Accessor::Optional) => "get_optional_number",
            (TargetType::Text, _) => "get_string",
            (TargetType::Bool, _) => "get_bool",
            (TargetType::Number, _) => "get_number",
            (TargetType::DateTime, _) => "get_datetime",
            (TargetType::IdList, _) => "get_string_list",
            (TargetType::Json, _) => "get_json",
        }
    }
}
