//! Field kind to Rust type mapping.

use crate::ir::{Accessor, TargetType};

/// Result of mapping one field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    /// Target type with optionality stripped.
    pub target: TargetType,
    /// Whether the generated field is wrapped in `Option`.
    pub is_pointer: bool,
    /// How generated code reads and writes the field.
    pub accessor: Accessor,
    /// The kind was not recognized and fell back to a string.
    pub fallback: bool,
}

impl TypeMapping {
    /// Full Rust type name, including the `Option` wrapper.
    pub fn type_name(&self) -> String {
        if self.is_pointer {
            format!("Option<{}>", self.target.rust_type())
        } else {
            self.target.rust_type().to_string()
        }
    }

    /// Rust type name with optionality stripped.
    pub fn base_type(&self) -> &'static str {
        self.target.rust_type()
    }
}

/// Maps a field kind and its required flag to a Rust type.
///
/// Scalars become `Option<_>` when not required. Dates, id lists and JSON
/// values are never wrapped: they have a natural empty value the wire format
/// does not distinguish from absence.
pub fn map_type(kind: &str, required: bool) -> TypeMapping {
    let (target, fallback) = match kind.to_ascii_lowercase().as_str() {
        "text" | "editor" | "longtext" | "url" | "email" | "select" | "password" => {
            (TargetType::Text, false)
        }
        "bool" | "boolean" => (TargetType::Bool, false),
        "number" => (TargetType::Number, false),
        "date" | "autodate" => (TargetType::DateTime, false),
        "relation" | "file" => (TargetType::IdList, false),
        "json" => (TargetType::Json, false),
        _ => (TargetType::Text, true),
    };

    let is_pointer = !required && target.is_nullable();
    let accessor = match target {
        TargetType::DateTime => Accessor::Timestamp,
        TargetType::IdList => Accessor::List,
        TargetType::Json => Accessor::Json,
        _ if is_pointer => Accessor::Optional,
        _ => Accessor::Direct,
    };

    TypeMapping {
        target,
        is_pointer,
        accessor,
        fallback,
    }
}
