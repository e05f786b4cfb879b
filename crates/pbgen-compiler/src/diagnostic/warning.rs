//! Non-fatal findings collected while compiling a schema.
//!
//! Warnings never stop compilation. They travel back to the caller inside
//! the IR so a front end can decide whether to print, log, or ignore them.

use std::fmt;
use serde::Serialize;

/// A non-fatal finding about one field of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// An optional field with an unknown type was generated as `Option<String>`.
    LossyFallback {
        collection: String,
        field: String,
        #[serde(rename = "fieldType")]
        field_type: String,
    },

    /// Two raw names normalized to the same identifier; the later one was renamed.
    IdentifierCollision {
        collection: String,
        field: String,
        identifier: String,
    },

    /// A required field was excluded because it is hidden or system-managed.
    SkippedHiddenRequired {
        collection: String,
        field: String,
    },
}

impl Warning {
    /// Name of the collection the warning refers to.
    pub fn collection(&self) -> &str {
        match self {
            Warning::LossyFallback { collection, .. }
            | Warning::IdentifierCollision { collection, .. }
            | Warning::SkippedHiddenRequired { collection, .. } => collection,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::LossyFallback { collection, field, field_type } => write!(
                f,
                "{}.{}: unknown type '{}', generated as Option<String>",
                collection, field, field_type
            ),
            Warning::IdentifierCollision { collection, field, identifier } => write!(
                f,
                "{}.{}: identifier already taken, renamed to {}",
                collection, field, identifier
            ),
            Warning::SkippedHiddenRequired { collection, field } => write!(
                f,
                "{}.{}: required but hidden, left out of the generated model",
                collection, field
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let warning = Warning::LossyFallback {
            collection: "places".to_string(),
            field: "location".to_string(),
            field_type: "geoPoint".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "places.location: unknown type 'geoPoint', generated as Option<String>"
        );
        assert_eq!(warning.collection(), "places");
    }

    #[test]
    fn test_serialize_tagged() {
        let warning = Warning::SkippedHiddenRequired {
            collection: "users".to_string(),
            field: "tokenKey".to_string(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "skipped_hidden_required");
        assert_eq!(json["field"], "tokenKey");
    }
}
