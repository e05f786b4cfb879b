//! The model capability and the pieces generated models embed.

use serde_json::Value;

use crate::datetime::DateTime;
use crate::record::Record;

const ID_KEY: &str = "id";
const COLLECTION_ID_KEY: &str = "collectionId";
const COLLECTION_NAME_KEY: &str = "collectionName";
const CREATED_KEY: &str = "created";
const UPDATED_KEY: &str = "updated";

/// A typed view of a collection record.
///
/// The service never looks at a model beyond these methods, so generated
/// and hand-written models work the same way.
pub trait Model: Sized + Send {
    /// Builds the model from a property bag. Missing keys give zero values.
    fn from_record(record: &Record) -> Self;

    /// Converts the model to a property bag.
    fn to_record(&self) -> Record;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: &str);

    fn collection_id(&self) -> &str;

    fn collection_name(&self) -> &str;

    fn set_collection(&mut self, id: &str, name: &str);
}

/// Compile-time check that `T` implements [`Model`].
///
/// Generated code calls it in a `const` item so a model that stops
/// satisfying the trait fails to build.
pub const fn assert_model<T: Model>() {}

/// The bag itself is a model, for collections without generated code.
impl Model for Record {
    fn from_record(record: &Record) -> Self {
        record.clone()
    }

    fn to_record(&self) -> Record {
        self.clone()
    }

    fn id(&self) -> &str {
        str_field(self, ID_KEY)
    }

    fn set_id(&mut self, id: &str) {
        self.set(ID_KEY, id);
    }

    fn collection_id(&self) -> &str {
        str_field(self, COLLECTION_ID_KEY)
    }

    fn collection_name(&self) -> &str {
        str_field(self, COLLECTION_NAME_KEY)
    }

    fn set_collection(&mut self, id: &str, name: &str) {
        self.set(COLLECTION_ID_KEY, id);
        self.set(COLLECTION_NAME_KEY, name);
    }
}

fn str_field<'a>(record: &'a Record, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Collection identity every record carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordMeta {
    pub collection_id: String,
    pub collection_name: String,
}

impl RecordMeta {
    pub fn from_record(record: &Record) -> Self {
        Self {
            collection_id: record.get_string(COLLECTION_ID_KEY),
            collection_name: record.get_string(COLLECTION_NAME_KEY),
        }
    }

    /// Writes the non-empty parts back. The server ignores them on write.
    pub fn write_to(&self, record: &mut Record) {
        if !self.collection_id.is_empty() {
            record.set(COLLECTION_ID_KEY, self.collection_id.clone());
        }
        if !self.collection_name.is_empty() {
            record.set(COLLECTION_NAME_KEY, self.collection_name.clone());
        }
    }
}

/// `created`/`updated` pair that legacy-schema models embed instead of
/// declaring the two fields themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamps {
    pub created: DateTime,
    pub updated: DateTime,
}

impl Timestamps {
    pub fn from_record(record: &Record) -> Self {
        Self {
            created: record.get_datetime(CREATED_KEY),
            updated: record.get_datetime(UPDATED_KEY),
        }
    }

    /// Writes the timestamps that are set.
    pub fn write_to(&self, record: &mut Record) {
        if !self.created.is_zero() {
            record.set(CREATED_KEY, self.created);
        }
        if !self.updated.is_zero() {
            record.set(UPDATED_KEY, self.updated);
        }
    }
}

/// Models that carry server-managed timestamps.
pub trait HasTimestamps {
    fn timestamps(&self) -> &Timestamps;

    fn created(&self) -> DateTime {
        self.timestamps().created
    }

    fn updated(&self) -> DateTime {
        self.timestamps().updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_is_a_model() {
        let mut record: Record = serde_json::from_value(json!({
            "id": "abc",
            "collectionId": "pbc_1",
            "collectionName": "posts",
            "title": "hi",
        }))
        .unwrap();

        assert_eq!(Model::id(&record), "abc");
        assert_eq!(record.collection_name(), "posts");

        record.set_id("xyz");
        record.set_collection("pbc_2", "notes");
        assert_eq!(Model::id(&record), "xyz");
        assert_eq!(record.collection_id(), "pbc_2");
        assert_eq!(record.get_string("title"), "hi");
    }

    #[test]
    fn test_meta_roundtrip() {
        let record: Record =
            serde_json::from_value(json!({"collectionId": "c1", "collectionName": "posts"}))
                .unwrap();
        let meta = RecordMeta::from_record(&record);
        assert_eq!(meta.collection_name, "posts");

        let mut out = Record::new();
        RecordMeta::default().write_to(&mut out);
        assert!(out.is_empty());
        meta.write_to(&mut out);
        assert_eq!(out, record);
    }

    #[test]
    fn test_timestamps() {
        struct Legacy {
            timestamps: Timestamps,
        }
        impl HasTimestamps for Legacy {
            fn timestamps(&self) -> &Timestamps {
                &self.timestamps
            }
        }

        let record: Record = serde_json::from_value(json!({
            "created": "2024-01-01 00:00:00.000Z",
            "updated": "",
        }))
        .unwrap();
        let legacy = Legacy {
            timestamps: Timestamps::from_record(&record),
        };
        assert!(!legacy.created().is_zero());
        assert!(legacy.updated().is_zero());

        let mut out = Record::new();
        legacy.timestamps.write_to(&mut out);
        assert!(out.contains_key("created"));
        assert!(!out.contains_key("updated"));
    }
}
