//! Validation of parsed schema documents.

mod structure;

pub use structure::validate_collections;
