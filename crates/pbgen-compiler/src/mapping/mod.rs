//! Field type mapping and identifier normalization.
//!
//! Both halves are pure functions shared by the dialect processors and the
//! renderer.

pub mod naming;
pub mod types;

pub use naming::{
    escape_keyword, to_canonical_identifier, to_module_name, to_snake_case, to_struct_name,
};
pub use types::{map_type, TypeMapping};
