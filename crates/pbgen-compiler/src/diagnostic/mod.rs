//! Diagnostic types for error and warning reporting.

mod error;
mod warning;

pub use error::CompilerError;
pub use warning::Warning;
