//! Identifier normalization.

use crate::diagnostic::CompilerError;
use std::path::PathBuf;

/// Identifier used when a name contains no usable characters.
const FALLBACK_IDENTIFIER: &str = "Field";

/// Words that are reserved in Rust and must be escaped as field names.
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Type names a generated model file already uses, plus `Self`.
const RESERVED_STRUCT_NAMES: &[&str] = &[
    "Self", "Model", "Record", "RecordMeta", "DateTime", "Timestamps", "HasTimestamps", "String",
    "Option", "Vec", "Box", "Result",
];

/// Suffix for struct names that would shadow a used type.
const STRUCT_SUFFIX: &str = "Model";

/// Converts a raw schema name to a PascalCase identifier.
///
/// Splits on `_`, `-`, any other non-alphanumeric character, and case
/// boundaries, then capitalizes each segment. Only an empty name is
/// rejected; any other input yields some identifier.
pub fn to_canonical_identifier(raw: &str) -> Result<String, CompilerError> {
    if raw.is_empty() {
        return Err(CompilerError::InvalidName {
            path: PathBuf::new(),
            collection: String::new(),
        });
    }

    let mut identifier: String = split_segments(raw).iter().map(|s| capitalize(s)).collect();

    if identifier.is_empty() {
        return Ok(FALLBACK_IDENTIFIER.to_string());
    }
    if identifier.starts_with(|c: char| c.is_ascii_digit()) {
        identifier.insert_str(0, FALLBACK_IDENTIFIER);
    }
    Ok(identifier)
}

/// Splits a name into word segments.
fn split_segments(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut segments = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            // `userName` | `field1Name` | the `S` in `HTTPServer`
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                segments.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => std::iter::once(first.to_ascii_uppercase())
            .chain(chars.map(|c| c.to_ascii_lowercase()))
            .collect(),
    }
}

/// Converts a PascalCase identifier to snake_case.
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Struct name for a collection identifier.
///
/// Names that would shadow a type the generated file refers to get a
/// `Model` suffix (`Record` becomes `RecordModel`).
pub fn to_struct_name(identifier: &str) -> String {
    if RESERVED_STRUCT_NAMES.contains(&identifier) {
        format!("{}{}", identifier, STRUCT_SUFFIX)
    } else {
        identifier.to_string()
    }
}

/// Module (and file stem) name for a struct.
///
/// Keywords get a trailing underscore rather than a raw prefix, so the file
/// name stays a plain identifier and `mod` never lands on `mod.rs`.
pub fn to_module_name(struct_name: &str) -> String {
    let snake = to_snake_case(struct_name);
    if RUST_KEYWORDS.contains(&snake.as_str()) || NON_RAW_KEYWORDS.contains(&snake.as_str()) {
        format!("{}_", snake)
    } else {
        snake
    }
}

/// Escapes a snake_case name that collides with a Rust keyword.
pub fn escape_keyword(name: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&name) {
        format!("{}_", name)
    } else if RUST_KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}
