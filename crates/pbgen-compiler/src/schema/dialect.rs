//! Schema dialect detection.
//!
//! Two incompatible export layouts exist. The current one lists a
//! collection's fields under `"fields"`, the legacy one under `"schema"`.
//! Detection is a byte-level scan of the top-level array so it works before
//! (and independently of) a full JSON parse.

use std::fmt;
use serde::Serialize;
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const FIELDS_KEY: &[u8] = b"fields";
const SCHEMA_KEY: &[u8] = b"schema";

/// Layout of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaDialect {
    /// Fields listed under `"schema"`; `created`/`updated` are implicit.
    Legacy,
    /// Fields listed under `"fields"`; system fields are explicit.
    Latest,
    /// Neither key present. Callers pick their own default.
    #[default]
    Unknown,
}

impl SchemaDialect {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaDialect::Legacy => "legacy",
            SchemaDialect::Latest => "latest",
            SchemaDialect::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SchemaDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why detection failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    /// The bytes are not a collection array the scanner can follow.
    #[error("cannot scan schema at byte {offset}: {reason}")]
    Parse { offset: usize, reason: &'static str },

    /// Both field-list keys occur in one document.
    #[error(
        "collection #{fields_index} uses \"fields\" but collection #{schema_index} uses \"schema\""
    )]
    MixedDialect {
        fields_index: usize,
        schema_index: usize,
    },
}

/// Classifies a whole schema document.
///
/// Only keys of objects that are direct elements of the top-level array are
/// considered. Anything after the top-level array closes is ignored, and a
/// truncated document is accepted once a field-list key has been seen.
pub fn detect(raw: &[u8]) -> Result<SchemaDialect, DetectError> {
    let bytes = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);

    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .ok_or(DetectError::Parse {
            offset: 0,
            reason: "document is empty",
        })?;
    if bytes[start] != b'[' {
        return Err(DetectError::Parse {
            offset: start,
            reason: "top level is not an array of collections",
        });
    }

    let mut scan = Scan::default();
    let mut stack = vec![b'['];
    let mut collections = 0usize;
    let mut current = 0usize;
    let mut expect_key = false;
    let mut i = start + 1;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let Some(end) = string_end(bytes, i) else {
                    if scan.is_empty() {
                        return Err(DetectError::Parse {
                            offset: i,
                            reason: "unterminated string",
                        });
                    }
                    break;
                };
                if expect_key && stack == [b'[', b'{'] {
                    scan.record(&bytes[i + 1..end - 1], current)?;
                    expect_key = false;
                }
                i = end;
                continue;
            }
            open @ (b'{' | b'[') => {
                stack.push(open);
                if stack == [b'[', b'{'] {
                    current = collections;
                    collections += 1;
                    expect_key = true;
                }
            }
            close @ (b'}' | b']') => {
                let expected = if close == b'}' { b'{' } else { b'[' };
                if stack.pop() != Some(expected) {
                    return Err(DetectError::Parse {
                        offset: i,
                        reason: "mismatched bracket",
                    });
                }
                if stack.is_empty() {
                    break;
                }
            }
            b',' if stack == [b'[', b'{'] => expect_key = true,
            b':' if stack == [b'[', b'{'] => expect_key = false,
            _ => {}
        }
        i += 1;
    }

    if !stack.is_empty() && scan.is_empty() {
        return Err(DetectError::Parse {
            offset: bytes.len(),
            reason: "document ends before the collection array is closed",
        });
    }

    Ok(scan.dialect())
}

/// Returns the index just past the closing quote of the string at `start`.
fn string_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Field-list keys seen so far, by first collection index.
#[derive(Default)]
struct Scan {
    fields_at: Option<usize>,
    schema_at: Option<usize>,
}

impl Scan {
    fn is_empty(&self) -> bool {
        self.fields_at.is_none() && self.schema_at.is_none()
    }

    fn record(&mut self, key: &[u8], collection: usize) -> Result<(), DetectError> {
        if key == FIELDS_KEY {
            self.fields_at.get_or_insert(collection);
        } else if key == SCHEMA_KEY {
            self.schema_at.get_or_insert(collection);
        }

        match (self.fields_at, self.schema_at) {
            (Some(fields_index), Some(schema_index)) => Err(DetectError::MixedDialect {
                fields_index,
                schema_index,
            }),
            _ => Ok(()),
        }
    }

    fn dialect(&self) -> SchemaDialect {
        match (self.fields_at, self.schema_at) {
            (Some(_), None) => SchemaDialect::Latest,
            (None, Some(_)) => SchemaDialect::Legacy,
            _ => SchemaDialect::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest() {
        let doc =
            br#"[{"name":"posts","fields":[]},{"name":"tags","fields":[{"name":"schema","type":"text"}]}]"#;
        assert_eq!(detect(doc).unwrap(), SchemaDialect::Latest);
    }

    #[test]
    fn test_legacy() {
        let doc = br#"[{"name":"posts","schema":[{"name":"fields","type":"text"}]}]"#;
        assert_eq!(detect(doc).unwrap(), SchemaDialect::Legacy);
    }

    #[test]
    fn test_mixed_documents_fail() {
        let doc = br#"[{"name":"a","fields":[]},{"name":"b","schema":[]}]"#;
        assert_eq!(
            detect(doc),
            Err(DetectError::MixedDialect {
                fields_index: 0,
                schema_index: 1
            })
        );
    }

    #[test]
    fn test_mixed_within_one_collection() {
        let doc = br#"[{"schema":[],"fields":[]}]"#;
        assert!(matches!(detect(doc), Err(DetectError::MixedDialect { .. })));
    }

    #[test]
    fn test_neither_key_is_unknown() {
        assert_eq!(detect(br#"[{"name":"a"}]"#).unwrap(), SchemaDialect::Unknown);
        assert_eq!(detect(b"[]").unwrap(), SchemaDialect::Unknown);
    }

    #[test]
    fn test_values_named_like_keys_are_ignored() {
        let doc = br#"[{"name":"fields","note":"schema","options":{"schema":1}}]"#;
        assert_eq!(detect(doc).unwrap(), SchemaDialect::Unknown);
    }

    #[test]
    fn test_escaped_quotes_in_strings() {
        let doc = br#"[{"name":"a \"fields\" b","schema":[]}]"#;
        assert_eq!(detect(doc).unwrap(), SchemaDialect::Legacy);
    }

    #[test]
    fn test_trailing_garbage_is_ignored() {
        let doc = br#"  [{"fields":[]}] }}} not json"#;
        assert_eq!(detect(doc).unwrap(), SchemaDialect::Latest);
    }

    #[test]
    fn test_truncated_after_key_is_accepted() {
        let doc = br#"[{"name":"a","fields":[{"name":"ti"#;
        assert_eq!(detect(doc).unwrap(), SchemaDialect::Latest);
    }

    #[test]
    fn test_bom_is_skipped() {
        let mut doc = UTF8_BOM.to_vec();
        doc.extend_from_slice(br#"[{"schema":[]}]"#);
        assert_eq!(detect(&doc).unwrap(), SchemaDialect::Legacy);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(detect(b""), Err(DetectError::Parse { .. })));
        assert!(matches!(detect(b"  \n"), Err(DetectError::Parse { .. })));
        assert!(matches!(detect(br#"{"fields":[]}"#), Err(DetectError::Parse { offset: 0, .. })));
        assert!(matches!(detect(br#"[{"name":"a"]"#), Err(DetectError::Parse { .. })));
        assert!(matches!(detect(br#"[{"name":"a"#), Err(DetectError::Parse { .. })));
    }
}
