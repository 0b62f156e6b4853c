//! Redirect entry and its text codec.
//!
//! The same two-token vocabulary is shared by the static map file and the
//! values stored in Redis:
//!
//! - File line: `<prefix> <code> <from-path> <to-target>`
//! - Wire value: `<code> <target>`

use std::fmt;

/// Code token for an internal (front-end served) rewrite.
pub const INTERNAL_CODE: &str = "I";

/// Code token for an external permanent redirect.
pub const EXTERNAL_CODE: &str = "301";

/// Number of whitespace-separated fields in a stored wire value.
pub const WIRE_FIELDS_COUNT: usize = 2;

/// Errors produced while decoding entries from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("unknown redirect code '{0}'")]
    UnknownCode(String),

    #[error("value is not valid UTF-8")]
    InvalidUtf8,
}

/// How a resolved redirect is served to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedirectKind {
    /// Served in-process by asking the front-end proxy to substitute content.
    Internal,
    /// Served as a `301 Moved Permanently` response.
    External,
}

impl RedirectKind {
    /// Parses a code token (`I` or `301`).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownCode`] for any other token.
    pub fn from_code(code: &str) -> Result<Self, CodecError> {
        match code {
            INTERNAL_CODE => Ok(Self::Internal),
            EXTERNAL_CODE => Ok(Self::External),
            other => Err(CodecError::UnknownCode(other.to_string())),
        }
    }

    /// Returns the code token used in files and on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Self::Internal => INTERNAL_CODE,
            Self::External => EXTERNAL_CODE,
        }
    }
}

impl fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An immutable redirect instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEntry {
    pub kind: RedirectKind,
    pub target: String,
}

impl RedirectEntry {
    pub fn new(kind: RedirectKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
        }
    }

    pub fn internal(target: impl Into<String>) -> Self {
        Self::new(RedirectKind::Internal, target)
    }

    pub fn external(target: impl Into<String>) -> Self {
        Self::new(RedirectKind::External, target)
    }

    /// Decodes a stored value of the form `<code> <target>`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldCount`] unless the value splits into exactly
    /// two whitespace-separated fields, and [`CodecError::UnknownCode`] when the
    /// code is not recognized.
    pub fn from_wire(value: &str) -> Result<Self, CodecError> {
        let fields: Vec<&str> = value.split_whitespace().collect();
        let [code, target] = fields[..] else {
            return Err(CodecError::FieldCount {
                expected: WIRE_FIELDS_COUNT,
                found: fields.len(),
            });
        };

        Ok(Self::new(RedirectKind::from_code(code)?, target))
    }

    /// Encodes the entry in the stored value form.
    pub fn to_wire(&self) -> String {
        format!("{} {}", self.kind.code(), self.target)
    }

    /// Returns the target with the original query string appended, if any.
    pub fn target_with_query(&self, query: Option<&str>) -> String {
        match query {
            Some(q) if !q.is_empty() => format!("{}?{}", self.target, q),
            _ => self.target.clone(),
        }
    }
}

/// Builds the key used for cache and remote lookups: `<prefix>:<path>`.
///
/// Prefixes never contain `:` (enforced by [`super::HostMap`]), so the key
/// splits unambiguously at its first colon.
pub fn resolution_key(prefix: &str, path: &str) -> String {
    format!("{}:{}", prefix, path)
}
