//! Parser for the static redirect map file.
//!
//! One redirect per line:
//!
//! ```text
//! # prefix  code  from-path  to-target
//! ua        I     /foo       /internal/foo
//! ru        301   /bar       https://new.example/bar   # moved
//! ```
//!
//! Fields are whitespace-separated and `#` starts a comment that runs to the
//! end of the line. Blank and comment-only lines are skipped. Any structural
//! problem aborts the whole load; no partial table is ever produced.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::table::StaticTable;
use crate::domain::entities::{CodecError, RedirectEntry, RedirectKind};

const PREFIX: usize = 0;
const CODE: usize = 1;
const FROM: usize = 2;
const TO: usize = 3;

/// Number of fields in a map file line.
pub const FILE_FIELDS_COUNT: usize = TO + 1;

/// Errors that abort a table load. Line numbers are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected 4 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: unknown prefix '{prefix}'")]
    UnknownPrefix { line: usize, prefix: String },

    #[error("line {line}: {source}")]
    Code {
        line: usize,
        #[source]
        source: CodecError,
    },

    #[error("load task aborted: {0}")]
    Aborted(String),
}

impl LoadError {
    /// Line number of a structural error, `None` for I/O and task failures.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } | Self::Aborted(_) => None,
            Self::FieldCount { line, .. }
            | Self::UnknownPrefix { line, .. }
            | Self::Code { line, .. } => Some(*line),
        }
    }
}

/// Parses map file contents into a new [`StaticTable`].
///
/// Every prefix in `known_prefixes` gets a sub-table, even when no line
/// mentions it. On duplicate `(prefix, from-path)` pairs the last line wins.
///
/// # Errors
///
/// - [`LoadError::FieldCount`] if a line does not have exactly four fields
/// - [`LoadError::UnknownPrefix`] if a line names a prefix that is not known
/// - [`LoadError::Code`] if the code is neither `I` nor `301`
pub fn parse_table(
    source: &str,
    known_prefixes: &BTreeSet<String>,
) -> Result<StaticTable, LoadError> {
    let mut table = StaticTable::with_prefixes(known_prefixes.iter().cloned());

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let content = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.len() != FILE_FIELDS_COUNT {
            return Err(LoadError::FieldCount {
                line,
                found: fields.len(),
            });
        }

        let kind = RedirectKind::from_code(fields[CODE])
            .map_err(|source| LoadError::Code { line, source })?;
        let entry = RedirectEntry::new(kind, fields[TO]);

        if !table.insert(fields[PREFIX], fields[FROM].to_string(), entry) {
            return Err(LoadError::UnknownPrefix {
                line,
                prefix: fields[PREFIX].to_string(),
            });
        }
    }

    Ok(table)
}

/// Reads and parses a map file.
///
/// This is blocking I/O and CPU work; async callers should run it on the
/// blocking pool (see [`crate::domain::table_worker`]).
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read, otherwise the errors
/// of [`parse_table`].
pub fn load_table_file(
    path: &Path,
    known_prefixes: &BTreeSet<String>,
) -> Result<StaticTable, LoadError> {
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(&source, known_prefixes)
}
