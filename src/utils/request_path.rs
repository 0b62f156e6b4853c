//! Request path decoding.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use serde_json::json;

use crate::AppError;

/// Percent-decodes a request path so it can be matched against map entries,
/// which are written unescaped (e.g. `/новости`).
///
/// `%2F` decodes to `/` like any other escape.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if the decoded bytes are not valid UTF-8;
/// no map entry or stored key can match such a path.
pub fn decode_request_path(raw: &str) -> Result<Cow<'_, str>, AppError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| AppError::not_found("Invalid path encoding", json!({ "path": raw })))
}
