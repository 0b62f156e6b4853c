//! Host extraction from HTTP request headers.

use crate::AppError;
use axum::http::{HeaderMap, header};

/// Extracts the `Host` header value verbatim.
///
/// The port is kept so that hosts configured with a port suffix (see
/// `HOST_PORT_SUFFIX`) can be matched exactly.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if:
/// - The `Host` header is missing
/// - The header value contains invalid UTF-8
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "example.com:8080".parse().unwrap());
///
/// let host = extract_host_from_headers(&headers).unwrap();
/// assert_eq!(host, "example.com:8080");
/// ```
pub fn extract_host_from_headers(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", serde_json::json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", serde_json::json!({})))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    #[test]
    fn test_extract_host_simple() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.com"));

        let result = extract_host_from_headers(&headers);
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "example.com");
    }

    #[test]
    fn test_extract_host_keeps_port() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.com:3000"));

        let result = extract_host_from_headers(&headers);
        assert_eq!(result.unwrap(), "example.com:3000");
    }

    #[test]
    fn test_extract_host_missing_header() {
        let headers = HeaderMap::new();

        let result = extract_host_from_headers(&headers);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_extract_host_invalid_utf8() {
        let mut headers = HeaderMap::new();
        let invalid_bytes = vec![0xFF, 0xFE, 0xFD];
        if let Ok(header_value) = HeaderValue::from_bytes(&invalid_bytes) {
            headers.insert(header::HOST, header_value);

            let result = extract_host_from_headers(&headers);
            assert!(result.is_err());
        }
    }
}
