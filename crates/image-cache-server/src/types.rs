//! Core types for the image cache server

use axum::http::Method;
use serde::Serialize;

/// The request methods the cache understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMethod {
    Get,
    Put,
    Delete,
    Other,
}

impl From<&Method> for CacheMethod {
    fn from(method: &Method) -> Self {
        match *method {
            Method::GET => CacheMethod::Get,
            Method::PUT => CacheMethod::Put,
            Method::DELETE => CacheMethod::Delete,
            _ => CacheMethod::Other,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Confirmation for a PUT or DELETE
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Created,
    Deleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_method_from_method() {
        assert_eq!(CacheMethod::from(&Method::GET), CacheMethod::Get);
        assert_eq!(CacheMethod::from(&Method::PUT), CacheMethod::Put);
        assert_eq!(CacheMethod::from(&Method::DELETE), CacheMethod::Delete);
        assert_eq!(CacheMethod::from(&Method::POST), CacheMethod::Other);
        assert_eq!(CacheMethod::from(&Method::HEAD), CacheMethod::Other);
        assert_eq!(
            CacheMethod::from(&Method::from_bytes(b"PURGE").unwrap()),
            CacheMethod::Other
        );
    }

    #[test]
    fn test_entry_response_serialization() {
        let response = EntryResponse {
            key: "404".to_string(),
            status: EntryStatus::Created,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"key":"404","status":"created"}"#);
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse {
            error: "Image not found".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("Image not found"));
    }
}
