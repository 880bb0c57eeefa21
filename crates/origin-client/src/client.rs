//! HTTP client for the image origin

use crate::error::{OriginError, Result};
use async_trait::async_trait;
use cache_key::CacheKey;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// A source of images that the cache falls back to on a miss
#[async_trait]
pub trait Origin: Send + Sync {
    /// Fetch the image stored under `key`
    async fn fetch(&self, key: &CacheKey) -> Result<Vec<u8>>;
}

/// Fetches images over HTTP from `{base_url}/{key}`
pub struct OriginClient {
    http: reqwest::Client,
    base_url: String,
}

impl OriginClient {
    /// Default origin: status code cat pictures
    pub const DEFAULT_BASE_URL: &'static str = "https://http.cat";

    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("image-cache-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the image for `key`
    pub fn image_url(&self, key: &CacheKey) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl Origin for OriginClient {
    async fn fetch(&self, key: &CacheKey) -> Result<Vec<u8>> {
        let url = self.image_url(key);
        debug!(url = %url, "Fetching image from origin");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            debug!(url = %url, status = %status, "Origin has no image");
            return Err(OriginError::Miss);
        }

        if !status.is_success() {
            warn!(status = %status, url = %url, "Failed to fetch image");
            return Err(OriginError::Status(status.as_u16()));
        }

        let data = response.bytes().await?.to_vec();
        debug!(size = data.len(), url = %url, "Fetched image from origin");

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key(digits: &str) -> CacheKey {
        CacheKey::parse(digits).unwrap()
    }

    fn client_for(server: &MockServer) -> OriginClient {
        OriginClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_image_url_trims_trailing_slash() {
        let client = OriginClient::new("https://http.cat/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "https://http.cat");
        assert_eq!(client.image_url(&key("418")), "https://http.cat/418");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        Mock::given(method("GET"))
            .and(path("/200"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(jpeg.clone(), "image/jpeg"))
            .expect(1)
            .mount(&server)
            .await;

        let data = client_for(&server).fetch(&key("200")).await.unwrap();
        assert_eq!(data, jpeg);
    }

    #[tokio::test]
    async fn test_fetch_not_found_is_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(&key("999")).await.unwrap_err();
        assert!(err.is_miss());
    }

    #[tokio::test]
    async fn test_fetch_gone_is_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/410"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(&key("410")).await.unwrap_err();
        assert!(err.is_miss());
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/500"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).fetch(&key("500")).await.unwrap_err();
        assert!(matches!(err, OriginError::Status(503)));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/504"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = OriginClient::new(&server.uri(), Duration::from_millis(100)).unwrap();
        let err = client.fetch(&key("504")).await.unwrap_err();
        assert!(matches!(err, OriginError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_http_error() {
        let client = OriginClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        let err = client.fetch(&key("200")).await.unwrap_err();
        assert!(matches!(err, OriginError::Http(_)));
    }
}
