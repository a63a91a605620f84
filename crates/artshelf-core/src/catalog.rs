// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Catalog source
//
// Read-only HTTP GET returning the full catalog as a JSON array. No paging,
// no query parameters, no retry.

use crate::types::{AppError, AppSettings, CatalogItem};
use async_trait::async_trait;
use std::time::Duration;

const USER_AGENT: &str = concat!("artshelf/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Anything that can hand out the full catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<CatalogItem>, AppError>;
}

/// HTTP client for the catalog endpoint
#[derive(Clone)]
pub struct CatalogClient {
    inner: reqwest::Client,
    url: String,
}

impl CatalogClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::InvalidConfig(format!(
                "Catalog URL must be http(s): {}",
                url
            )));
        }

        let inner = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .build()?;
        Ok(Self { inner, url })
    }

    pub fn from_settings(settings: &AppSettings) -> Result<Self, AppError> {
        Self::new(
            settings.catalog_url.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch every catalog item
    pub async fn fetch(&self) -> Result<Vec<CatalogItem>, AppError> {
        tracing::info!("Fetching catalog from {}", self.url);
        let body = self
            .inner
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let items = parse_catalog(&body)?;
        tracing::info!("Fetched {} catalog items", items.len());
        Ok(items)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_all(&self) -> Result<Vec<CatalogItem>, AppError> {
        self.fetch().await
    }
}

/// Decode a catalog response body
pub fn parse_catalog(body: &str) -> Result<Vec<CatalogItem>, AppError> {
    serde_json::from_str(body)
        .map_err(|e| AppError::Network(format!("Unexpected catalog payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CatalogClient::from_settings(&AppSettings::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let result = CatalogClient::new("ftp://example.com/art", Duration::from_secs(1));
        assert!(matches!(result, Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn test_parse_catalog() {
        let body = r#"[
            {"id": "1", "artName": "Easel", "brand": "Meeden", "price": 89.5, "image": "", "limitedTimeDeal": 0.1},
            {"id": "2", "brand": "Arteza", "price": 4, "limitedTimeDeal": 0}
        ]"#;
        let items = parse_catalog(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].display_name(), "Easel");
        assert_eq!(items[1].name, None);
        assert_eq!(items[1].price, 4.0);
    }

    #[test]
    fn test_parse_catalog_rejects_object() {
        assert!(matches!(parse_catalog(r#"{"id": "1"}"#), Err(AppError::Network(_))));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let client = CatalogClient::new("http://127.0.0.1:9/art", Duration::from_secs(2)).unwrap();
        assert!(matches!(client.fetch().await, Err(AppError::Network(_))));
    }
}
