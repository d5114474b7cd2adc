//! HTTP client for the Base44 entities API

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::provider::{FetchResponse, SourceProvider};
use super::body_excerpt;

const DEFAULT_BASE_URL: &str = "https://app.base44.com";

/// Client for `GET /api/apps/{app_id}/entities/{Entity}`
#[derive(Debug, Clone)]
pub struct Base44Client {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    api_key: String,
}

impl Base44Client {
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Base44Client {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            app_id: app_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Point the client at a different host (staging, local stub)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn entity_url(&self, entity: &str) -> String {
        format!(
            "{}/api/apps/{}/entities/{}",
            self.base_url.trim_end_matches('/'),
            self.app_id,
            urlencoding::encode(entity)
        )
    }
}

#[async_trait]
impl SourceProvider for Base44Client {
    async fn fetch_entity(&self, entity: &str) -> Result<FetchResponse> {
        let url = self.entity_url(entity);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("api_key", &self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await
            .with_context(|| format!("Base44 request for entity {} failed", entity))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(FetchResponse::NotFound);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Base44 returned {} for entity {}: {}",
                status,
                entity,
                body_excerpt(&body)
            );
        }

        let payload: Value = response
            .json()
            .await
            .with_context(|| format!("Base44 sent invalid JSON for entity {}", entity))?;

        match payload {
            Value::Array(records) => Ok(FetchResponse::Records(records)),
            Value::Null => Ok(FetchResponse::NotFound),
            record @ Value::Object(_) => Ok(FetchResponse::Single(record)),
            other => anyhow::bail!(
                "Base44 sent an unexpected payload for entity {}: {}",
                entity,
                body_excerpt(&other.to_string())
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_url() {
        let client = Base44Client::new("app123", "key").with_base_url("https://example.test/");
        assert_eq!(
            client.entity_url("CompanyProfile"),
            "https://example.test/api/apps/app123/entities/CompanyProfile"
        );
    }

    #[test]
    fn test_entity_url_encodes_name() {
        let client = Base44Client::new("app123", "key");
        assert_eq!(
            client.entity_url("Witness Group"),
            "https://app.base44.com/api/apps/app123/entities/Witness%20Group"
        );
    }
}
