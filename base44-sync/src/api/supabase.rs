//! HTTP client for Supabase PostgREST upserts

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::provider::DestinationStore;
use super::body_excerpt;

/// Client for `POST /rest/v1/{relation}?on_conflict={key}`
///
/// `resolution=merge-duplicates` makes the insert an upsert keyed on the
/// conflict columns; `return=minimal` skips echoing the rows back.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        SupabaseClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn relation_url(&self, relation: &str, conflict_key: &str) -> String {
        format!(
            "{}/rest/v1/{}?on_conflict={}",
            self.base_url.trim_end_matches('/'),
            relation,
            urlencoding::encode(conflict_key)
        )
    }
}

#[async_trait]
impl DestinationStore for SupabaseClient {
    async fn upsert(&self, relation: &str, conflict_key: &str, records: &[Value]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let url = self.relation_url(relation, conflict_key);
        log::debug!("POST {} ({} records)", url, records.len());

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&records)
            .send()
            .await
            .with_context(|| format!("Supabase request for relation {} failed", relation))?;

        let status = response.status();
        if !status.is_success() {
            // PostgREST explains schema mismatches (PGRST204 and friends)
            // in the body, so keep an excerpt in the error.
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Supabase rejected upsert into {}: {} {}",
                relation,
                status,
                body_excerpt(&body)
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_url() {
        let client = SupabaseClient::new("https://xyz.supabase.co/", "key");
        assert_eq!(
            client.relation_url("reports", "id"),
            "https://xyz.supabase.co/rest/v1/reports?on_conflict=id"
        );
    }

    #[test]
    fn test_relation_url_encodes_composite_key() {
        let client = SupabaseClient::new("https://xyz.supabase.co", "key");
        assert_eq!(
            client.relation_url("report_witnesses", "parent_id,child_id"),
            "https://xyz.supabase.co/rest/v1/report_witnesses?on_conflict=parent_id%2Cchild_id"
        );
    }
}
