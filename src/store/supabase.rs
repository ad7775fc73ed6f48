//! Supabase client for the PostgREST API.

use reqwest::Client;

use super::types::{DbCall, DbCallback, InboundEvent};
use super::StoreError;

/// Client for the `calls`, `callbacks`, and `channel_events` tables.
pub struct SupabaseClient {
    client: Client,
    url: String,
    service_role_key: String,
}

impl SupabaseClient {
    pub fn new(url: &str, service_role_key: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
        }
    }

    fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    fn auth_headers(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.service_role_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.service_role_key),
            )
            .header("Content-Type", "application/json")
    }

    async fn check(resp: reqwest::Response) -> Result<String, StoreError> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// Upsert a call record keyed by the provider call identifier.
    pub async fn upsert_call(&self, call: &DbCall) -> Result<(), StoreError> {
        let resp = self
            .auth_headers(
                self.client
                    .post(format!("{}/calls?on_conflict=call_id", self.rest_url())),
            )
            .header("Prefer", "resolution=merge-duplicates")
            .json(call)
            .send()
            .await?;

        Self::check(resp).await.map(|_| ())
    }

    /// Insert a queued-callback record, returning the stored row.
    pub async fn insert_callback(&self, callback: &DbCallback) -> Result<DbCallback, StoreError> {
        let resp = self
            .auth_headers(self.client.post(format!("{}/callbacks", self.rest_url())))
            .header("Prefer", "return=representation")
            .json(callback)
            .send()
            .await?;

        let body = Self::check(resp).await?;
        let rows: Vec<DbCallback> = serde_json::from_str(&body).map_err(|e| StoreError::Api {
            status: 200,
            body: format!("undecodable callback row: {}", e),
        })?;
        rows.into_iter().next().ok_or(StoreError::Api {
            status: 200,
            body: "no callback row returned".to_string(),
        })
    }

    /// Insert an inbound channel event.
    pub async fn insert_channel_event(&self, event: &InboundEvent) -> Result<(), StoreError> {
        let resp = self
            .auth_headers(
                self.client
                    .post(format!("{}/channel_events", self.rest_url())),
            )
            .json(event)
            .send()
            .await?;

        Self::check(resp).await.map(|_| ())
    }
}
