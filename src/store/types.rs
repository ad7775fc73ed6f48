//! Row types for the persistence collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A normalized call record in the `calls` table, keyed by the provider's
/// call identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub call_id: String,
    pub provider: String,
    pub status: String,
    #[serde(default)]
    pub meta: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A queued callback record in the `callbacks` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbCallback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub task_id: Uuid,
    pub summary: String,
    pub script: String,
    pub force: bool,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One inbound channel event; also the shape held by the in-memory fallback
/// log when the primary write fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub channel: String,
    pub payload: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

impl InboundEvent {
    pub fn now(channel: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            channel: channel.into(),
            payload,
            received_at: Utc::now(),
        }
    }
}
