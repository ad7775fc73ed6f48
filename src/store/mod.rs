//! Persistence collaborator and its in-memory fallback.
//!
//! The Supabase client is the primary store for call state, queued
//! callbacks, and inbound channel events. The one true failure path in this
//! core is an inbound-event write that fails: the event is pushed onto a
//! bounded in-memory FIFO log instead of being dropped or surfaced as an
//! error. No retries, no backoff.

mod supabase;
mod types;

pub use supabase::SupabaseClient;
pub use types::{DbCall, DbCallback, InboundEvent};

use std::collections::VecDeque;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("supabase returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("persistence not configured")]
    NotConfigured,
}

/// Bounded, insertion-ordered event log with FIFO eviction.
///
/// Explicitly owned and injectable - not a process-wide singleton - so tests
/// and multi-instance deployments can hold their own.
pub struct EventLog {
    capacity: usize,
    events: Mutex<VecDeque<InboundEvent>>,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: Mutex::new(VecDeque::new()),
        }
    }

    /// Append an event, evicting the oldest entry when full.
    pub async fn push(&self, event: InboundEvent) {
        let mut events = self.events.lock().await;
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    pub async fn len(&self) -> usize {
        self.events.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.lock().await.is_empty()
    }

    /// Copy of the current contents, oldest first.
    pub async fn snapshot(&self) -> Vec<InboundEvent> {
        self.events.lock().await.iter().cloned().collect()
    }
}

/// Persistence facade: Supabase first, fallback log on failure.
pub struct CallsStore {
    supabase: Option<SupabaseClient>,
    fallback: EventLog,
}

/// Capacity of the fallback event log.
const FALLBACK_CAPACITY: usize = 100;

impl CallsStore {
    pub fn from_config(config: &Config) -> Self {
        let supabase = match (&config.supabase_url, &config.supabase_service_role_key) {
            (Some(url), Some(key)) => Some(SupabaseClient::new(url, key)),
            _ => {
                tracing::warn!("supabase not configured, events go to the in-memory fallback");
                None
            }
        };
        Self {
            supabase,
            fallback: EventLog::new(FALLBACK_CAPACITY),
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            supabase: None,
            fallback: EventLog::new(FALLBACK_CAPACITY),
        }
    }

    pub fn fallback(&self) -> &EventLog {
        &self.fallback
    }

    /// Persist normalized call state from a webhook event. Degrades to the
    /// fallback log; never errors.
    pub async fn record_call(&self, call: DbCall, raw_payload: serde_json::Value) {
        if let Some(supabase) = &self.supabase {
            match supabase.upsert_call(&call).await {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(call_id = %call.call_id, error = %e, "call upsert failed, using fallback log");
                }
            }
        }
        self.fallback
            .push(InboundEvent::now(format!("calls:{}", call.provider), raw_payload))
            .await;
    }

    /// Persist an inbound channel event. Degrades to the fallback log; never
    /// errors.
    pub async fn record_channel_event(&self, event: InboundEvent) {
        if let Some(supabase) = &self.supabase {
            match supabase.insert_channel_event(&event).await {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(channel = %event.channel, error = %e, "channel event insert failed, using fallback log");
                }
            }
        }
        self.fallback.push(event).await;
    }

    /// Persist a queued-callback record. Unlike event writes this surfaces
    /// failure to the caller - a lost callback is user-visible.
    pub async fn queue_callback(&self, callback: DbCallback) -> Result<DbCallback, StoreError> {
        match &self.supabase {
            Some(supabase) => supabase.insert_callback(&callback).await,
            None => Err(StoreError::NotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(n: usize) -> InboundEvent {
        InboundEvent::now("test", serde_json::json!({ "n": n }))
    }

    #[tokio::test]
    async fn test_event_log_is_fifo_bounded() {
        let log = EventLog::new(3);
        for n in 0..5 {
            log.push(event(n)).await;
        }
        assert_eq!(log.len().await, 3);

        let snapshot = log.snapshot().await;
        let first = snapshot[0].payload["n"].as_u64().unwrap();
        let last = snapshot[2].payload["n"].as_u64().unwrap();
        assert_eq!(first, 2);
        assert_eq!(last, 4);
    }

    #[tokio::test]
    async fn test_unconfigured_store_degrades_to_fallback() {
        let store = CallsStore::in_memory();
        let call = DbCall {
            id: None,
            call_id: "mock-in-1".to_string(),
            provider: "mock".to_string(),
            status: "active".to_string(),
            meta: serde_json::Value::Null,
            updated_at: None,
        };
        store.record_call(call, serde_json::json!({"call_id": "mock-in-1"})).await;
        store
            .record_channel_event(InboundEvent::now("telegram", serde_json::json!({})))
            .await;

        assert_eq!(store.fallback().len().await, 2);
    }

    #[tokio::test]
    async fn test_queue_callback_requires_persistence() {
        let store = CallsStore::in_memory();
        let callback = DbCallback {
            id: None,
            task_id: uuid::Uuid::new_v4(),
            summary: "done".to_string(),
            script: "Hello!".to_string(),
            force: false,
            status: "queued".to_string(),
            created_at: None,
        };
        let err = store.queue_callback(callback).await.unwrap_err();
        assert!(matches!(err, StoreError::NotConfigured));
    }
}
