//! Calls provider abstraction - a uniform interface over telephony backends.
//!
//! Three variants exist: Mock, Twilio, and Telegram. All of them are
//! integration skeletons: no network calls, synthetic call identifiers
//! namespaced by provider and direction, and a fixed `active`/`queued`
//! status. Real backends plug in behind the same trait and signal failure
//! through `ok: false` in the result structs, never by erroring, so the
//! webhook call sites stay uniform.
//!
//! Selection is an explicit factory over [`CallsConfig`] with a fixed
//! precedence: provider override (when its credentials are present), then
//! Twilio, then Telegram, then Mock.

mod mock;
mod telegram;
mod twilio;

pub use mock::MockProvider;
pub use telegram::TelegramProvider;
pub use twilio::TwilioProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::CallsConfig;

/// Direction of a voice session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Inbound,
    Outbound,
}

impl CallDirection {
    /// Short tag used in synthetic call identifiers.
    pub fn tag(&self) -> &'static str {
        match self {
            CallDirection::Inbound => "in",
            CallDirection::Outbound => "out",
        }
    }
}

/// Outcome of starting a session or call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStart {
    pub ok: bool,
    pub call_id: String,
    pub status: String,
}

/// Outcome of ending a call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEnd {
    pub ok: bool,
}

/// Normalized result of handling a provider webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookOutcome {
    pub ok: bool,
    pub call_id: Option<String>,
    pub status: Option<String>,
    pub meta: serde_json::Value,
}

/// Uniform interface over telephony backends.
#[async_trait]
pub trait CallsProvider: Send + Sync {
    /// Provider tag used in logs and synthetic identifiers.
    fn name(&self) -> &'static str;

    /// Start an inbound voice session.
    async fn start_inbound(&self, caller: &str) -> SessionStart;

    /// Start an outbound call delivering the given script.
    async fn start_outbound(&self, callee: &str, script: &str) -> SessionStart;

    /// Handle a raw webhook event from the provider.
    async fn on_webhook_event(&self, payload: &serde_json::Value) -> WebhookOutcome;

    /// End a call.
    async fn end_call(&self, call_id: &str) -> CallEnd;
}

/// Synthetic identifier for the stub variants, e.g. `twilio-out-<uuid>`.
pub(crate) fn synthetic_call_id(provider: &str, direction: CallDirection) -> String {
    format!("{}-{}-{}", provider, direction.tag(), Uuid::new_v4())
}

/// Fixed status reported by the stub variants when a session starts.
pub(crate) fn stub_start_status(direction: CallDirection) -> &'static str {
    match direction {
        CallDirection::Inbound => "active",
        CallDirection::Outbound => "queued",
    }
}

/// Pull the first string value out of `payload` under any of `keys`.
pub(crate) fn extract_str(payload: &serde_json::Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| payload.get(k).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

/// Pick the calls provider for this process invocation.
///
/// Precedence: explicit override (honored only when that provider's
/// credentials are present; "mock" needs none), then Twilio credentials,
/// then a Telegram bot token, then Mock.
pub fn select_provider(cfg: &CallsConfig) -> Arc<dyn CallsProvider> {
    if let Some(requested) = cfg.provider_override.as_deref() {
        match requested {
            "twilio" if cfg.has_twilio_credentials() => {
                return Arc::new(TwilioProvider::from_config(cfg));
            }
            "telegram" if cfg.has_telegram_credentials() => {
                return Arc::new(TelegramProvider::from_config(cfg));
            }
            "mock" => return Arc::new(MockProvider),
            other => {
                tracing::warn!(
                    provider = other,
                    "calls provider override not usable, probing credentials"
                );
            }
        }
    }

    if cfg.has_twilio_credentials() {
        Arc::new(TwilioProvider::from_config(cfg))
    } else if cfg.has_telegram_credentials() {
        Arc::new(TelegramProvider::from_config(cfg))
    } else {
        Arc::new(MockProvider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(
        provider_override: Option<&str>,
        twilio: bool,
        telegram: bool,
    ) -> CallsConfig {
        CallsConfig {
            provider_override: provider_override.map(|s| s.to_string()),
            twilio_account_sid: twilio.then(|| "AC123".to_string()),
            twilio_auth_token: twilio.then(|| "token".to_string()),
            telegram_bot_token: telegram.then(|| "123:abc".to_string()),
        }
    }

    #[test]
    fn test_no_credentials_selects_mock() {
        assert_eq!(select_provider(&cfg(None, false, false)).name(), "mock");
    }

    #[test]
    fn test_telegram_token_only_selects_telegram() {
        assert_eq!(select_provider(&cfg(None, false, true)).name(), "telegram");
    }

    #[test]
    fn test_twilio_beats_telegram_without_override() {
        assert_eq!(select_provider(&cfg(None, true, true)).name(), "twilio");
    }

    #[test]
    fn test_override_wins_when_credentialed() {
        assert_eq!(
            select_provider(&cfg(Some("telegram"), true, true)).name(),
            "telegram"
        );
        assert_eq!(select_provider(&cfg(Some("mock"), true, true)).name(), "mock");
    }

    #[test]
    fn test_override_without_credentials_falls_back_to_probe() {
        // Twilio requested but not credentialed; telegram creds present.
        assert_eq!(
            select_provider(&cfg(Some("twilio"), false, true)).name(),
            "telegram"
        );
    }

    #[tokio::test]
    async fn test_stub_sessions_are_namespaced_by_provider_and_direction() {
        let provider = select_provider(&cfg(None, true, false));
        let inbound = provider.start_inbound("+15550100").await;
        let outbound = provider.start_outbound("+15550101", "hello").await;

        assert!(inbound.ok && outbound.ok);
        assert!(inbound.call_id.starts_with("twilio-in-"));
        assert!(outbound.call_id.starts_with("twilio-out-"));
        assert_eq!(inbound.status, "active");
        assert_eq!(outbound.status, "queued");
    }

    #[tokio::test]
    async fn test_end_call_always_ok_for_stubs() {
        for provider_cfg in [cfg(None, false, false), cfg(None, true, false), cfg(None, false, true)] {
            let provider = select_provider(&provider_cfg);
            assert!(provider.end_call("some-call").await.ok);
        }
    }

    #[tokio::test]
    async fn test_twilio_webhook_prefers_call_sid() {
        let provider = TwilioProvider::new("AC123", "token");
        let payload = serde_json::json!({
            "CallSid": "CA999",
            "call_id": "generic",
            "CallStatus": "in-progress"
        });
        let outcome = provider.on_webhook_event(&payload).await;
        assert!(outcome.ok);
        assert_eq!(outcome.call_id.as_deref(), Some("CA999"));
        assert_eq!(outcome.status.as_deref(), Some("in-progress"));
    }

    #[tokio::test]
    async fn test_generic_webhook_uses_call_id() {
        let provider = MockProvider;
        let payload = serde_json::json!({ "call_id": "mock-1", "status": "completed" });
        let outcome = provider.on_webhook_event(&payload).await;
        assert_eq!(outcome.call_id.as_deref(), Some("mock-1"));
        assert_eq!(outcome.status.as_deref(), Some("completed"));
    }
}
