//! Telegram voice-chat provider skeleton.

use async_trait::async_trait;

use super::{
    extract_str, stub_start_status, synthetic_call_id, CallDirection, CallEnd, CallsProvider,
    SessionStart, WebhookOutcome,
};
use crate::config::CallsConfig;

pub struct TelegramProvider {
    #[allow(dead_code)] // held for the real Bot API integration
    bot_token: String,
}

impl TelegramProvider {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
        }
    }

    pub fn from_config(cfg: &CallsConfig) -> Self {
        Self::new(cfg.telegram_bot_token.clone().unwrap_or_default())
    }
}

#[async_trait]
impl CallsProvider for TelegramProvider {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn start_inbound(&self, caller: &str) -> SessionStart {
        tracing::debug!(caller, "telegram inbound session");
        SessionStart {
            ok: true,
            call_id: synthetic_call_id("telegram", CallDirection::Inbound),
            status: stub_start_status(CallDirection::Inbound).to_string(),
        }
    }

    async fn start_outbound(&self, callee: &str, script: &str) -> SessionStart {
        tracing::debug!(callee, script_len = script.len(), "telegram outbound call");
        SessionStart {
            ok: true,
            call_id: synthetic_call_id("telegram", CallDirection::Outbound),
            status: stub_start_status(CallDirection::Outbound).to_string(),
        }
    }

    async fn on_webhook_event(&self, payload: &serde_json::Value) -> WebhookOutcome {
        WebhookOutcome {
            ok: true,
            call_id: extract_str(payload, &["call_id"]),
            status: extract_str(payload, &["status"]),
            meta: payload.clone(),
        }
    }

    async fn end_call(&self, call_id: &str) -> CallEnd {
        tracing::debug!(call_id, "telegram end call");
        CallEnd { ok: true }
    }
}
