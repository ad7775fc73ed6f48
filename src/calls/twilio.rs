//! Twilio calls provider skeleton.
//!
//! Holds the account credentials and implements the webhook normalization
//! Twilio needs (`CallSid` before the generic `call_id`), but performs no
//! network calls yet. Wiring the real REST API in replaces the synthetic
//! session bodies without touching any call site.

use async_trait::async_trait;

use super::{
    extract_str, stub_start_status, synthetic_call_id, CallDirection, CallEnd, CallsProvider,
    SessionStart, WebhookOutcome,
};
use crate::config::CallsConfig;

pub struct TwilioProvider {
    account_sid: String,
    #[allow(dead_code)] // held for the real REST integration
    auth_token: String,
}

impl TwilioProvider {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
        }
    }

    pub fn from_config(cfg: &CallsConfig) -> Self {
        Self::new(
            cfg.twilio_account_sid.clone().unwrap_or_default(),
            cfg.twilio_auth_token.clone().unwrap_or_default(),
        )
    }
}

#[async_trait]
impl CallsProvider for TwilioProvider {
    fn name(&self) -> &'static str {
        "twilio"
    }

    async fn start_inbound(&self, caller: &str) -> SessionStart {
        tracing::debug!(caller, account = %self.account_sid, "twilio inbound session");
        SessionStart {
            ok: true,
            call_id: synthetic_call_id("twilio", CallDirection::Inbound),
            status: stub_start_status(CallDirection::Inbound).to_string(),
        }
    }

    async fn start_outbound(&self, callee: &str, script: &str) -> SessionStart {
        tracing::debug!(
            callee,
            account = %self.account_sid,
            script_len = script.len(),
            "twilio outbound call"
        );
        SessionStart {
            ok: true,
            call_id: synthetic_call_id("twilio", CallDirection::Outbound),
            status: stub_start_status(CallDirection::Outbound).to_string(),
        }
    }

    async fn on_webhook_event(&self, payload: &serde_json::Value) -> WebhookOutcome {
        WebhookOutcome {
            ok: true,
            call_id: extract_str(payload, &["CallSid", "call_id"]),
            status: extract_str(payload, &["CallStatus", "status"]),
            meta: payload.clone(),
        }
    }

    async fn end_call(&self, call_id: &str) -> CallEnd {
        tracing::debug!(call_id, "twilio end call");
        CallEnd { ok: true }
    }
}
