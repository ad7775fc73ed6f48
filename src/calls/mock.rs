//! Mock calls provider - the default when no telephony credentials exist.

use async_trait::async_trait;

use super::{
    extract_str, stub_start_status, synthetic_call_id, CallDirection, CallEnd, CallsProvider,
    SessionStart, WebhookOutcome,
};

/// No-op provider returning synthetic sessions.
pub struct MockProvider;

#[async_trait]
impl CallsProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn start_inbound(&self, caller: &str) -> SessionStart {
        tracing::debug!(caller, "mock inbound session");
        SessionStart {
            ok: true,
            call_id: synthetic_call_id("mock", CallDirection::Inbound),
            status: stub_start_status(CallDirection::Inbound).to_string(),
        }
    }

    async fn start_outbound(&self, callee: &str, script: &str) -> SessionStart {
        tracing::debug!(callee, script_len = script.len(), "mock outbound call");
        SessionStart {
            ok: true,
            call_id: synthetic_call_id("mock", CallDirection::Outbound),
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
        tracing::debug!(call_id, "mock end call");
        CallEnd { ok: true }
    }
}
