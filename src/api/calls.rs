//! Calls webhook and callback-queue endpoints.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::callback::build_callback_script;
use crate::calls::WebhookOutcome;
use crate::store::{DbCall, DbCallback, StoreError};

use super::auth::AuthUser;
use super::routes::AppState;
use super::types::{QueueCallbackRequest, QueueCallbackResponse};

/// Normalize and persist one provider webhook event. The store degrades to
/// its fallback log on failure, so this handler never reports an error for
/// the write.
async fn handle_webhook(state: &AppState, payload: serde_json::Value) -> WebhookOutcome {
    let outcome = state.calls.on_webhook_event(&payload).await;

    let call = DbCall {
        id: None,
        call_id: outcome
            .call_id
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        provider: state.calls.name().to_string(),
        status: outcome.status.clone().unwrap_or_else(|| "received".to_string()),
        meta: outcome.meta.clone(),
        updated_at: Some(chrono::Utc::now()),
    };
    state.store.record_call(call, payload).await;

    outcome
}

/// POST /api/calls/webhook/inbound - provider event for a new/ongoing call.
pub async fn webhook_inbound(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<WebhookOutcome>, (StatusCode, String)> {
    if !state.limiter.check(state.calls.name(), "calls-webhook").await {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded".to_string(),
        ));
    }
    Ok(Json(handle_webhook(&state, payload).await))
}

/// POST /api/calls/webhook/status - provider status-change event.
pub async fn webhook_status(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<WebhookOutcome>, (StatusCode, String)> {
    if !state.limiter.check(state.calls.name(), "calls-webhook").await {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded".to_string(),
        ));
    }
    Ok(Json(handle_webhook(&state, payload).await))
}

/// POST /api/calls/callback - queue a spoken callback for a task.
pub async fn queue_callback(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<QueueCallbackRequest>,
) -> Result<Json<QueueCallbackResponse>, (StatusCode, String)> {
    if req.summary.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Summary cannot be empty".to_string(),
        ));
    }

    let goal = req.goal.as_deref().unwrap_or(&req.summary);
    let script = build_callback_script(goal, req.results.as_ref(), &state.config.dashboard_url());

    let record = DbCallback {
        id: None,
        task_id: req.task_id,
        summary: req.summary.clone(),
        script: script.clone(),
        force: req.force,
        status: "queued".to_string(),
        created_at: None,
    };

    let stored = state.store.queue_callback(record).await.map_err(|e| match e {
        StoreError::NotConfigured => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Persistence not configured".to_string(),
        ),
        other => (StatusCode::BAD_GATEWAY, other.to_string()),
    })?;

    tracing::info!(task_id = %req.task_id, user = %user.id, "queued callback");

    Ok(Json(QueueCallbackResponse {
        id: stored.id,
        task_id: stored.task_id,
        status: stored.status,
        script,
    }))
}
