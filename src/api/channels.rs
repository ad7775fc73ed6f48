//! Channel status and channel webhook endpoints.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::Arc;

use crate::channels::{channel_statuses, ChannelStatus};
use crate::store::InboundEvent;

use super::routes::AppState;

type HmacSha256 = Hmac<Sha256>;

/// GET /api/channels/status - readiness snapshot of every channel.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<Vec<ChannelStatus>> {
    Json(channel_statuses(&state.config))
}

/// POST /api/channels/telegram/webhook - inbound Telegram update.
///
/// Telegram echoes the secret token we registered the webhook with in the
/// `X-Telegram-Bot-Api-Secret-Token` header.
pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    if let Some(secret) = state.config.telegram_webhook_secret.as_deref() {
        let provided = headers
            .get("x-telegram-bot-api-secret-token")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("");
        if provided != secret {
            return Err((StatusCode::UNAUTHORIZED, "Invalid secret token".to_string()));
        }
    } else {
        tracing::warn!("telegram webhook accepted without a configured secret");
    }

    if !state.limiter.check("telegram", "channel-webhook").await {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded".to_string(),
        ));
    }

    state
        .store
        .record_channel_event(InboundEvent::now("telegram", payload))
        .await;

    Ok(Json(serde_json::json!({ "ok": true })))
}

/// Verify a Meta `X-Hub-Signature-256` header against the raw request body.
fn whatsapp_signature_valid(app_secret: &str, body: &[u8], header: &str) -> bool {
    let Some(hex_sig) = header.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(signature) = hex::decode(hex_sig) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(app_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

/// GET /api/channels/whatsapp/webhook - Meta verification handshake.
pub async fn whatsapp_verify(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<String, (StatusCode, String)> {
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);
    let challenge = params.get("hub.challenge");

    let expected = state.config.whatsapp_verify_token.as_deref();
    match (mode, token, challenge, expected) {
        (Some("subscribe"), Some(token), Some(challenge), Some(expected)) if token == expected => {
            Ok(challenge.clone())
        }
        _ => Err((StatusCode::FORBIDDEN, "Verification failed".to_string())),
    }
}

/// POST /api/channels/whatsapp/webhook - inbound WhatsApp event.
pub async fn whatsapp_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    if let Some(app_secret) = state.config.whatsapp_app_secret.as_deref() {
        let signature = headers
            .get("x-hub-signature-256")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("");
        if !whatsapp_signature_valid(app_secret, &body, signature) {
            return Err((StatusCode::UNAUTHORIZED, "Invalid signature".to_string()));
        }
    } else {
        tracing::warn!("whatsapp webhook accepted without a configured app secret");
    }

    if !state.limiter.check("whatsapp", "channel-webhook").await {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded".to_string(),
        ));
    }

    let payload: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Malformed JSON body: {}", e)))?;

    state
        .store
        .record_channel_event(InboundEvent::now("whatsapp", payload))
        .await;

    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_signature_roundtrip() {
        let secret = "app-secret";
        let body = br#"{"entry":[]}"#;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        let header = format!("sha256={}", hex::encode(mac.finalize().into_bytes()));

        assert!(whatsapp_signature_valid(secret, body, &header));
        assert!(!whatsapp_signature_valid("wrong-secret", body, &header));
        assert!(!whatsapp_signature_valid(secret, b"tampered", &header));
    }

    #[test]
    fn test_signature_header_must_be_prefixed_hex() {
        assert!(!whatsapp_signature_valid("s", b"x", "deadbeef"));
        assert!(!whatsapp_signature_valid("s", b"x", "sha256=not-hex"));
        assert!(!whatsapp_signature_valid("s", b"x", ""));
    }
}
