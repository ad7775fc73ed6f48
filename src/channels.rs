//! Channel status registry - reports readiness of each communication surface.
//!
//! Statuses are recomputed on demand from configuration; there is no
//! persistent channel identity.

use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Web,
    Telegram,
    Whatsapp,
    Mobile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStatus {
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    pub connected: bool,
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ChannelStatus {
    fn new(kind: ChannelKind, connected: bool, ready: bool, note: Option<&str>) -> Self {
        Self {
            kind,
            connected,
            ready,
            note: note.map(|n| n.to_string()),
        }
    }
}

/// Derive the current status of every channel from configuration.
pub fn channel_statuses(config: &Config) -> Vec<ChannelStatus> {
    let web_ready = config.app_url.is_some();
    let web = ChannelStatus::new(
        ChannelKind::Web,
        true,
        web_ready,
        if web_ready { None } else { Some("APP_URL not configured") },
    );

    let tg_connected = config.telegram_bot_token.is_some();
    let tg_ready = tg_connected && config.telegram_webhook_secret.is_some();
    let telegram = ChannelStatus::new(
        ChannelKind::Telegram,
        tg_connected,
        tg_ready,
        match (tg_connected, tg_ready) {
            (false, _) => Some("bot token missing"),
            (true, false) => Some("webhook secret missing"),
            _ => None,
        },
    );

    let wa_connected =
        config.whatsapp_access_token.is_some() && config.whatsapp_phone_id.is_some();
    let wa_ready = wa_connected && config.whatsapp_verify_token.is_some();
    let whatsapp = ChannelStatus::new(
        ChannelKind::Whatsapp,
        wa_connected,
        wa_ready,
        match (wa_connected, wa_ready) {
            (false, _) => Some("access token or phone id missing"),
            (true, false) => Some("verify token missing"),
            _ => None,
        },
    );

    let mobile = ChannelStatus::new(
        ChannelKind::Mobile,
        false,
        false,
        Some("mobile channel not provisioned"),
    );

    vec![web, telegram, whatsapp, mobile]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_config_reports_mostly_unready() {
        let statuses = channel_statuses(&Config::default());
        assert_eq!(statuses.len(), 4);

        let web = &statuses[0];
        assert!(web.connected && !web.ready);

        let telegram = &statuses[1];
        assert!(!telegram.connected && !telegram.ready);
        assert_eq!(telegram.note.as_deref(), Some("bot token missing"));
    }

    #[test]
    fn test_telegram_ready_with_token_and_secret() {
        let config = Config {
            telegram_bot_token: Some("123:abc".to_string()),
            telegram_webhook_secret: Some("s3cret".to_string()),
            ..Config::default()
        };
        let telegram = &channel_statuses(&config)[1];
        assert!(telegram.connected && telegram.ready);
        assert!(telegram.note.is_none());
    }

    #[test]
    fn test_whatsapp_connected_but_not_ready() {
        let config = Config {
            whatsapp_access_token: Some("tok".to_string()),
            whatsapp_phone_id: Some("123".to_string()),
            ..Config::default()
        };
        let whatsapp = &channel_statuses(&config)[2];
        assert!(whatsapp.connected);
        assert!(!whatsapp.ready);
        assert_eq!(whatsapp.note.as_deref(), Some("verify token missing"));
    }

    #[test]
    fn test_mobile_always_unprovisioned() {
        let mobile = &channel_statuses(&Config::default())[3];
        assert!(!mobile.connected && !mobile.ready);
    }
}
