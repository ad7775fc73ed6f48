//! Application configuration.
//!
//! All environment reads happen here, once, at startup. Everything past this
//! boundary takes `&Config` (or a narrower slice like [`CallsConfig`]) so the
//! rest of the crate is testable without touching the process environment.

use serde::{Deserialize, Serialize};

/// Credentials and overrides relevant to calls-provider selection.
///
/// Carved out of [`Config`] so the provider factory can be exercised in tests
/// with hand-built values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallsConfig {
    /// Explicit provider override ("mock", "twilio", "telegram").
    /// Honored only when that provider's credentials are present.
    pub provider_override: Option<String>,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub telegram_bot_token: Option<String>,
}

impl CallsConfig {
    pub fn has_twilio_credentials(&self) -> bool {
        matches!(
            (&self.twilio_account_sid, &self.twilio_auth_token),
            (Some(sid), Some(token)) if !sid.is_empty() && !token.is_empty()
        )
    }

    pub fn has_telegram_credentials(&self) -> bool {
        self.telegram_bot_token
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }
}

/// Auth settings (single-tenant dashboard login).
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Shared secret for signing JWTs. Required when auth is enforced.
    pub jwt_secret: Option<String>,
    /// Dashboard password for `/api/auth/login`.
    pub dashboard_password: Option<String>,
    /// Token lifetime in days.
    pub jwt_ttl_days: i64,
}

impl AuthConfig {
    /// Auth is required whenever we are not in dev mode.
    pub fn auth_required(&self, dev_mode: bool) -> bool {
        !dev_mode
    }
}

/// Global application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Disables auth and relaxes webhook secret checks.
    pub dev_mode: bool,
    pub auth: AuthConfig,

    /// Public base URL of the Avatar G app (dashboard links, web channel).
    pub app_url: Option<String>,
    /// Base URL for the internal collaborator services delegation targets
    /// point at. Defaults to the app URL.
    pub delegate_base_url: Option<String>,

    /// Supabase project URL and service-role key for the persistence
    /// collaborator.
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,

    // Channel credentials.
    pub telegram_bot_token: Option<String>,
    pub telegram_webhook_secret: Option<String>,
    pub whatsapp_access_token: Option<String>,
    pub whatsapp_phone_id: Option<String>,
    pub whatsapp_verify_token: Option<String>,
    pub whatsapp_app_secret: Option<String>,

    // Telephony credentials.
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub calls_provider_override: Option<String>,

    // Rate limiting for the planning and webhook endpoints.
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Build configuration from environment variables.
    pub fn from_env() -> Self {
        let dev_mode = std::env::var("DEV_MODE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            host: env_opt("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env_opt("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8787),
            dev_mode,
            auth: AuthConfig {
                jwt_secret: env_opt("JWT_SECRET"),
                dashboard_password: env_opt("DASHBOARD_PASSWORD"),
                jwt_ttl_days: env_opt("JWT_TTL_DAYS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            },
            app_url: env_opt("APP_URL"),
            delegate_base_url: env_opt("DELEGATE_BASE_URL"),
            supabase_url: env_opt("SUPABASE_URL"),
            supabase_service_role_key: env_opt("SUPABASE_SERVICE_ROLE_KEY"),
            telegram_bot_token: env_opt("TELEGRAM_BOT_TOKEN"),
            telegram_webhook_secret: env_opt("TELEGRAM_WEBHOOK_SECRET"),
            whatsapp_access_token: env_opt("WHATSAPP_ACCESS_TOKEN"),
            whatsapp_phone_id: env_opt("WHATSAPP_PHONE_ID"),
            whatsapp_verify_token: env_opt("WHATSAPP_VERIFY_TOKEN"),
            whatsapp_app_secret: env_opt("WHATSAPP_APP_SECRET"),
            twilio_account_sid: env_opt("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: env_opt("TWILIO_AUTH_TOKEN"),
            calls_provider_override: env_opt("CALLS_PROVIDER"),
            rate_limit_max_requests: env_opt("RATE_LIMIT_MAX_REQUESTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            rate_limit_window_secs: env_opt("RATE_LIMIT_WINDOW_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    /// The calls-provider slice of this configuration.
    pub fn calls_config(&self) -> CallsConfig {
        CallsConfig {
            provider_override: self.calls_provider_override.clone(),
            twilio_account_sid: self.twilio_account_sid.clone(),
            twilio_auth_token: self.twilio_auth_token.clone(),
            telegram_bot_token: self.telegram_bot_token.clone(),
        }
    }

    /// Dashboard URL embedded in callback scripts.
    pub fn dashboard_url(&self) -> String {
        let base = self.app_url.as_deref().unwrap_or("https://avatarg.app");
        format!("{}/dashboard", base.trim_end_matches('/'))
    }

    /// Base URL used by the delegation dispatcher.
    pub fn delegate_base(&self) -> String {
        self.delegate_base_url
            .as_deref()
            .or(self.app_url.as_deref())
            .unwrap_or("http://127.0.0.1:8787")
            .trim_end_matches('/')
            .to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            dev_mode: true,
            auth: AuthConfig {
                jwt_secret: None,
                dashboard_password: None,
                jwt_ttl_days: 30,
            },
            app_url: None,
            delegate_base_url: None,
            supabase_url: None,
            supabase_service_role_key: None,
            telegram_bot_token: None,
            telegram_webhook_secret: None,
            whatsapp_access_token: None,
            whatsapp_phone_id: None,
            whatsapp_verify_token: None,
            whatsapp_app_secret: None,
            twilio_account_sid: None,
            twilio_auth_token: None,
            calls_provider_override: None,
            rate_limit_max_requests: 30,
            rate_limit_window_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twilio_credentials_require_both_parts() {
        let mut cfg = CallsConfig::default();
        assert!(!cfg.has_twilio_credentials());

        cfg.twilio_account_sid = Some("AC123".to_string());
        assert!(!cfg.has_twilio_credentials());

        cfg.twilio_auth_token = Some("token".to_string());
        assert!(cfg.has_twilio_credentials());
    }

    #[test]
    fn test_dashboard_url_from_app_url() {
        let cfg = Config {
            app_url: Some("https://avatarg.example.com/".to_string()),
            ..Config::default()
        };
        assert_eq!(cfg.dashboard_url(), "https://avatarg.example.com/dashboard");
    }

    #[test]
    fn test_empty_telegram_token_is_not_credentials() {
        let cfg = CallsConfig {
            telegram_bot_token: Some(String::new()),
            ..CallsConfig::default()
        };
        assert!(!cfg.has_telegram_credentials());
    }
}
