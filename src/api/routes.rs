//! HTTP route handlers and server assembly.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::calls::{select_provider, CallsProvider};
use crate::config::Config;
use crate::delegate::Dispatcher;
use crate::ratelimit::RateLimiter;
use crate::store::CallsStore;

use super::auth;
use super::calls as calls_api;
use super::channels as channels_api;
use super::planning;
use super::types::HealthResponse;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Persistence collaborator with in-memory fallback.
    pub store: CallsStore,
    /// Calls provider selected once per process from configuration.
    pub calls: Arc<dyn CallsProvider>,
    /// Dispatcher for delegation targets.
    pub dispatcher: Dispatcher,
    /// Fixed-window limiter for the planning and webhook endpoints.
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = CallsStore::from_config(&config);
        let calls = select_provider(&config.calls_config());
        let dispatcher = Dispatcher::new(config.delegate_base());
        let limiter = RateLimiter::new(
            config.rate_limit_max_requests,
            Duration::from_secs(config.rate_limit_window_secs),
        );
        tracing::info!(provider = calls.name(), "calls provider selected");
        Self {
            config,
            store,
            calls,
            dispatcher,
            limiter,
        }
    }
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let host = config.host.clone();
    let port = config.port;
    let state = Arc::new(AppState::new(config));

    // Provider webhooks authenticate via secrets/signatures, not JWTs.
    let public_routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/calls/webhook/inbound", post(calls_api::webhook_inbound))
        .route("/api/calls/webhook/status", post(calls_api::webhook_status))
        .route(
            "/api/channels/telegram/webhook",
            post(channels_api::telegram_webhook),
        )
        .route(
            "/api/channels/whatsapp/webhook",
            get(channels_api::whatsapp_verify).post(channels_api::whatsapp_webhook),
        );

    let protected_routes = Router::new()
        .route("/api/plan", post(planning::create_plan))
        .route("/api/orchestrate", post(planning::orchestrate))
        .route("/api/channels/status", get(channels_api::get_status))
        .route("/api/calls/callback", post(calls_api::queue_callback))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_auth,
        ));

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::clone(&state));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for SIGTERM/SIGINT.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dev_mode: state.config.dev_mode,
        auth_required: state.config.auth.auth_required(state.config.dev_mode),
        calls_provider: state.calls.name().to_string(),
    })
}
