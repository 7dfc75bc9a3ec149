//! Webhook HTTP server: receives Telegram updates and dispatches them.

use crate::channels::{TelegramChannel, TelegramUpdate};
use crate::config::{self, Config};
use crate::handlers;
use crate::llm::GeminiClient;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Shared state for the webhook server (config, channel, generation client).
/// Built once at startup and read-only afterwards; handlers receive it by
/// injection, never as ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub telegram: Arc<TelegramChannel>,
    /// None when no API key is configured; generation requests then get an
    /// unavailable notice instead of a placeholder.
    pub generator: Option<Arc<GeminiClient>>,
}

/// Build the router: liveness, webhook receiver (token-gated path), and the
/// operational webhook-registration endpoint.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/:token", post(receive_update))
        .route("/setup_webhook_internally", get(setup_webhook))
        .with_state(state)
}

/// Run the webhook server; binds to config.server.bind:config.server.port.
/// A Telegram bot token must be configured or startup fails. A missing
/// generation API key only degrades the generation handler.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_server(config: Config) -> Result<()> {
    let Some(token) = config::resolve_telegram_token(&config) else {
        anyhow::bail!(
            "refusing to start without a Telegram bot token (set TELEGRAM_BOT_TOKEN or channels.telegram.botToken)"
        );
    };
    let telegram = Arc::new(TelegramChannel::new(
        token,
        config.channels.telegram.api_base.clone(),
    ));

    let generator = match config::resolve_generation_api_key(&config) {
        Some(key) => Some(Arc::new(GeminiClient::new(
            key,
            config.generation.model.clone(),
            config.generation.base_url.clone(),
        ))),
        None => {
            log::warn!(
                "generation backend not configured (set GEMINI_API_KEY or generation.apiKey); text messages get an unavailable notice"
            );
            None
        }
    };
    if let Some(ref g) = generator {
        log::info!("generation backend configured (model {})", g.model());
    }

    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let state = AppState {
        config: Arc::new(config),
        telegram,
        generator,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("webhook server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("webhook server exited")?;
    log::info!("webhook server stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received");
}

/// POST /:token — receives one Telegram update JSON; the path segment is the
/// bot token and acts as the routing secret. The body is force-parsed as
/// JSON: a parse failure is the only non-200 outcome (500, logged, no
/// outbound call). Handler errors are logged and the response stays
/// 200 "ok" so Telegram never re-delivers the update.
async fn receive_update(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Bytes,
) -> (StatusCode, &'static str) {
    if token != state.telegram.token() {
        return (StatusCode::NOT_FOUND, "not found");
    }
    let update: TelegramUpdate = match serde_json::from_slice(&body) {
        Ok(u) => u,
        Err(e) => {
            log::warn!("webhook: invalid update payload: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "error");
        }
    };
    if let Err(e) =
        handlers::process_update(&state.telegram, state.generator.as_deref(), &update).await
    {
        log::warn!("webhook: update handling failed: {}", e);
    }
    (StatusCode::OK, "ok")
}

/// GET / — liveness text for external health checks.
async fn liveness() -> &'static str {
    "Bot is running!"
}

/// GET /setup_webhook_internally — registers {publicUrl}/{token} as the
/// webhook target via one setWebhook call. Idempotent; calling it again
/// re-registers the same URL. Reachable without auth by anyone who knows
/// the path; the trust model here is secrecy of the deployment URL.
async fn setup_webhook(State(state): State<AppState>) -> (StatusCode, String) {
    let Some(public_url) = state
        .config
        .server
        .public_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "no public URL configured (set server.publicUrl)".to_string(),
        );
    };
    let webhook_url = format!(
        "{}/{}",
        public_url.trim_end_matches('/'),
        state.telegram.token()
    );
    match state.telegram.set_webhook(&webhook_url).await {
        Ok(()) => {
            log::info!("webhook registered: {}", webhook_url);
            (StatusCode::OK, "Webhook setup was successful!".to_string())
        }
        Err(e) => {
            log::warn!("webhook registration failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}
