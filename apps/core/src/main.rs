// StorePulse Backend Entry Point
// Serves the auto-reply engine and the scoring heuristics over HTTP

use std::sync::Arc;

use anyhow::Context;
use storepulse_core::{
    actors::{AutoReplyHandle, AutoReplySettings},
    brain::TemplateFiller,
    config::AppConfig,
    providers::ThreadRandom,
    telemetry,
    web::{self, AppState},
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Configuration & Logging ---
    let config = AppConfig::from_env().context("failed to load configuration")?;
    telemetry::init_tracing(&config.log_filter, config.log_format)?;
    info!(
        bind = %config.bind_address,
        auto_reply = config.auto_reply_enabled,
        "Configuration loaded. Starting StorePulse..."
    );

    // --- 2. Auto-reply actor ---
    let settings = AutoReplySettings {
        active: config.auto_reply_enabled,
        filler: TemplateFiller::new(config.filler_settings(), Arc::new(ThreadRandom)),
        call_timeout: config.auto_reply_timeout,
        ..AutoReplySettings::default()
    };
    let auto_reply = AutoReplyHandle::spawn(settings);

    // --- 3. Router ---
    let app = web::router(AppState::new(Arc::new(auto_reply.clone())));

    // --- 4. Serve ---
    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    auto_reply.shutdown().await?;
    info!("StorePulse stopped");
    Ok(())
}
