use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use leadrelay::config::AppConfig;
use leadrelay::handlers;
use leadrelay::services::mail::smtp::SmtpMailer;
use leadrelay::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    if !config.email_configured() {
        tracing::warn!("EMAIL_USER/EMAIL_PASS not set, mail-sending endpoints will return 500");
    }
    if config.webhook_secret.is_empty() {
        tracing::warn!("CALENDLY_WEBHOOK_SECRET not set, every scheduling webhook will be rejected");
    }

    let mailer = SmtpMailer::from_config(&config)?;
    tracing::info!(host = %config.smtp_host, port = config.smtp_port, "using SMTP relay");

    let state = Arc::new(AppState {
        config: config.clone(),
        mailer: Box::new(mailer),
    });

    let app = handlers::router(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
