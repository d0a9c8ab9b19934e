//! Ledgerly API Server
//!
//! Main entry point for the Ledgerly backend service.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledgerly_api::{AppState, create_router};
use ledgerly_db::{InvoiceRepository, connect};
use ledgerly_shared::{AppConfig, EmailService, JwtConfig, JwtService, PdfRenderer};

/// Interval between scheduled overdue sweeps.
const OVERDUE_SWEEP_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledgerly=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expiry_secs: config.jwt.access_token_expiry_secs,
    });

    // Create email service
    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    // Create the PDF render client; the underlying HTTP client is built
    // once on first use and reused for every render after that.
    let pdf_renderer = PdfRenderer::new(config.pdf.clone());
    info!(render_url = %config.pdf.url, "PDF render client configured");

    // Overdue sweep: once at startup, then every 12 hours. The sweep is
    // idempotent, so racing the on-demand /invoices/check-overdue endpoint
    // is harmless.
    let sweep_repo = InvoiceRepository::new(db.clone());
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(OVERDUE_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match sweep_repo.mark_overdue().await {
                Ok(updated) => info!(updated, "overdue sweep completed"),
                Err(e) => error!(error = %e, "overdue sweep failed"),
            }
        }
    });

    // Create application state
    let state = AppState {
        db,
        jwt_service: Arc::new(jwt_service),
        email_service: Arc::new(email_service),
        pdf_renderer: Arc::new(pdf_renderer),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
