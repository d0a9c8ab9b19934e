//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for invoices, incomes, expenses, campaigns,
//!   metrics, reports, and role administration
//! - Authentication middleware and the permission gate
//! - The `{ "error": ... }` response envelope

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use ledgerly_shared::{EmailService, JwtService, PdfRenderer};

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Email service for sending invoices.
    pub email_service: Arc<EmailService>,
    /// HTML-to-PDF render client, memoized once per process.
    pub pdf_renderer: Arc<PdfRenderer>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
