//! Shared types, errors, and configuration for Ledgerly.
//!
//! This crate provides common infrastructure used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - JWT token handling
//! - SMTP email delivery
//! - The HTML-to-PDF render client

pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod pdf;

pub use config::AppConfig;
pub use email::{EmailError, EmailService};
pub use error::{AppError, AppResult};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use pdf::{PdfError, PdfRenderer};
