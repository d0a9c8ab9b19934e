//! Login route.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiError, AppState};
use ledgerly_db::RbacRepository;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Sanitized user returned after login, with the role graph flattened.
#[derive(Debug, Serialize)]
pub struct LoginUser {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Legacy single-role string.
    pub role: String,
    /// Assigned role names.
    pub roles: Vec<String>,
    /// Unique permission names collected across all roles.
    pub permissions: Vec<String>,
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user.
    pub user: LoginUser,
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::validation("Email and password required"));
    }

    let rbac = RbacRepository::new(state.db.clone());
    let Some(user) = rbac.find_user_by_email(&body.email).await? else {
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| ApiError::unauthorized("Invalid credentials"))?;
    Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::unauthorized("Invalid credentials"))?;

    let access = rbac.load_user_access(user.id).await?;

    let mut permissions: Vec<String> = access
        .roles
        .iter()
        .flat_map(|r| r.permissions.iter().map(|p| p.name.clone()))
        .collect();
    permissions.sort();
    permissions.dedup();

    let token = state
        .jwt_service
        .generate_access_token(user.id)
        .map_err(|e| ApiError(ledgerly_shared::AppError::Internal(e.to_string())))?;

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            roles: access.roles.into_iter().map(|r| r.name).collect(),
            permissions,
        },
    }))
}

/// Creates the auth routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}
