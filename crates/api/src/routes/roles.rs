//! Role and permission administration routes.
//!
//! Role creation requires the `admin` role (the legacy admin flag also
//! passes). Listings return roles with their permission graphs hydrated.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    ApiError, AppState,
    middleware::{CurrentUser, require_role},
};
use ledgerly_db::{RbacRepository, repositories::rbac::CreateRole};

/// Request body for creating a role.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    /// Unique role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Permission ids or names; unresolvable entries are skipped.
    #[serde(default)]
    pub permissions: Vec<String>,
}

async fn create_role(
    State(state): State<AppState>,
    CurrentUser(access): CurrentUser,
    Json(body): Json<CreateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_role(&access, "admin")?;

    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Role name is required"));
    }

    let repo = RbacRepository::new(state.db.clone());
    let created = repo
        .create_role(CreateRole {
            name: body.name,
            description: body.description,
            permissions: body.permissions,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_roles(
    State(state): State<AppState>,
    CurrentUser(_access): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RbacRepository::new(state.db.clone());
    Ok(Json(repo.list_roles().await?))
}

async fn list_permissions(
    State(state): State<AppState>,
    CurrentUser(_access): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RbacRepository::new(state.db.clone());
    Ok(Json(repo.list_permissions().await?))
}

/// Creates the role administration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/roles", post(create_role))
        .route("/roles", get(list_roles))
        .route("/permissions", get(list_permissions))
}
