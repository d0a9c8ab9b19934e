//! User administration routes.
//!
//! Responses never carry the password hash. Creation hashes the password
//! with Argon2 and relies on the unique email index for duplicate
//! detection, surfaced as a 409.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::{ApiError, AppState, middleware::CurrentUser};
use ledgerly_core::access::LegacyRole;
use ledgerly_db::{
    RbacRepository,
    entities::users,
    repositories::rbac::CreateUser,
};
use ledgerly_shared::AppError;

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Plain-text password, hashed before storage.
    pub password: String,
    /// Legacy role string; defaults to "user".
    pub role: Option<String>,
}

/// A user with the password hash stripped.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Legacy role string.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

async fn list_users(
    State(state): State<AppState>,
    CurrentUser(_access): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let repo = RbacRepository::new(state.db.clone());
    let users: Vec<UserResponse> = repo
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(users))
}

async fn create_user(
    State(state): State<AppState>,
    CurrentUser(_access): CurrentUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_new_user(&body)?;
    let role = resolve_role(body.role.as_deref())?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(body.password.as_bytes(), &salt)
        .map_err(|e| ApiError(AppError::Internal(format!("password hashing failed: {e}"))))?
        .to_string();

    let repo = RbacRepository::new(state.db.clone());
    let created = repo
        .create_user(CreateUser {
            name: body.name,
            email: body.email,
            role: role.as_str().to_string(),
            password_hash,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

fn validate_new_user(body: &CreateUserRequest) -> Result<(), ApiError> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::validation("Name, email and password are required"));
    }
    Ok(())
}

fn resolve_role(role: Option<&str>) -> Result<LegacyRole, ApiError> {
    match role {
        None => Ok(LegacyRole::User),
        Some(s) => LegacyRole::from_str(s).map_err(ApiError::validation),
    }
}

/// Creates the user administration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(create_user))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        }
    }

    #[rstest::rstest]
    #[case("", "a@b.com", "secret")]
    #[case("Ana", "", "secret")]
    #[case("Ana", "a@b.com", "")]
    #[case("   ", "a@b.com", "secret")]
    fn test_rejects_missing_fields(
        #[case] name: &str,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        assert!(validate_new_user(&request(name, email, password)).is_err());
    }

    #[test]
    fn test_accepts_complete_request() {
        assert!(validate_new_user(&request("Ana", "a@b.com", "secret")).is_ok());
    }

    #[test]
    fn test_role_defaults_to_user() {
        assert_eq!(resolve_role(None).unwrap(), LegacyRole::User);
        assert_eq!(resolve_role(Some("admin")).unwrap(), LegacyRole::Admin);
        assert!(resolve_role(Some("superuser")).is_err());
    }

    #[test]
    fn test_response_strips_password_hash() {
        let now = chrono::Utc::now().fixed_offset();
        let user = users::Model {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: "user".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "ana@example.com");
    }
}
