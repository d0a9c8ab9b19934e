//! Authentication middleware and the permission gate.
//!
//! The middleware resolves the caller: bearer token -> claims -> user with
//! the role/permission graph hydrated by the RBAC repository. Handlers then
//! gate capabilities with [`require_role`] / [`require_permission`].
//!
//! Failure kinds are distinct: a missing or invalid identity is 401
//! ("Authentication required"), a present identity without the capability
//! is 403 ("Forbidden").

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::{ApiError, AppState};
use ledgerly_core::access::{AccessGate, UserAccess};
use ledgerly_db::{RbacRepository, repositories::rbac::RbacError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn authentication_required() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Authentication required" })),
    )
        .into_response()
}

/// Authentication middleware that resolves the caller's access data.
///
/// 1. Extracts the bearer token from the Authorization header
/// 2. Validates the token, yielding the user id
/// 3. Hydrates User -> Roles -> Permissions through the RBAC repository
/// 4. Stores the [`UserAccess`] in request extensions for handlers
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return authentication_required();
    };

    let Ok(claims) = state.jwt_service.validate_token(token) else {
        return authentication_required();
    };

    let rbac = RbacRepository::new(state.db.clone());
    match rbac.load_user_access(claims.user_id()).await {
        Ok(access) => {
            request.extensions_mut().insert(access);
            next.run(request).await
        }
        // A token for a deleted user is no identity at all.
        Err(RbacError::UserNotFound(_)) => authentication_required(),
        Err(e) => {
            error!(error = %e, "failed to hydrate caller access");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

/// Fails with 403 unless the caller holds the named role.
///
/// A legacy admin passes every check.
pub fn require_role(access: &UserAccess, role_name: &str) -> Result<(), ApiError> {
    if AccessGate::has_role(access, role_name) {
        Ok(())
    } else {
        Err(ApiError::forbidden("Forbidden"))
    }
}

/// Fails with 403 unless the caller holds the named permission through any
/// of its hydrated roles.
pub fn require_permission(access: &UserAccess, permission_name: &str) -> Result<(), ApiError> {
    if AccessGate::has_permission(access, permission_name) {
        Ok(())
    } else {
        Err(ApiError::forbidden("Forbidden"))
    }
}

/// Extractor for the authenticated caller's hydrated access data.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserAccess);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserAccess>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Authentication required" })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerly_core::access::LegacyRole;
    use uuid::Uuid;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn test_require_permission_admin_short_circuit() {
        let access = UserAccess {
            user_id: Uuid::new_v4(),
            legacy_role: LegacyRole::Admin,
            roles: vec![],
        };
        assert!(require_permission(&access, "reports:read").is_ok());
        assert!(require_role(&access, "admin").is_ok());
    }

    #[test]
    fn test_require_permission_rejects_plain_user() {
        let access = UserAccess {
            user_id: Uuid::new_v4(),
            legacy_role: LegacyRole::User,
            roles: vec![],
        };
        let err = require_permission(&access, "reports:read").unwrap_err();
        assert_eq!(err.0.status_code(), 403);
    }
}
