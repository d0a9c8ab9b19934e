//! Role and permission repository.
//!
//! Permission checks need the User -> Roles -> Permissions graph resolved.
//! Hydration is an explicit repository step (`load_user_access`), not an
//! implicit lazy-population side effect.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use std::str::FromStr;
use uuid::Uuid;

use crate::entities::{permissions, role_permissions, roles, user_roles, users};
use ledgerly_core::access::{HydratedRole, LegacyRole, Permission, UserAccess};

/// Error types for role and permission operations.
#[derive(Debug, thiserror::Error)]
pub enum RbacError {
    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Role name already exists.
    #[error("Role already exists: {0}")]
    DuplicateRole(String),

    /// Email address already registered.
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a role. Permissions may be referenced by id or name.
#[derive(Debug, Clone)]
pub struct CreateRole {
    /// Unique role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Permission ids (as UUID strings) or permission names; unresolvable
    /// entries are skipped.
    pub permissions: Vec<String>,
}

/// Input for creating a user. The password has already been hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Email address; lowercased and trimmed before storage.
    pub email: String,
    /// Legacy role string, "user" or "admin".
    pub role: String,
    /// Argon2 hash of the password.
    pub password_hash: String,
}

/// Repository for users, roles, and permissions.
#[derive(Debug, Clone)]
pub struct RbacRepository {
    db: DatabaseConnection,
}

impl RbacRepository {
    /// Creates a new RBAC repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by id.
    pub async fn find_user(&self, id: Uuid) -> Result<users::Model, RbacError> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RbacError::UserNotFound(id))
    }

    /// Finds a user by email, lowercased and trimmed first.
    pub async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<users::Model>, RbacError> {
        let email = email.trim().to_lowercase();
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    /// Lists all users, newest first.
    pub async fn list_users(&self) -> Result<Vec<users::Model>, RbacError> {
        Ok(users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Creates a user.
    ///
    /// Returns `DuplicateEmail` when the email is already registered; the
    /// unique index on email is the source of truth, so concurrent
    /// registrations cannot slip past a read-then-write check.
    pub async fn create_user(&self, input: CreateUser) -> Result<users::Model, RbacError> {
        let email = input.email.trim().to_lowercase();
        let now = Utc::now();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            email: Set(email.clone()),
            role: Set(input.role),
            password_hash: Set(input.password_hash),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        user.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                RbacError::DuplicateEmail(email)
            } else {
                RbacError::Database(e)
            }
        })
    }

    /// Loads a user's access data with the full role/permission graph
    /// hydrated: user_roles -> roles, then role_permissions -> permissions.
    pub async fn load_user_access(&self, user_id: Uuid) -> Result<UserAccess, RbacError> {
        let user = self.find_user(user_id).await?;
        let legacy_role = LegacyRole::from_str(&user.role).unwrap_or_default();

        let role_ids: Vec<Uuid> = user_roles::Entity::find()
            .filter(user_roles::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.role_id)
            .collect();

        let mut roles = Vec::with_capacity(role_ids.len());
        if !role_ids.is_empty() {
            let role_models = roles::Entity::find()
                .filter(roles::Column::Id.is_in(role_ids))
                .all(&self.db)
                .await?;
            for role in role_models {
                roles.push(self.hydrate_role(role).await?);
            }
        }

        Ok(UserAccess {
            user_id,
            legacy_role,
            roles,
        })
    }

    /// Resolves a role's permission references.
    async fn hydrate_role(&self, role: roles::Model) -> Result<HydratedRole, RbacError> {
        let permission_ids: Vec<Uuid> = role_permissions::Entity::find()
            .filter(role_permissions::Column::RoleId.eq(role.id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.permission_id)
            .collect();

        let permissions = if permission_ids.is_empty() {
            Vec::new()
        } else {
            permissions::Entity::find()
                .filter(permissions::Column::Id.is_in(permission_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|p| Permission {
                    id: p.id,
                    name: p.name,
                })
                .collect()
        };

        Ok(HydratedRole {
            id: role.id,
            name: role.name,
            permissions,
        })
    }

    /// Creates a role, resolving permission references by id or name.
    ///
    /// Returns `DuplicateRole` when the name is already taken.
    pub async fn create_role(&self, input: CreateRole) -> Result<HydratedRole, RbacError> {
        let mut permission_ids: Vec<Uuid> = Vec::new();
        for reference in &input.permissions {
            if let Ok(id) = Uuid::parse_str(reference) {
                permission_ids.push(id);
                continue;
            }
            let found = permissions::Entity::find()
                .filter(permissions::Column::Name.eq(reference.as_str()))
                .one(&self.db)
                .await?;
            if let Some(permission) = found {
                permission_ids.push(permission.id);
            }
        }

        let now = Utc::now();
        let role = roles::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.clone()),
            description: Set(input.description),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let role = role.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                RbacError::DuplicateRole(input.name.clone())
            } else {
                RbacError::Database(e)
            }
        })?;

        for permission_id in &permission_ids {
            let link = role_permissions::ActiveModel {
                role_id: Set(role.id),
                permission_id: Set(*permission_id),
            };
            link.insert(&self.db).await?;
        }

        self.hydrate_role(role).await
    }

    /// Lists all roles with their permissions hydrated.
    pub async fn list_roles(&self) -> Result<Vec<HydratedRole>, RbacError> {
        let role_models = roles::Entity::find()
            .order_by_asc(roles::Column::Name)
            .all(&self.db)
            .await?;

        let mut roles = Vec::with_capacity(role_models.len());
        for role in role_models {
            roles.push(self.hydrate_role(role).await?);
        }
        Ok(roles)
    }

    /// Lists all permissions, sorted by name.
    pub async fn list_permissions(&self) -> Result<Vec<permissions::Model>, RbacError> {
        Ok(permissions::Entity::find()
            .order_by_asc(permissions::Column::Name)
            .all(&self.db)
            .await?)
    }
}
