//! Database seeder for Ledgerly.
//!
//! Seeds the default permission catalog, the admin/manager/user roles, and
//! an admin user for local development. The admin account is taken from
//! `ADMIN_EMAIL` / `ADMIN_PASSWORD` / `ADMIN_NAME` when set.
//!
//! Usage: cargo run --bin seeder

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use ledgerly_db::entities::{permissions, role_permissions, roles, user_roles, users};

/// Default permission catalog.
const PERMISSIONS: [&str; 12] = [
    "invoices:create",
    "invoices:read",
    "invoices:update",
    "invoices:delete",
    "users:read",
    "users:create",
    "users:update",
    "users:delete",
    "campaigns:manage",
    "expenses:manage",
    "incomes:manage",
    "reports:read",
];

const MANAGER_PERMISSIONS: [&str; 5] = [
    "campaigns:manage",
    "invoices:read",
    "invoices:create",
    "invoices:update",
    "reports:read",
];

const USER_PERMISSIONS: [&str; 2] = ["invoices:read", "reports:read"];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = ledgerly_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding permissions...");
    seed_permissions(&db).await;

    println!("Seeding roles...");
    let admin_role_id = seed_role(&db, "admin", "Full administrator", &PERMISSIONS).await;
    seed_role(&db, "manager", "Manager role", &MANAGER_PERMISSIONS).await;
    seed_role(&db, "user", "Default user role", &USER_PERMISSIONS).await;

    println!("Seeding admin user...");
    seed_admin_user(&db, admin_role_id).await;

    println!("Seeding complete!");
}

async fn seed_permissions(db: &DatabaseConnection) {
    for name in PERMISSIONS {
        let existing = permissions::Entity::find()
            .filter(permissions::Column::Name.eq(name))
            .one(db)
            .await
            .expect("Failed to query permissions");
        if existing.is_some() {
            continue;
        }

        let permission = permissions::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(None),
            created_at: Set(Utc::now().into()),
        };
        permission
            .insert(db)
            .await
            .expect("Failed to insert permission");
        println!("  Created permission: {name}");
    }
}

/// Creates the role if missing and links it to the named permissions.
/// Returns the role id.
async fn seed_role(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
    permission_names: &[&str],
) -> Uuid {
    let role = match roles::Entity::find()
        .filter(roles::Column::Name.eq(name))
        .one(db)
        .await
        .expect("Failed to query roles")
    {
        Some(role) => {
            println!("  Role {name} already exists, updating links...");
            role
        }
        None => {
            let now = Utc::now();
            let role = roles::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(name.to_string()),
                description: Set(Some(description.to_string())),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };
            let role = role.insert(db).await.expect("Failed to insert role");
            println!("  Created role: {name}");
            role
        }
    };

    for permission_name in permission_names {
        let Some(permission) = permissions::Entity::find()
            .filter(permissions::Column::Name.eq(*permission_name))
            .one(db)
            .await
            .expect("Failed to query permissions")
        else {
            continue;
        };

        let linked = role_permissions::Entity::find()
            .filter(role_permissions::Column::RoleId.eq(role.id))
            .filter(role_permissions::Column::PermissionId.eq(permission.id))
            .one(db)
            .await
            .expect("Failed to query role permissions");
        if linked.is_some() {
            continue;
        }

        let link = role_permissions::ActiveModel {
            role_id: Set(role.id),
            permission_id: Set(permission.id),
        };
        link.insert(db)
            .await
            .expect("Failed to link role permission");
    }

    role.id
}

async fn seed_admin_user(db: &DatabaseConnection, admin_role_id: Uuid) {
    let email = std::env::var("ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@example.com".to_string())
        .trim()
        .to_lowercase();
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "password".to_string());
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string());

    let user = match users::Entity::find()
        .filter(users::Column::Email.eq(email.as_str()))
        .one(db)
        .await
        .expect("Failed to query users")
    {
        Some(existing) => {
            let mut model: users::ActiveModel = existing.into();
            model.role = Set("admin".to_string());
            model.updated_at = Set(Utc::now().into());
            let user = model.update(db).await.expect("Failed to update admin user");
            println!("  Existing user updated to admin: {email}");
            user
        }
        None => {
            let salt = SaltString::generate(&mut OsRng);
            let password_hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .expect("Failed to hash admin password")
                .to_string();

            let now = Utc::now();
            let user = users::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(name),
                email: Set(email.clone()),
                role: Set("admin".to_string()),
                password_hash: Set(password_hash),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };
            let user = user.insert(db).await.expect("Failed to insert admin user");
            println!("  Admin user created: {email}");
            user
        }
    };

    let linked = user_roles::Entity::find()
        .filter(user_roles::Column::UserId.eq(user.id))
        .filter(user_roles::Column::RoleId.eq(admin_role_id))
        .one(db)
        .await
        .expect("Failed to query user roles");
    if linked.is_none() {
        let link = user_roles::ActiveModel {
            user_id: Set(user.id),
            role_id: Set(admin_role_id),
        };
        link.insert(db).await.expect("Failed to link admin role");
    }
}
