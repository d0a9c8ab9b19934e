//! Initial database migration.
//!
//! Creates the transaction, invoice, campaign, and RBAC tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: USERS & RBAC
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ROLES_SQL).await?;
        db.execute_unprepared(PERMISSIONS_SQL).await?;
        db.execute_unprepared(ROLE_PERMISSIONS_SQL).await?;
        db.execute_unprepared(USER_ROLES_SQL).await?;

        // ============================================================
        // PART 2: TRANSACTIONS
        // ============================================================
        db.execute_unprepared(INCOMES_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;

        // ============================================================
        // PART 3: INVOICES
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;

        // ============================================================
        // PART 4: MARKETING
        // ============================================================
        db.execute_unprepared(CAMPAIGNS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS campaigns, invoices, expenses, incomes, \
             user_roles, role_permissions, permissions, roles, users CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ROLES_SQL: &str = r"
CREATE TABLE roles (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PERMISSIONS_SQL: &str = r"
CREATE TABLE permissions (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ROLE_PERMISSIONS_SQL: &str = r"
CREATE TABLE role_permissions (
    role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
    permission_id UUID NOT NULL REFERENCES permissions(id) ON DELETE CASCADE,
    PRIMARY KEY (role_id, permission_id)
);
";

const USER_ROLES_SQL: &str = r"
CREATE TABLE user_roles (
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
    PRIMARY KEY (user_id, role_id)
);
";

const INCOMES_SQL: &str = r"
CREATE TABLE incomes (
    id UUID PRIMARY KEY,
    kind TEXT NOT NULL CHECK (kind IN ('payment', 'invoice', 'deposit', 'ad_hoc')),
    amount NUMERIC(19, 4) NOT NULL CHECK (amount >= 0),
    date TIMESTAMPTZ NOT NULL DEFAULT now(),
    customer TEXT,
    invoice_number TEXT,
    notes TEXT,
    status TEXT NOT NULL DEFAULT 'paid' CHECK (status IN ('pending', 'paid', 'refunded')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX idx_incomes_date ON incomes(date);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    date TIMESTAMPTZ NOT NULL DEFAULT now(),
    category TEXT NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount >= 0),
    description TEXT,
    vendor TEXT,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX idx_expenses_date ON expenses(date);
CREATE INDEX idx_expenses_category ON expenses(category);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    invoice_number TEXT NOT NULL UNIQUE,
    customer_name TEXT NOT NULL,
    customer_email TEXT,
    items JSONB NOT NULL DEFAULT '[]',
    subtotal NUMERIC(19, 4) NOT NULL DEFAULT 0,
    tax_percent NUMERIC(19, 4) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    discount NUMERIC(19, 4) NOT NULL DEFAULT 0,
    total NUMERIC(19, 4) NOT NULL DEFAULT 0,
    due_date TIMESTAMPTZ,
    status TEXT NOT NULL DEFAULT 'Pending' CHECK (status IN ('Pending', 'Paid', 'Overdue')),
    sent_at TIMESTAMPTZ,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX idx_invoices_status_due ON invoices(status, due_date);
";

const CAMPAIGNS_SQL: &str = r#"
CREATE TABLE campaigns (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    platform TEXT NOT NULL,
    start TIMESTAMPTZ,
    "end" TIMESTAMPTZ,
    budget NUMERIC(19, 4) NOT NULL DEFAULT 0,
    leads BIGINT NOT NULL DEFAULT 0,
    conversions BIGINT NOT NULL DEFAULT 0,
    revenue NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX idx_campaigns_platform ON campaigns(platform);
"#;
