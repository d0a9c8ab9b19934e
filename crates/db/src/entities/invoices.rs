//! `SeaORM` Entity for the invoices table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-facing business key, globally unique.
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    /// Ordered line items, stored as a JSON array.
    pub items: Json,
    pub subtotal: Decimal,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub due_date: Option<DateTimeWithTimeZone>,
    /// `Pending`, `Paid`, or `Overdue`.
    pub status: String,
    pub sent_at: Option<DateTimeWithTimeZone>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
