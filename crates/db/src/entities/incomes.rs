//! `SeaORM` Entity for the incomes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Income kind: `payment`, `invoice`, `deposit`, or `ad_hoc`.
    pub kind: String,
    pub amount: Decimal,
    pub date: DateTimeWithTimeZone,
    pub customer: Option<String>,
    pub invoice_number: Option<String>,
    pub notes: Option<String>,
    /// `pending`, `paid`, or `refunded`.
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
