//! Income repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::incomes;
use ledgerly_core::metrics::DatedAmount;
use ledgerly_core::statement::StatementRow;

/// Error types for income operations.
#[derive(Debug, thiserror::Error)]
pub enum IncomeError {
    /// Income record not found.
    #[error("Income not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an income record.
#[derive(Debug, Clone)]
pub struct CreateIncome {
    /// Income kind: `payment`, `invoice`, `deposit`, or `ad_hoc`.
    pub kind: String,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Transaction date; defaults to now when absent.
    pub date: Option<DateTime<Utc>>,
    /// Optional customer name.
    pub customer: Option<String>,
    /// Optional related invoice number.
    pub invoice_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// `pending`, `paid`, or `refunded`; defaults to `paid`.
    pub status: Option<String>,
}

/// Partial update for an income record; absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct UpdateIncome {
    /// New kind, if changing.
    pub kind: Option<String>,
    /// New amount, if changing.
    pub amount: Option<Decimal>,
    /// New date, if changing.
    pub date: Option<DateTime<Utc>>,
    /// New customer, if changing.
    pub customer: Option<String>,
    /// New invoice number, if changing.
    pub invoice_number: Option<String>,
    /// New notes, if changing.
    pub notes: Option<String>,
    /// New status, if changing.
    pub status: Option<String>,
}

/// Income repository for CRUD and aggregation fetches.
#[derive(Debug, Clone)]
pub struct IncomeRepository {
    db: DatabaseConnection,
}

impl IncomeRepository {
    /// Creates a new income repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all income records, newest first.
    pub async fn list(&self) -> Result<Vec<incomes::Model>, IncomeError> {
        Ok(incomes::Entity::find()
            .order_by_desc(incomes::Column::Date)
            .all(&self.db)
            .await?)
    }

    /// Finds an income record by id.
    pub async fn find(&self, id: Uuid) -> Result<incomes::Model, IncomeError> {
        incomes::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(IncomeError::NotFound(id))
    }

    /// Creates an income record.
    pub async fn create(&self, input: CreateIncome) -> Result<incomes::Model, IncomeError> {
        let now = Utc::now();
        let model = incomes::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(input.kind),
            amount: Set(input.amount),
            date: Set(input.date.unwrap_or(now).into()),
            customer: Set(input.customer),
            invoice_number: Set(input.invoice_number),
            notes: Set(input.notes),
            status: Set(input.status.unwrap_or_else(|| "paid".to_string())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Merges the update onto an existing record.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateIncome,
    ) -> Result<incomes::Model, IncomeError> {
        let existing = self.find(id).await?;
        let mut model: incomes::ActiveModel = existing.into();

        if let Some(kind) = input.kind {
            model.kind = Set(kind);
        }
        if let Some(amount) = input.amount {
            model.amount = Set(amount);
        }
        if let Some(date) = input.date {
            model.date = Set(date.into());
        }
        if let Some(customer) = input.customer {
            model.customer = Set(Some(customer));
        }
        if let Some(invoice_number) = input.invoice_number {
            model.invoice_number = Set(Some(invoice_number));
        }
        if let Some(notes) = input.notes {
            model.notes = Set(Some(notes));
        }
        if let Some(status) = input.status {
            model.status = Set(status);
        }
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Hard-deletes an income record.
    pub async fn delete(&self, id: Uuid) -> Result<(), IncomeError> {
        let result = incomes::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(IncomeError::NotFound(id));
        }
        Ok(())
    }

    /// Fetches `(date, amount)` pairs for every income record, for the
    /// monthly summary.
    pub async fn dated_amounts(&self) -> Result<Vec<DatedAmount>, IncomeError> {
        self.dated_amounts_in(None, None).await
    }

    /// Fetches `(date, amount)` pairs within an inclusive range.
    pub async fn dated_amounts_in(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<DatedAmount>, IncomeError> {
        let mut query = incomes::Entity::find()
            .select_only()
            .column(incomes::Column::Date)
            .column(incomes::Column::Amount);
        if let Some(from) = from {
            query = query.filter(incomes::Column::Date.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(incomes::Column::Date.lte(to));
        }

        let rows: Vec<(DateTime<Utc>, Decimal)> = query.into_tuple().all(&self.db).await?;
        Ok(rows
            .into_iter()
            .map(|(date, amount)| DatedAmount { date, amount })
            .collect())
    }

    /// Fetches statement rows within an inclusive range, newest first.
    pub async fn statement_rows(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<StatementRow>, IncomeError> {
        let mut query = incomes::Entity::find()
            .select_only()
            .column(incomes::Column::Date)
            .column(incomes::Column::Amount)
            .order_by_desc(incomes::Column::Date);
        if let Some(from) = from {
            query = query.filter(incomes::Column::Date.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(incomes::Column::Date.lte(to));
        }

        let rows: Vec<(DateTime<Utc>, Decimal)> = query.into_tuple().all(&self.db).await?;
        Ok(rows
            .into_iter()
            .map(|(date, amount)| StatementRow { date, amount })
            .collect())
    }
}
