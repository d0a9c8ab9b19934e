//! Expense repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::expenses;
use ledgerly_core::metrics::{CategorizedAmount, DatedAmount};
use ledgerly_core::statement::StatementRow;

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense record not found.
    #[error("Expense not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an expense record.
#[derive(Debug, Clone)]
pub struct CreateExpense {
    /// Transaction date; defaults to now when absent.
    pub date: Option<DateTime<Utc>>,
    /// Required category label.
    pub category: String,
    /// Non-negative amount.
    pub amount: Decimal,
    /// What the expense was for.
    pub description: Option<String>,
    /// Vendor name.
    pub vendor: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Partial update for an expense record; absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpense {
    /// New date, if changing.
    pub date: Option<DateTime<Utc>>,
    /// New category, if changing.
    pub category: Option<String>,
    /// New amount, if changing.
    pub amount: Option<Decimal>,
    /// New description, if changing.
    pub description: Option<String>,
    /// New vendor, if changing.
    pub vendor: Option<String>,
    /// New notes, if changing.
    pub notes: Option<String>,
}

/// Expense repository for CRUD and aggregation fetches.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all expense records, newest first.
    pub async fn list(&self) -> Result<Vec<expenses::Model>, ExpenseError> {
        Ok(expenses::Entity::find()
            .order_by_desc(expenses::Column::Date)
            .all(&self.db)
            .await?)
    }

    /// Finds an expense record by id.
    pub async fn find(&self, id: Uuid) -> Result<expenses::Model, ExpenseError> {
        expenses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(id))
    }

    /// Creates an expense record.
    pub async fn create(&self, input: CreateExpense) -> Result<expenses::Model, ExpenseError> {
        let now = Utc::now();
        let model = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(input.date.unwrap_or(now).into()),
            category: Set(input.category),
            amount: Set(input.amount),
            description: Set(input.description),
            vendor: Set(input.vendor),
            notes: Set(input.notes),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Merges the update onto an existing record.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateExpense,
    ) -> Result<expenses::Model, ExpenseError> {
        let existing = self.find(id).await?;
        let mut model: expenses::ActiveModel = existing.into();

        if let Some(date) = input.date {
            model.date = Set(date.into());
        }
        if let Some(category) = input.category {
            model.category = Set(category);
        }
        if let Some(amount) = input.amount {
            model.amount = Set(amount);
        }
        if let Some(description) = input.description {
            model.description = Set(Some(description));
        }
        if let Some(vendor) = input.vendor {
            model.vendor = Set(Some(vendor));
        }
        if let Some(notes) = input.notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Hard-deletes an expense record.
    pub async fn delete(&self, id: Uuid) -> Result<(), ExpenseError> {
        let result = expenses::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ExpenseError::NotFound(id));
        }
        Ok(())
    }

    /// Fetches `(date, amount)` pairs for every expense record.
    pub async fn dated_amounts(&self) -> Result<Vec<DatedAmount>, ExpenseError> {
        let rows: Vec<(DateTime<Utc>, Decimal)> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Date)
            .column(expenses::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(date, amount)| DatedAmount { date, amount })
            .collect())
    }

    /// Fetches `(date, amount, category)` triples within an inclusive range,
    /// for yearly/monthly metrics and breakdowns.
    pub async fn categorized_amounts_in(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<CategorizedAmount>, ExpenseError> {
        let mut query = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Date)
            .column(expenses::Column::Amount)
            .column(expenses::Column::Category);
        if let Some(from) = from {
            query = query.filter(expenses::Column::Date.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(expenses::Column::Date.lte(to));
        }

        let rows: Vec<(DateTime<Utc>, Decimal, String)> =
            query.into_tuple().all(&self.db).await?;
        Ok(rows
            .into_iter()
            .map(|(date, amount, category)| CategorizedAmount {
                date,
                amount,
                category,
            })
            .collect())
    }

    /// Fetches statement rows within an inclusive range, newest first.
    pub async fn statement_rows(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<StatementRow>, ExpenseError> {
        let mut query = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Date)
            .column(expenses::Column::Amount)
            .order_by_desc(expenses::Column::Date);
        if let Some(from) = from {
            query = query.filter(expenses::Column::Date.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(expenses::Column::Date.lte(to));
        }

        let rows: Vec<(DateTime<Utc>, Decimal)> = query.into_tuple().all(&self.db).await?;
        Ok(rows
            .into_iter()
            .map(|(date, amount)| StatementRow { date, amount })
            .collect())
    }
}
