//! Invoice repository.
//!
//! Owns the persistence half of the invoice lifecycle: bounded-retry insert
//! on duplicate invoice numbers, the idempotent overdue sweep, and the
//! explicit paid/sent transitions.

use std::future::Future;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::invoices;
use ledgerly_core::invoice::{
    InvoiceDocument, InvoiceStatus, LineItem, compute_totals, generate_invoice_number,
};

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Invoice number already exists after the bounded retry.
    #[error("Duplicate invoice number: {0}")]
    DuplicateNumber(String),

    /// Stored line items could not be decoded.
    #[error("Corrupt line items for invoice {0}: {1}")]
    CorruptItems(Uuid, serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an invoice. Totals are always computed server-side;
/// any client-submitted totals have been discarded before this point.
#[derive(Debug, Clone)]
pub struct CreateInvoice {
    /// Explicit business key; generated when absent.
    pub invoice_number: Option<String>,
    /// Customer the invoice is billed to.
    pub customer_name: String,
    /// Optional customer email for the send flow.
    pub customer_email: Option<String>,
    /// Ordered line items.
    pub items: Vec<LineItem>,
    /// Tax percentage.
    pub tax_percent: Decimal,
    /// Flat discount.
    pub discount: Decimal,
    /// Payment due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Notes printed on the invoice.
    pub notes: Option<String>,
}

/// Partial update for an invoice; absent fields keep their value. Totals
/// are recomputed from the merged state.
#[derive(Debug, Clone, Default)]
pub struct UpdateInvoice {
    /// New customer name, if changing.
    pub customer_name: Option<String>,
    /// New customer email, if changing.
    pub customer_email: Option<String>,
    /// Replacement line items, if changing.
    pub items: Option<Vec<LineItem>>,
    /// New tax percentage, if changing.
    pub tax_percent: Option<Decimal>,
    /// New discount, if changing.
    pub discount: Option<Decimal>,
    /// New due date, if changing.
    pub due_date: Option<DateTime<Utc>>,
    /// New status, if changing.
    pub status: Option<InvoiceStatus>,
    /// New notes, if changing.
    pub notes: Option<String>,
}

/// Invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all invoices, newest first.
    pub async fn list(&self) -> Result<Vec<invoices::Model>, InvoiceError> {
        Ok(invoices::Entity::find()
            .order_by_desc(invoices::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Finds an invoice by id.
    pub async fn find(&self, id: Uuid) -> Result<invoices::Model, InvoiceError> {
        invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(id))
    }

    /// Creates an invoice with server-computed totals.
    ///
    /// When the generated or supplied invoice number collides with an
    /// existing one, a fresh number is generated and the insert retried
    /// exactly once; a second collision propagates as `DuplicateNumber`.
    pub async fn create(&self, input: CreateInvoice) -> Result<invoices::Model, InvoiceError> {
        self.create_with_generator(input, generate_invoice_number)
            .await
    }

    /// Like [`create`](Self::create), with the invoice number source
    /// supplied by the caller. The generator is consulted once for the
    /// initial number (when the input carries none) and once more if
    /// that number collides.
    pub async fn create_with_generator<G>(
        &self,
        input: CreateInvoice,
        mut generate: G,
    ) -> Result<invoices::Model, InvoiceError>
    where
        G: FnMut() -> String,
    {
        let number = input.invoice_number.clone().unwrap_or_else(&mut generate);
        insert_with_bounded_retry(number, generate, |n| self.try_insert(&input, n)).await
    }

    async fn try_insert(
        &self,
        input: &CreateInvoice,
        invoice_number: String,
    ) -> Result<invoices::Model, InsertError> {
        let totals = compute_totals(&input.items, input.tax_percent, input.discount);
        let items = serde_json::to_value(&input.items)
            .map_err(|e| InsertError::Db(DbErr::Custom(format!("line item encoding failed: {e}"))))?;
        let now = Utc::now();

        let model = invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_number: Set(invoice_number),
            customer_name: Set(input.customer_name.clone()),
            customer_email: Set(input.customer_email.clone()),
            items: Set(items),
            subtotal: Set(totals.subtotal),
            tax_percent: Set(totals.tax_percent),
            tax_amount: Set(totals.tax_amount),
            discount: Set(totals.discount),
            total: Set(totals.total),
            due_date: Set(input.due_date.map(Into::into)),
            status: Set(InvoiceStatus::Pending.as_str().to_string()),
            sent_at: Set(None),
            notes: Set(Some(
                input
                    .notes
                    .clone()
                    .unwrap_or_else(|| "Thank you for your business!".to_string()),
            )),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        model.insert(&self.db).await.map_err(InsertError::from)
    }

    /// Merges the update onto an existing invoice and recomputes totals
    /// from the merged items, tax, and discount.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateInvoice,
    ) -> Result<invoices::Model, InvoiceError> {
        let existing = self.find(id).await?;

        let items = match input.items {
            Some(items) => items,
            None => decode_items(&existing)?,
        };
        let tax_percent = input.tax_percent.unwrap_or(existing.tax_percent);
        let discount = input.discount.unwrap_or(existing.discount);
        let totals = compute_totals(&items, tax_percent, discount);

        let mut model: invoices::ActiveModel = existing.into();
        if let Some(customer_name) = input.customer_name {
            model.customer_name = Set(customer_name);
        }
        if let Some(customer_email) = input.customer_email {
            model.customer_email = Set(Some(customer_email));
        }
        if let Some(due_date) = input.due_date {
            model.due_date = Set(Some(due_date.into()));
        }
        if let Some(status) = input.status {
            model.status = Set(status.as_str().to_string());
        }
        if let Some(notes) = input.notes {
            model.notes = Set(Some(notes));
        }
        model.items = Set(serde_json::to_value(&items)
            .map_err(|e| DbErr::Custom(format!("line item encoding failed: {e}")))?);
        model.subtotal = Set(totals.subtotal);
        model.tax_percent = Set(totals.tax_percent);
        model.tax_amount = Set(totals.tax_amount);
        model.discount = Set(totals.discount);
        model.total = Set(totals.total);
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Hard-deletes an invoice.
    pub async fn delete(&self, id: Uuid) -> Result<(), InvoiceError> {
        let result = invoices::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(InvoiceError::NotFound(id));
        }
        Ok(())
    }

    /// Explicitly marks an invoice as paid. The overdue sweep never
    /// overrides this afterward.
    pub async fn mark_paid(&self, id: Uuid) -> Result<invoices::Model, InvoiceError> {
        let existing = self.find(id).await?;
        let mut model: invoices::ActiveModel = existing.into();
        model.status = Set(InvoiceStatus::Paid.as_str().to_string());
        model.updated_at = Set(Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Records a successful send: sets `sent_at`. Called only after mail
    /// delivery succeeded; the status is left untouched.
    pub async fn record_sent(
        &self,
        id: Uuid,
        sent_at: DateTime<Utc>,
    ) -> Result<invoices::Model, InvoiceError> {
        let existing = self.find(id).await?;
        let mut model: invoices::ActiveModel = existing.into();
        model.sent_at = Set(Some(sent_at.into()));
        model.updated_at = Set(Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Sweeps every invoice whose due date has passed and whose status is
    /// neither Paid nor Overdue to Overdue. Returns the update count.
    ///
    /// The status predicate makes this idempotent and safe to run
    /// concurrently with the scheduled sweep.
    pub async fn mark_overdue(&self) -> Result<u64, InvoiceError> {
        let now = Utc::now();
        let result = invoices::Entity::update_many()
            .col_expr(
                invoices::Column::Status,
                Expr::value(InvoiceStatus::Overdue.as_str()),
            )
            .col_expr(invoices::Column::UpdatedAt, Expr::value(now))
            .filter(invoices::Column::DueDate.lt(now))
            .filter(invoices::Column::Status.is_not_in([
                InvoiceStatus::Paid.as_str(),
                InvoiceStatus::Overdue.as_str(),
            ]))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            info!(updated = result.rows_affected, "marked invoices overdue");
        }
        Ok(result.rows_affected)
    }

    /// Converts a stored invoice into the renderer's document form.
    pub fn document(model: &invoices::Model) -> Result<InvoiceDocument, InvoiceError> {
        let items = decode_items(model)?;
        Ok(InvoiceDocument {
            invoice_number: model.invoice_number.clone(),
            customer_name: model.customer_name.clone(),
            customer_email: model.customer_email.clone(),
            items,
            subtotal: Some(model.subtotal),
            tax_percent: model.tax_percent,
            tax_amount: Some(model.tax_amount),
            discount: model.discount,
            total: Some(model.total),
            due_date: model.due_date.map(Into::into),
            notes: model.notes.clone(),
        })
    }
}

fn decode_items(model: &invoices::Model) -> Result<Vec<LineItem>, InvoiceError> {
    serde_json::from_value(model.items.clone())
        .map_err(|e| InvoiceError::CorruptItems(model.id, e))
}

/// Insert outcome with the unique-constraint case split out so the retry
/// policy can branch on it.
#[derive(Debug)]
enum InsertError {
    Duplicate,
    Db(DbErr),
}

impl From<DbErr> for InsertError {
    fn from(err: DbErr) -> Self {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            Self::Duplicate
        } else {
            Self::Db(err)
        }
    }
}

/// Runs `attempt` with `number`; on a duplicate, regenerates and retries
/// exactly once. A duplicate on the retry surfaces as `DuplicateNumber`,
/// any other failure propagates unchanged.
async fn insert_with_bounded_retry<T, G, F, Fut>(
    number: String,
    mut regenerate: G,
    attempt: F,
) -> Result<T, InvoiceError>
where
    G: FnMut() -> String,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, InsertError>>,
{
    match attempt(number.clone()).await {
        Ok(model) => Ok(model),
        Err(InsertError::Duplicate) => {
            let retry_number = regenerate();
            warn!(
                collided = %number,
                retry = %retry_number,
                "invoice number collision, retrying once"
            );
            match attempt(retry_number.clone()).await {
                Ok(model) => Ok(model),
                Err(InsertError::Duplicate) => Err(InvoiceError::DuplicateNumber(retry_number)),
                Err(InsertError::Db(e)) => Err(e.into()),
            }
        }
        Err(InsertError::Db(e)) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn colliding_attempt<'a>(
        attempts: &'a RefCell<Vec<String>>,
        collisions: usize,
    ) -> impl Fn(String) -> std::future::Ready<Result<String, InsertError>> + 'a {
        move |number: String| {
            attempts.borrow_mut().push(number.clone());
            let out = if attempts.borrow().len() <= collisions {
                Err(InsertError::Duplicate)
            } else {
                Ok(number)
            };
            std::future::ready(out)
        }
    }

    #[tokio::test]
    async fn test_insert_without_collision_runs_once() {
        let attempts = RefCell::new(Vec::new());
        let stored = insert_with_bounded_retry(
            "INV-1-1000".to_string(),
            || unreachable!("no collision, no regeneration"),
            colliding_attempt(&attempts, 0),
        )
        .await
        .unwrap();

        assert_eq!(stored, "INV-1-1000");
        assert_eq!(*attempts.borrow(), vec!["INV-1-1000"]);
    }

    #[tokio::test]
    async fn test_collision_regenerates_and_retries_once() {
        let attempts = RefCell::new(Vec::new());
        let stored = insert_with_bounded_retry(
            "INV-1-1000".to_string(),
            || "INV-2-2000".to_string(),
            colliding_attempt(&attempts, 1),
        )
        .await
        .unwrap();

        assert_eq!(stored, "INV-2-2000");
        assert_eq!(*attempts.borrow(), vec!["INV-1-1000", "INV-2-2000"]);
        assert_ne!(attempts.borrow()[0], attempts.borrow()[1]);
    }

    #[tokio::test]
    async fn test_second_collision_propagates_without_third_attempt() {
        let attempts = RefCell::new(Vec::new());
        let err = insert_with_bounded_retry(
            "INV-1-1000".to_string(),
            || "INV-2-2000".to_string(),
            colliding_attempt(&attempts, 2),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, InvoiceError::DuplicateNumber(n) if n == "INV-2-2000"));
        assert_eq!(attempts.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_non_collision_failure_is_not_retried() {
        let attempts = RefCell::new(Vec::new());
        let err = insert_with_bounded_retry(
            "INV-1-1000".to_string(),
            || unreachable!("database errors are not retried"),
            |number: String| {
                attempts.borrow_mut().push(number);
                std::future::ready(Err::<String, _>(InsertError::Db(DbErr::Custom(
                    "connection reset".to_string(),
                ))))
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, InvoiceError::Database(_)));
        assert_eq!(attempts.borrow().len(), 1);
    }
}
