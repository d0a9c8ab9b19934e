//! Expense routes: CRUD plus the monthly summary series.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ApiError, AppState};
use ledgerly_core::metrics::MetricsService;
use ledgerly_db::{
    ExpenseRepository,
    repositories::expense::{CreateExpense, UpdateExpense},
};

/// Request body for creating an expense record.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Transaction date; defaults to now.
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

/// Request body for updating an expense record.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateExpenseRequest {
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

fn validate_expense(category: &str, amount: Decimal) -> Result<(), ApiError> {
    if category.trim().is_empty() {
        return Err(ApiError::validation("Category is required"));
    }
    if amount < Decimal::ZERO {
        return Err(ApiError::validation("Amount must be non-negative"));
    }
    Ok(())
}

async fn list_expenses(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = ExpenseRepository::new(state.db.clone());
    Ok(Json(repo.list().await?))
}

async fn create_expense(
    State(state): State<AppState>,
    Json(body): Json<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_expense(&body.category, body.amount)?;

    let repo = ExpenseRepository::new(state.db.clone());
    let created = repo
        .create(CreateExpense {
            date: body.date,
            category: body.category,
            amount: body.amount,
            description: body.description,
            vendor: body.vendor,
            notes: body.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(category) = &body.category {
        if category.trim().is_empty() {
            return Err(ApiError::validation("Category is required"));
        }
    }
    if let Some(amount) = body.amount {
        if amount < Decimal::ZERO {
            return Err(ApiError::validation("Amount must be non-negative"));
        }
    }

    let repo = ExpenseRepository::new(state.db.clone());
    let updated = repo
        .update(
            id,
            UpdateExpense {
                date: body.date,
                category: body.category,
                amount: body.amount,
                description: body.description,
                vendor: body.vendor,
                notes: body.notes,
            },
        )
        .await?;
    Ok(Json(updated))
}

async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = ExpenseRepository::new(state.db.clone());
    repo.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// `YYYY-MM` keyed totals and counts for the expense chart.
async fn monthly_summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = ExpenseRepository::new(state.db.clone());
    let records = repo.dated_amounts().await?;
    Ok(Json(MetricsService::monthly_summary(&records)))
}

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses))
        .route("/expenses", post(create_expense))
        .route("/expenses/monthly-summary", get(monthly_summary))
        .route("/expenses/{id}", put(update_expense))
        .route("/expenses/{id}", delete(delete_expense))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_category_rejected() {
        assert!(validate_expense("", dec!(10)).is_err());
        assert!(validate_expense("   ", dec!(10)).is_err());
        assert!(validate_expense("Software", dec!(10)).is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(validate_expense("Software", dec!(-0.01)).is_err());
        assert!(validate_expense("Software", Decimal::ZERO).is_ok());
    }
}
