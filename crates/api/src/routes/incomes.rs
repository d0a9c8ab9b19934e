//! Income routes: CRUD plus the monthly summary series.

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
    IncomeRepository,
    repositories::income::{CreateIncome, UpdateIncome},
};

const INCOME_KINDS: [&str; 4] = ["payment", "invoice", "deposit", "ad_hoc"];
const INCOME_STATUSES: [&str; 3] = ["pending", "paid", "refunded"];

/// Request body for creating an income record.
#[derive(Debug, Deserialize)]
pub struct CreateIncomeRequest {
    /// Income kind; defaults to `payment`.
    pub kind: Option<String>,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Transaction date; defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// Customer name.
    pub customer: Option<String>,
    /// Related invoice number.
    pub invoice_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// `pending`, `paid`, or `refunded`; defaults to `paid`.
    pub status: Option<String>,
}

/// Request body for updating an income record.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateIncomeRequest {
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

fn validate_amount(amount: Decimal) -> Result<(), ApiError> {
    if amount < Decimal::ZERO {
        return Err(ApiError::validation("Amount must be non-negative"));
    }
    Ok(())
}

fn validate_kind(kind: &str) -> Result<(), ApiError> {
    if INCOME_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(ApiError::validation(format!("Unknown income type: {kind}")))
    }
}

fn validate_status(status: &str) -> Result<(), ApiError> {
    if INCOME_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ApiError::validation(format!("Unknown income status: {status}")))
    }
}

async fn list_incomes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = IncomeRepository::new(state.db.clone());
    Ok(Json(repo.list().await?))
}

async fn create_income(
    State(state): State<AppState>,
    Json(body): Json<CreateIncomeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_amount(body.amount)?;
    let kind = body.kind.unwrap_or_else(|| "payment".to_string());
    validate_kind(&kind)?;
    if let Some(status) = &body.status {
        validate_status(status)?;
    }

    let repo = IncomeRepository::new(state.db.clone());
    let created = repo
        .create(CreateIncome {
            kind,
            amount: body.amount,
            date: body.date,
            customer: body.customer,
            invoice_number: body.invoice_number,
            notes: body.notes,
            status: body.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_income(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateIncomeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(amount) = body.amount {
        validate_amount(amount)?;
    }
    if let Some(kind) = &body.kind {
        validate_kind(kind)?;
    }
    if let Some(status) = &body.status {
        validate_status(status)?;
    }

    let repo = IncomeRepository::new(state.db.clone());
    let updated = repo
        .update(
            id,
            UpdateIncome {
                kind: body.kind,
                amount: body.amount,
                date: body.date,
                customer: body.customer,
                invoice_number: body.invoice_number,
                notes: body.notes,
                status: body.status,
            },
        )
        .await?;
    Ok(Json(updated))
}

async fn delete_income(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = IncomeRepository::new(state.db.clone());
    repo.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// `YYYY-MM` keyed totals and counts for the income chart.
async fn monthly_summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = IncomeRepository::new(state.db.clone());
    let records = repo.dated_amounts().await?;
    Ok(Json(MetricsService::monthly_summary(&records)))
}

/// Creates the income routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/incomes", get(list_incomes))
        .route("/incomes", post(create_income))
        .route("/incomes/monthly-summary", get(monthly_summary))
        .route("/incomes/{id}", put(update_income))
        .route("/incomes/{id}", delete(delete_income))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_negative_amount_rejected() {
        assert!(validate_amount(dec!(-1)).is_err());
        assert!(validate_amount(Decimal::ZERO).is_ok());
        assert!(validate_amount(dec!(100.50)).is_ok());
    }

    #[rstest::rstest]
    #[case("payment", true)]
    #[case("invoice", true)]
    #[case("deposit", true)]
    #[case("ad_hoc", true)]
    #[case("salary", false)]
    #[case("", false)]
    fn test_kind_validation(#[case] kind: &str, #[case] valid: bool) {
        assert_eq!(validate_kind(kind).is_ok(), valid);
    }

    #[rstest::rstest]
    #[case("pending", true)]
    #[case("paid", true)]
    #[case("refunded", true)]
    #[case("cancelled", false)]
    fn test_status_validation(#[case] status: &str, #[case] valid: bool) {
        assert_eq!(validate_status(status).is_ok(), valid);
    }
}
