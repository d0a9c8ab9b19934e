//! Dashboard metrics routes.
//!
//! Both endpoints require the `reports:read` permission. Ranges with no
//! records still return well-formed zero-filled payloads.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Deserialize;

use crate::{
    ApiError, AppState,
    middleware::{CurrentUser, require_permission},
};
use ledgerly_core::metrics::MetricsService;
use ledgerly_db::{ExpenseRepository, IncomeRepository};

/// Query parameters for the yearly metrics endpoint.
#[derive(Debug, Deserialize)]
pub struct YearlyQuery {
    /// Year to aggregate; defaults to the current year.
    pub year: Option<i32>,
}

/// Query parameters for the monthly metrics endpoint.
#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// Year to aggregate; defaults to the current year.
    pub year: Option<i32>,
    /// Month (1-12) to aggregate; defaults to the current month.
    pub month: Option<u32>,
}

/// Start of the year and start of the next year, as UTC instants.
fn year_range(year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
    let start = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ApiError::validation(format!("Invalid year: {year}")))?;
    let end = Utc
        .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| ApiError::validation(format!("Invalid year: {year}")))?;
    Ok((start, end))
}

/// Start of the month and start of the next month, as UTC instants.
fn month_range(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
    let invalid = || ApiError::validation(format!("Invalid month: {year}-{month}"));
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(invalid)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or_else(invalid)?;
    Ok((start, end))
}

async fn yearly_metrics(
    State(state): State<AppState>,
    CurrentUser(access): CurrentUser,
    Query(query): Query<YearlyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_permission(&access, "reports:read")?;

    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let (start, end) = year_range(year)?;

    let incomes = IncomeRepository::new(state.db.clone())
        .dated_amounts_in(Some(start), Some(end))
        .await?;
    let expenses = ExpenseRepository::new(state.db.clone())
        .categorized_amounts_in(Some(start), Some(end))
        .await?;

    Ok(Json(MetricsService::yearly_metrics(year, &incomes, &expenses)))
}

async fn monthly_metrics(
    State(state): State<AppState>,
    CurrentUser(access): CurrentUser,
    Query(query): Query<MonthlyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_permission(&access, "reports:read")?;

    let now = Utc::now();
    let year = query.year.unwrap_or_else(|| now.year());
    let month = query.month.unwrap_or_else(|| now.month());
    let (start, end) = month_range(year, month)?;

    let incomes = IncomeRepository::new(state.db.clone())
        .dated_amounts_in(Some(start), Some(end))
        .await?;
    let expenses = ExpenseRepository::new(state.db.clone())
        .categorized_amounts_in(Some(start), Some(end))
        .await?;

    Ok(Json(MetricsService::monthly_metrics(
        year, month, &incomes, &expenses,
    )))
}

/// Creates the metrics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/metrics/yearly", get(yearly_metrics))
        .route("/metrics/monthly", get(monthly_metrics))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_spans_the_full_year() {
        let (start, end) = year_range(2025).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_month_range_rolls_over_december() {
        let (start, end) = month_range(2025, 12).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_month_out_of_range_rejected() {
        assert!(month_range(2025, 0).is_err());
        assert!(month_range(2025, 13).is_err());
        assert!(month_range(2025, 3).is_ok());
    }
}
