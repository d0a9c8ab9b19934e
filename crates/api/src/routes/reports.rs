//! Statement export route.
//!
//! Streams a filtered, totaled statement as an XLSX workbook or as a PDF
//! rendered from HTML by the external render service. Requires the
//! `reports:read` permission.

use axum::{
    Router,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    ApiError, AppState,
    middleware::{CurrentUser, require_permission},
};
use ledgerly_core::statement::{
    Statement, StatementFormat, StatementKind, build_statement_workbook, render_statement_html,
};
use ledgerly_db::{ExpenseRepository, IncomeRepository};

/// Query parameters for the export endpoint.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// `income` or `expense`; defaults to `income`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `pdf` or `excel`; defaults to `pdf`.
    pub format: Option<String>,
    /// Inclusive lower bound (`YYYY-MM-DD`).
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound (`YYYY-MM-DD`).
    pub to: Option<NaiveDate>,
}

async fn export_statement(
    State(state): State<AppState>,
    CurrentUser(access): CurrentUser,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require_permission(&access, "reports:read")?;

    let kind: StatementKind = query.kind.as_deref().unwrap_or("income").parse()?;
    let format: StatementFormat = query.format.as_deref().unwrap_or("pdf").parse()?;

    // Bounds are day-start instants on both ends, matching the way date
    // strings coerce in the persistence queries.
    let from = query.from.map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc());
    let to = query.to.map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc());

    let rows = match kind {
        StatementKind::Income => {
            IncomeRepository::new(state.db.clone())
                .statement_rows(from, to)
                .await?
        }
        StatementKind::Expense => {
            ExpenseRepository::new(state.db.clone())
                .statement_rows(from, to)
                .await?
        }
    };

    let statement = Statement::new(kind, query.from, query.to, rows);
    let filename = statement.filename(format);

    let bytes = match format {
        StatementFormat::Excel => build_statement_workbook(&statement)?,
        StatementFormat::Pdf => {
            let html = render_statement_html(&statement);
            state.pdf_renderer.render(&html).await?.to_vec()
        }
    };

    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes))
}

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/export", get(export_statement))
}
