//! Invoice routes.
//!
//! CRUD with server-computed totals, the send flow (render, email, then
//! record `sent_at`), the PDF download, explicit mark-paid, and the
//! on-demand overdue sweep.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{ApiError, AppState};
use ledgerly_core::invoice::{InvoiceStatus, LineItem};
use ledgerly_core::statement::render_invoice_html;
use ledgerly_db::{
    InvoiceRepository,
    repositories::invoice::{CreateInvoice, UpdateInvoice},
};

/// Request body for creating an invoice.
///
/// Any client-supplied `subtotal`/`tax_amount`/`total` fields are simply
/// not part of this type; totals are always computed server-side.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Explicit business key; generated when absent.
    pub invoice_number: Option<String>,
    /// Customer the invoice is billed to.
    pub customer_name: String,
    /// Optional customer email for the send flow.
    pub customer_email: Option<String>,
    /// Ordered line items.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Tax percentage; defaults to zero.
    #[serde(default)]
    pub tax_percent: Decimal,
    /// Flat discount; defaults to zero.
    #[serde(default)]
    pub discount: Decimal,
    /// Payment due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Notes printed on the invoice.
    pub notes: Option<String>,
}

/// Request body for updating an invoice; absent fields keep their value.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateInvoiceRequest {
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
    pub status: Option<String>,
    /// New notes, if changing.
    pub notes: Option<String>,
}

fn validate_items(items: &[LineItem]) -> Result<(), ApiError> {
    for item in items {
        if item.quantity < 1 {
            return Err(ApiError::validation("Line item quantity must be at least 1"));
        }
        if item.price < Decimal::ZERO {
            return Err(ApiError::validation("Line item price must be non-negative"));
        }
    }
    Ok(())
}

fn validate_money(tax_percent: Decimal, discount: Decimal) -> Result<(), ApiError> {
    if tax_percent < Decimal::ZERO {
        return Err(ApiError::validation("Tax percent must be non-negative"));
    }
    if discount < Decimal::ZERO {
        return Err(ApiError::validation("Discount must be non-negative"));
    }
    Ok(())
}

async fn list_invoices(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new(state.db.clone());
    Ok(Json(repo.list().await?))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new(state.db.clone());
    Ok(Json(repo.find(id).await?))
}

async fn create_invoice(
    State(state): State<AppState>,
    Json(body): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.customer_name.trim().is_empty() {
        return Err(ApiError::validation("Customer name is required"));
    }
    validate_items(&body.items)?;
    validate_money(body.tax_percent, body.discount)?;

    let repo = InvoiceRepository::new(state.db.clone());
    let created = repo
        .create(CreateInvoice {
            invoice_number: body.invoice_number,
            customer_name: body.customer_name,
            customer_email: body.customer_email,
            items: body.items,
            tax_percent: body.tax_percent,
            discount: body.discount,
            due_date: body.due_date,
            notes: body.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateInvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(items) = &body.items {
        validate_items(items)?;
    }
    validate_money(
        body.tax_percent.unwrap_or(Decimal::ZERO),
        body.discount.unwrap_or(Decimal::ZERO),
    )?;
    let status = body
        .status
        .as_deref()
        .map(str::parse::<InvoiceStatus>)
        .transpose()
        .map_err(ApiError::validation)?;

    let repo = InvoiceRepository::new(state.db.clone());
    let updated = repo
        .update(
            id,
            UpdateInvoice {
                customer_name: body.customer_name,
                customer_email: body.customer_email,
                items: body.items,
                tax_percent: body.tax_percent,
                discount: body.discount,
                due_date: body.due_date,
                status,
                notes: body.notes,
            },
        )
        .await?;
    Ok(Json(updated))
}

async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new(state.db.clone());
    repo.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// Renders the invoice, emails it as a PDF attachment, then records
/// `sent_at`.
///
/// The record is only mutated after delivery succeeded, so a crash between
/// the two leaves an unsent-looking invoice that will be re-sent on retry
/// (at-least-once delivery).
async fn send_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new(state.db.clone());
    let invoice = repo.find(id).await?;

    let Some(customer_email) = invoice.customer_email.clone() else {
        return Err(ApiError::validation("Invoice has no customer email"));
    };

    let document = InvoiceRepository::document(&invoice)?;
    let html = render_invoice_html(&document);
    let pdf = state.pdf_renderer.render(&html).await?;

    state
        .email_service
        .send_invoice_email(&customer_email, &invoice.invoice_number, pdf.to_vec())
        .await
        .map_err(|e| {
            warn!(invoice = %invoice.invoice_number, error = %e, "invoice email failed");
            ApiError::from(e)
        })?;

    let sent_at = Utc::now();
    repo.record_sent(id, sent_at).await?;
    info!(invoice = %invoice.invoice_number, to = %customer_email, "invoice sent");

    Ok(Json(json!({ "success": true, "sentAt": sent_at })))
}

/// Streams the rendered invoice PDF.
async fn download_invoice_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new(state.db.clone());
    let invoice = repo.find(id).await?;

    let document = InvoiceRepository::document(&invoice)?;
    let html = render_invoice_html(&document);
    let pdf = state.pdf_renderer.render(&html).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.pdf\"", invoice.invoice_number),
        ),
    ];
    Ok((headers, pdf))
}

async fn mark_paid(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new(state.db.clone());
    Ok(Json(repo.mark_paid(id).await?))
}

/// On-demand overdue sweep; idempotent and safe to race the scheduled one.
async fn check_overdue(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new(state.db.clone());
    let updated = repo.mark_overdue().await?;
    Ok(Json(json!({ "updated": updated })))
}

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices", post(create_invoice))
        .route("/invoices/check-overdue", get(check_overdue))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}", put(update_invoice))
        .route("/invoices/{id}", delete(delete_invoice))
        .route("/invoices/{id}/send", post(send_invoice))
        .route("/invoices/{id}/pdf", get(download_invoice_pdf))
        .route("/invoices/{id}/mark-paid", post(mark_paid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: u32, price: Decimal) -> LineItem {
        LineItem {
            description: "Design".to_string(),
            quantity,
            price,
        }
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(validate_items(&[item(0, dec!(10))]).is_err());
        assert!(validate_items(&[item(1, dec!(10))]).is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(validate_items(&[item(2, dec!(-5))]).is_err());
        assert!(validate_items(&[item(2, Decimal::ZERO)]).is_ok());
    }

    #[test]
    fn test_negative_tax_or_discount_rejected() {
        assert!(validate_money(dec!(-1), Decimal::ZERO).is_err());
        assert!(validate_money(Decimal::ZERO, dec!(-1)).is_err());
        assert!(validate_money(dec!(10), dec!(20)).is_ok());
    }
}
