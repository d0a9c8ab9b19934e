//! Request error conversion and the JSON error envelope.
//!
//! Handlers return `ApiError`; every error becomes `{ "error": <message> }`
//! with the matching status code. Opaque errors (database, renderer, mail)
//! are logged with detail server-side while clients see a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use ledgerly_core::statement::StatementError;
use ledgerly_db::repositories::{
    campaign::CampaignError, expense::ExpenseError, income::IncomeError, invoice::InvoiceError,
    rbac::RbacError,
};
use ledgerly_shared::{AppError, EmailError, PdfError};

/// Error returned by API handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Shorthand for a 400 validation failure.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// Shorthand for a 404.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// Shorthand for a 403.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(AppError::Forbidden(message.into()))
    }

    /// Shorthand for a 401.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_opaque() {
            error!(error = %self.0, code = self.0.error_code(), "request failed");
            match self.0 {
                AppError::Dependency(_) => "External service error".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<IncomeError> for ApiError {
    fn from(err: IncomeError) -> Self {
        match err {
            IncomeError::NotFound(_) => Self(AppError::NotFound("Income not found".into())),
            IncomeError::Database(e) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::NotFound(_) => Self(AppError::NotFound("Expense not found".into())),
            ExpenseError::Database(e) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl From<CampaignError> for ApiError {
    fn from(err: CampaignError) -> Self {
        match err {
            CampaignError::NotFound(_) => Self(AppError::NotFound("Campaign not found".into())),
            CampaignError::Database(e) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl From<InvoiceError> for ApiError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::NotFound(_) => Self(AppError::NotFound("Invoice not found".into())),
            InvoiceError::DuplicateNumber(number) => {
                Self(AppError::Conflict(format!("Duplicate invoice number: {number}")))
            }
            InvoiceError::CorruptItems(id, e) => {
                Self(AppError::Internal(format!("corrupt line items for {id}: {e}")))
            }
            InvoiceError::Database(e) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl From<RbacError> for ApiError {
    fn from(err: RbacError) -> Self {
        match err {
            RbacError::UserNotFound(_) => Self(AppError::NotFound("User not found".into())),
            RbacError::DuplicateRole(name) => {
                Self(AppError::Conflict(format!("Role already exists: {name}")))
            }
            RbacError::DuplicateEmail(_) => {
                Self(AppError::Conflict("Email already registered".into()))
            }
            RbacError::Database(e) => Self(AppError::Database(e.to_string())),
        }
    }
}

impl From<StatementError> for ApiError {
    fn from(err: StatementError) -> Self {
        match err {
            StatementError::UnknownKind(_) | StatementError::UnknownFormat(_) => {
                Self(AppError::Validation(err.to_string()))
            }
            StatementError::Workbook(_) | StatementError::AmountOutOfRange(_) => {
                Self(AppError::Internal(err.to_string()))
            }
        }
    }
}

impl From<PdfError> for ApiError {
    fn from(err: PdfError) -> Self {
        Self(AppError::Dependency(err.to_string()))
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        Self(AppError::Dependency(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_collision_maps_to_conflict() {
        let err: ApiError = InvoiceError::DuplicateNumber("INV-1-1000".into()).into();
        assert_eq!(err.0.status_code(), 409);
    }

    #[test]
    fn test_duplicate_email_maps_to_conflict() {
        let err: ApiError = RbacError::DuplicateEmail("taken@example.com".into()).into();
        assert_eq!(err.0.status_code(), 409);
        assert_eq!(err.0.to_string(), "Conflict: Email already registered");
    }

    #[test]
    fn test_unknown_export_format_maps_to_validation() {
        let err: ApiError = StatementError::UnknownFormat("csv".into()).into();
        assert_eq!(err.0.status_code(), 400);
    }

    #[test]
    fn test_renderer_failure_is_opaque() {
        let err: ApiError = PdfError::Request("connection refused".into()).into();
        assert_eq!(err.0.status_code(), 500);
        assert!(err.0.is_opaque());
    }
}
