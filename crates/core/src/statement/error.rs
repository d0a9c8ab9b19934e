//! Statement export errors.

use thiserror::Error;

/// Errors from statement assembly and rendering.
#[derive(Debug, Error)]
pub enum StatementError {
    /// Unknown statement type in the request.
    #[error("Unknown statement type: {0}")]
    UnknownKind(String),

    /// Unknown export format in the request.
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    /// Workbook construction failed.
    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// An amount could not be represented in the workbook.
    #[error("Amount out of range for workbook cell: {0}")]
    AmountOutOfRange(String),
}
