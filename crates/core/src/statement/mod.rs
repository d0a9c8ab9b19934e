//! Statement export engine.
//!
//! Assembles a filtered, totaled tabular statement from raw transaction
//! records and renders it as an XLSX workbook or as HTML destined for the
//! external PDF renderer.

pub mod error;
pub mod excel;
pub mod html;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::StatementError;
pub use excel::build_statement_workbook;
pub use html::{render_invoice_html, render_statement_html};
pub use types::{Statement, StatementFormat, StatementKind, StatementRow};
