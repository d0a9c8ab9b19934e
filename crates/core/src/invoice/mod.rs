//! Invoice domain logic.
//!
//! This module implements the invoice financial core:
//! - Line items and invoice documents
//! - Server-side total computation (clients are never trusted)
//! - Business-key (invoice number) generation
//! - Status lifecycle rules

pub mod number;
pub mod status;
pub mod totals;
pub mod types;

#[cfg(test)]
mod totals_props;

pub use number::generate_invoice_number;
pub use status::InvoiceStatus;
pub use totals::{InvoiceTotals, compute_totals};
pub use types::{InvoiceDocument, LineItem};
