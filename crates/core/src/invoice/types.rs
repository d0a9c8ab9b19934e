//! Invoice domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single invoice line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// What was delivered.
    pub description: String,
    /// Quantity, at least 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Unit price, non-negative.
    pub price: Decimal,
}

const fn default_quantity() -> u32 {
    1
}

impl LineItem {
    /// The line total: quantity times unit price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// An invoice as handed to the renderer.
///
/// The stored totals are optional: the renderer recomputes them from the
/// items when an upstream writer did not populate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDocument {
    /// Human-facing business key, e.g. `INV-1735689600000-4821`.
    pub invoice_number: String,
    /// Customer the invoice is billed to.
    pub customer_name: String,
    /// Optional customer email, used by the send flow.
    pub customer_email: Option<String>,
    /// Ordered line items.
    pub items: Vec<LineItem>,
    /// Stored subtotal, if the writer populated it.
    pub subtotal: Option<Decimal>,
    /// Tax percentage applied to the subtotal.
    pub tax_percent: Decimal,
    /// Stored tax amount, if the writer populated it.
    pub tax_amount: Option<Decimal>,
    /// Flat discount subtracted from the total.
    pub discount: Decimal,
    /// Stored grand total, if the writer populated it.
    pub total: Option<Decimal>,
    /// Payment due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Free-form notes printed on the invoice.
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_total() {
        let item = LineItem {
            description: "Design".to_string(),
            quantity: 2,
            price: dec!(150),
        };
        assert_eq!(item.line_total(), dec!(300));
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let item: LineItem = serde_json::from_str(r#"{"description":"x","price":"9.99"}"#).unwrap();
        assert_eq!(item.quantity, 1);
    }
}
