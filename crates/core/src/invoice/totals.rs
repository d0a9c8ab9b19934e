//! Server-side invoice total computation.
//!
//! Totals are recomputed on every invoice create and update; any totals
//! supplied by the client are discarded.

use rust_decimal::Decimal;
use serde::Serialize;

use super::types::LineItem;

/// The derived monetary fields of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    /// Sum of quantity times price over all items.
    pub subtotal: Decimal,
    /// Tax percentage the tax amount was derived from.
    pub tax_percent: Decimal,
    /// `subtotal * tax_percent / 100`.
    pub tax_amount: Decimal,
    /// Flat discount.
    pub discount: Decimal,
    /// `subtotal + tax_amount - discount`.
    pub total: Decimal,
}

/// Computes subtotal, tax, and total for a line-itemized document.
///
/// Pure: no rounding is applied here. Presentation layers round to two
/// decimal places when formatting.
#[must_use]
pub fn compute_totals(items: &[LineItem], tax_percent: Decimal, discount: Decimal) -> InvoiceTotals {
    let subtotal: Decimal = items.iter().map(LineItem::line_total).sum();
    let tax_amount = subtotal * tax_percent / Decimal::ONE_HUNDRED;
    let total = subtotal + tax_amount - discount;

    InvoiceTotals {
        subtotal,
        tax_percent,
        tax_amount,
        discount,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(description: &str, quantity: u32, price: Decimal) -> LineItem {
        LineItem {
            description: description.to_string(),
            quantity,
            price,
        }
    }

    #[test]
    fn test_design_invoice_scenario() {
        // 2 x 150 at 10% tax with a 20 discount.
        let totals = compute_totals(&[item("Design", 2, dec!(150))], dec!(10), dec!(20));

        assert_eq!(totals.subtotal, dec!(300));
        assert_eq!(totals.tax_amount, dec!(30));
        assert_eq!(totals.discount, dec!(20));
        assert_eq!(totals.total, dec!(310));
    }

    #[test]
    fn test_empty_items_yield_zero_subtotal() {
        let totals = compute_totals(&[], dec!(15), dec!(0));
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_discount_can_push_total_below_subtotal() {
        let totals = compute_totals(&[item("Hosting", 1, dec!(50))], dec!(0), dec!(60));
        assert_eq!(totals.total, dec!(-10));
    }

    #[test]
    fn test_multiple_items_sum_exactly() {
        let items = vec![
            item("Design", 2, dec!(150.25)),
            item("Copywriting", 3, dec!(80.10)),
            item("Stock photos", 1, dec!(19.90)),
        ];
        let totals = compute_totals(&items, dec!(0), dec!(0));
        assert_eq!(totals.subtotal, dec!(300.50) + dec!(240.30) + dec!(19.90));
        assert_eq!(totals.total, totals.subtotal);
    }
}
