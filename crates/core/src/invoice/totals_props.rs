//! Property-based tests for invoice total computation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::totals::compute_totals;
use super::types::LineItem;

/// Strategy for non-negative prices (0.00 to 10,000.00, two decimal places).
fn price() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for quantities (1 to 1,000).
fn quantity() -> impl Strategy<Value = u32> {
    1u32..1_000
}

/// Strategy for tax percentages (0 to 100, two decimal places).
fn tax_percent() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|bp| Decimal::new(bp, 2))
}

/// Strategy for line item lists.
fn items() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(
        (quantity(), price()).prop_map(|(quantity, price)| LineItem {
            description: "item".to_string(),
            quantity,
            price,
        }),
        0..20,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The subtotal is exactly the sum of quantity * price over all items.
    #[test]
    fn prop_subtotal_matches_item_sum(items in items(), tax in tax_percent()) {
        let totals = compute_totals(&items, tax, Decimal::ZERO);
        let expected: Decimal = items
            .iter()
            .map(|i| Decimal::from(i.quantity) * i.price)
            .sum();
        prop_assert_eq!(totals.subtotal, expected);
    }

    /// The tax amount is exactly subtotal * tax_percent / 100. Decimal
    /// arithmetic makes this exact, not merely within floating tolerance.
    #[test]
    fn prop_tax_amount_is_percent_of_subtotal(items in items(), tax in tax_percent()) {
        let totals = compute_totals(&items, tax, Decimal::ZERO);
        prop_assert_eq!(
            totals.tax_amount,
            totals.subtotal * tax / Decimal::ONE_HUNDRED
        );
    }

    /// The grand total always satisfies total = subtotal + tax - discount.
    #[test]
    fn prop_total_invariant(items in items(), tax in tax_percent(), discount in price()) {
        let totals = compute_totals(&items, tax, discount);
        prop_assert_eq!(
            totals.total,
            totals.subtotal + totals.tax_amount - totals.discount
        );
    }

    /// With no discount, the total is never less than the subtotal.
    #[test]
    fn prop_tax_never_reduces_total(items in items(), tax in tax_percent()) {
        let totals = compute_totals(&items, tax, Decimal::ZERO);
        prop_assert!(totals.total >= totals.subtotal);
    }
}
