//! Statement export engine tests.

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::excel::build_statement_workbook;
use super::html::{render_invoice_html, render_statement_html};
use super::types::{Statement, StatementFormat, StatementKind, StatementRow};
use crate::invoice::{InvoiceDocument, LineItem};

fn row(year: i32, month: u32, day: u32, amount: Decimal) -> StatementRow {
    StatementRow {
        date: Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap(),
        amount,
    }
}

fn january_statement() -> Statement {
    Statement::new(
        StatementKind::Income,
        NaiveDate::from_ymd_opt(2025, 1, 1),
        NaiveDate::from_ymd_opt(2025, 1, 31),
        vec![
            row(2025, 1, 20, dec!(500)),
            row(2025, 1, 10, dec!(120.50)),
        ],
    )
}

mod assembly {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_total_is_sum_of_rows() {
        let statement = january_statement();
        assert_eq!(statement.total, dec!(620.50));
    }

    #[test]
    fn test_empty_statement_total_is_zero() {
        let statement = Statement::new(StatementKind::Expense, None, None, vec![]);
        assert_eq!(statement.total, Decimal::ZERO);
    }

    #[test]
    fn test_filename_with_both_bounds() {
        let statement = january_statement();
        assert_eq!(
            statement.filename(StatementFormat::Excel),
            "income-statement2025-01-01-2025-01-31.xlsx"
        );
        assert_eq!(
            statement.filename(StatementFormat::Pdf),
            "income-statement2025-01-01-2025-01-31.pdf"
        );
    }

    #[test]
    fn test_filename_with_missing_bounds() {
        let statement = Statement::new(StatementKind::Expense, None, None, vec![]);
        assert_eq!(
            statement.filename(StatementFormat::Pdf),
            "expense-statement-.pdf"
        );
    }

    #[test]
    fn test_kind_and_format_parsing() {
        assert_eq!(
            StatementKind::from_str("income").unwrap(),
            StatementKind::Income
        );
        assert_eq!(
            StatementKind::from_str("expense").unwrap(),
            StatementKind::Expense
        );
        assert!(StatementKind::from_str("payroll").is_err());

        assert_eq!(
            StatementFormat::from_str("excel").unwrap(),
            StatementFormat::Excel
        );
        assert_eq!(
            StatementFormat::from_str("pdf").unwrap(),
            StatementFormat::Pdf
        );
        assert!(StatementFormat::from_str("csv").is_err());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(StatementFormat::Pdf.content_type(), "application/pdf");
        assert_eq!(
            StatementFormat::Excel.content_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }
}

mod workbook {
    use super::*;

    #[test]
    fn test_workbook_builds_for_populated_statement() {
        let bytes = build_statement_workbook(&january_statement()).unwrap();
        // XLSX is a ZIP container; PK magic is the cheapest sanity check.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_workbook_builds_for_empty_statement() {
        let statement = Statement::new(StatementKind::Expense, None, None, vec![]);
        let bytes = build_statement_workbook(&statement).unwrap();
        assert!(!bytes.is_empty());
    }
}

mod statement_html {
    use super::*;

    #[test]
    fn test_contains_range_rows_and_total() {
        let html = render_statement_html(&january_statement());

        assert!(html.contains("Income Statement"));
        assert!(html.contains("Range: 2025-01-01 to 2025-01-31"));
        assert!(html.contains("01/20/2025"));
        assert!(html.contains("500.00"));
        assert!(html.contains("620.50"));
    }

    #[test]
    fn test_missing_bounds_render_as_dashes() {
        let statement = Statement::new(StatementKind::Expense, None, None, vec![]);
        let html = render_statement_html(&statement);
        assert!(html.contains("Range: \u{2014} to \u{2014}"));
    }
}

mod invoice_html {
    use super::*;

    fn invoice() -> InvoiceDocument {
        InvoiceDocument {
            invoice_number: "INV-1735689600000-4821".to_string(),
            customer_name: "Acme Corp".to_string(),
            customer_email: Some("billing@acme.test".to_string()),
            items: vec![LineItem {
                description: "Design".to_string(),
                quantity: 2,
                price: dec!(150),
            }],
            subtotal: Some(dec!(300)),
            tax_percent: dec!(10),
            tax_amount: Some(dec!(30)),
            discount: dec!(20),
            total: Some(dec!(310)),
            due_date: None,
            notes: Some("Thank you for your business!".to_string()),
        }
    }

    #[test]
    fn test_renders_items_and_totals() {
        let html = render_invoice_html(&invoice());

        assert!(html.contains("INV-1735689600000-4821"));
        assert!(html.contains("Bill To:</strong> Acme Corp"));
        assert!(html.contains("Design"));
        assert!(html.contains("Subtotal: 300.00"));
        assert!(html.contains("Tax (10%): 30.00"));
        assert!(html.contains("Discount: 20.00"));
        assert!(html.contains("Total: 310.00"));
    }

    #[test]
    fn test_recomputes_missing_totals_from_items() {
        let mut doc = invoice();
        doc.subtotal = None;
        doc.tax_amount = None;
        doc.total = None;

        let html = render_invoice_html(&doc);

        assert!(html.contains("Subtotal: 300.00"));
        assert!(html.contains("Tax (10%): 30.00"));
        assert!(html.contains("Total: 310.00"));
    }

    #[test]
    fn test_escapes_customer_controlled_text() {
        let mut doc = invoice();
        doc.customer_name = "<script>alert(1)</script>".to_string();

        let html = render_invoice_html(&doc);

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
