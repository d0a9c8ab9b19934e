//! HTML rendering for statements and invoices.
//!
//! The produced documents are handed to the external HTML-to-PDF renderer.

use rust_decimal::Decimal;

use super::types::Statement;
use crate::invoice::{InvoiceDocument, compute_totals};

/// Renders the printable statement document.
#[must_use]
pub fn render_statement_html(statement: &Statement) -> String {
    let rows: String = statement
        .rows
        .iter()
        .map(|record| {
            format!(
                r#"
      <tr>
        <td style="padding:6px;border:1px solid #ddd">{}</td>
        <td style="padding:6px;border:1px solid #ddd;text-align:right">{}</td>
      </tr>"#,
                record.date.format("%m/%d/%Y"),
                money(record.amount)
            )
        })
        .collect();

    let from = statement
        .from
        .map_or_else(|| "\u{2014}".to_string(), |d| d.to_string());
    let to = statement
        .to
        .map_or_else(|| "\u{2014}".to_string(), |d| d.to_string());

    format!(
        r#"<html>
  <head>
    <meta charset="utf-8">
    <title>{kind} statement</title>
    <style>
      body {{ font-family: Arial, Helvetica, sans-serif; padding: 20px }}
      table {{ border-collapse: collapse; width: 100% }}
      th, td {{ border: 1px solid #ddd; padding: 8px }}
      th {{ background: #f4f4f4; text-align:left }}
    </style>
  </head>
  <body>
    <h2>{title} Statement</h2>
    <p>Range: {from} to {to}</p>
    <table>
      <thead>
        <tr>
          <th style="padding:6px">Date</th>
          <th style="padding:6px;text-align:right">Amount</th>
        </tr>
      </thead>
      <tbody>{rows}
      </tbody>
      <tfoot>
        <tr>
          <td style="padding:6px;font-weight:bold">Total</td>
          <td style="padding:6px;text-align:right;font-weight:bold">{total}</td>
        </tr>
      </tfoot>
    </table>
  </body>
</html>"#,
        kind = statement.kind.as_str(),
        title = statement.kind.title(),
        total = money(statement.total),
    )
}

/// Renders the full invoice document.
///
/// Defensive: recomputes subtotal, tax, and total from the items when the
/// stored fields were not populated by the writer.
#[must_use]
pub fn render_invoice_html(invoice: &InvoiceDocument) -> String {
    let computed = compute_totals(&invoice.items, invoice.tax_percent, invoice.discount);
    let subtotal = invoice.subtotal.unwrap_or(computed.subtotal);
    let tax_amount = invoice.tax_amount.unwrap_or(computed.tax_amount);
    let total = invoice.total.unwrap_or(computed.total);

    let items: String = invoice
        .items
        .iter()
        .map(|item| {
            format!(
                r#"
        <tr>
          <td style="padding:8px;border:1px solid #eee">{}</td>
          <td style="padding:8px;border:1px solid #eee;text-align:center">{}</td>
          <td style="padding:8px;border:1px solid #eee;text-align:right">{}</td>
          <td style="padding:8px;border:1px solid #eee;text-align:right">{}</td>
        </tr>"#,
                escape(&item.description),
                item.quantity,
                money(item.price),
                money(item.line_total()),
            )
        })
        .collect();

    let due_date = invoice
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8" />
  <title>Invoice {number}</title>
  <style>
    body {{ font-family: Arial, sans-serif; font-size: 12px; color:#222; }}
    .container {{ max-width: 800px; margin: 0 auto; padding: 20px; }}
    .header {{ display:flex; justify-content:space-between; align-items:center; margin-bottom:20px; }}
    .logo {{ font-weight:bold; font-size:18px; }}
    table {{ width:100%; border-collapse: collapse; margin-top:12px; }}
    th {{ text-align:left; padding:8px; background:#f5f5f5; border:1px solid #eee; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <div>
        <div class="logo">My Company (Pvt) Ltd</div>
        <div>No. 15, Park Avenue, Nawala Road, Rajagiriya, Sri Lanka</div>
        <div>Hotline: +94 11 456 7890</div>
        <div>Email: support@mycompany.com</div>
        <div>Web: www.mycompany.com</div>
      </div>
      <div>
        <div><strong>Invoice</strong></div>
        <div>{number}</div>
        <div>{due_date}</div>
      </div>
    </div>

    <div><strong>Bill To:</strong> {customer}</div>

    <table>
      <thead>
        <tr><th style="width:50%">Description</th><th style="width:10%">Qty</th><th style="width:20%">Price</th><th style="width:20%">Line</th></tr>
      </thead>
      <tbody>{items}
      </tbody>
    </table>

    <div style="margin-top:12px; text-align:right;">
      <div>Subtotal: {subtotal}</div>
      <div>Tax ({tax_percent}%): {tax_amount}</div>
      <div>Discount: {discount}</div>
      <div style="font-weight:bold; margin-top:8px;">Total: {total}</div>
    </div>

    <div style="margin-top:20px;">{notes}</div>
  </div>
</body>
</html>"#,
        number = escape(&invoice.invoice_number),
        customer = escape(&invoice.customer_name),
        subtotal = money(subtotal),
        tax_percent = invoice.tax_percent,
        tax_amount = money(tax_amount),
        discount = money(invoice.discount),
        total = money(total),
        notes = escape(invoice.notes.as_deref().unwrap_or_default()),
    )
}

/// Two-decimal money presentation.
fn money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Minimal HTML escaping for user-controlled text.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
