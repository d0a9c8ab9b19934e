//! XLSX workbook rendering of a statement.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};

use super::error::StatementError;
use super::types::Statement;

/// Currency cell format, negative amounts in red.
const AMOUNT_NUM_FORMAT: &str = "$#,##0.00;[Red]-$#,##0.00";

/// Builds a one-sheet workbook for the statement: `Date` and `Amount`
/// columns, one row per record, and a bold `Total` footer row.
///
/// # Errors
///
/// Returns an error when workbook construction fails or an amount cannot
/// be represented in a spreadsheet cell.
pub fn build_statement_workbook(statement: &Statement) -> Result<Vec<u8>, StatementError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(format!("{}-statement", statement.kind.as_str()))?;

    sheet.set_column_width(0, 18)?;
    sheet.set_column_width(1, 15)?;

    let bold = Format::new().set_bold();
    let amount_format = Format::new().set_num_format(AMOUNT_NUM_FORMAT);
    let total_format = Format::new().set_bold().set_num_format(AMOUNT_NUM_FORMAT);

    sheet.write_string_with_format(0, 0, "Date", &bold)?;
    sheet.write_string_with_format(0, 1, "Amount", &bold)?;

    let mut row = 1u32;
    for record in &statement.rows {
        sheet.write_string(row, 0, record.date.format("%m/%d/%Y").to_string())?;
        sheet.write_number_with_format(row, 1, cell_value(record.amount)?, &amount_format)?;
        row += 1;
    }

    sheet.write_string_with_format(row, 0, "Total", &bold)?;
    sheet.write_number_with_format(row, 1, cell_value(statement.total)?, &total_format)?;

    Ok(workbook.save_to_buffer()?)
}

/// Spreadsheet cells are IEEE-754 doubles; the conversion happens only at
/// this presentation boundary.
fn cell_value(amount: Decimal) -> Result<f64, StatementError> {
    amount
        .to_f64()
        .ok_or_else(|| StatementError::AmountOutOfRange(amount.to_string()))
}
