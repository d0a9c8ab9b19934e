//! Statement assembly types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use super::error::StatementError;

/// Which transaction collection a statement covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    /// Income records.
    Income,
    /// Expense records.
    Expense,
}

impl StatementKind {
    /// Lowercase form used in filenames and titles.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Capitalized form for document headings.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl FromStr for StatementKind {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(StatementError::UnknownKind(other.to_string())),
        }
    }
}

/// Output format of a statement export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    /// Paginated printable document via the HTML-to-PDF renderer.
    Pdf,
    /// Spreadsheet workbook.
    Excel,
}

impl StatementFormat {
    /// MIME type sent in the response.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// File extension used in the download filename.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }
}

impl FromStr for StatementFormat {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "excel" => Ok(Self::Excel),
            other => Err(StatementError::UnknownFormat(other.to_string())),
        }
    }
}

/// One statement row: when and how much.
#[derive(Debug, Clone, Copy)]
pub struct StatementRow {
    /// Transaction date.
    pub date: DateTime<Utc>,
    /// Transaction amount.
    pub amount: Decimal,
}

/// A filtered, totaled tabular statement over a date range.
#[derive(Debug, Clone)]
pub struct Statement {
    /// Which collection the rows came from.
    pub kind: StatementKind,
    /// Inclusive lower bound of the range, if any.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound of the range, if any.
    pub to: Option<NaiveDate>,
    /// Rows, sorted descending by date by the caller.
    pub rows: Vec<StatementRow>,
    /// Sum of all row amounts; the footer row.
    pub total: Decimal,
}

impl Statement {
    /// Assembles a statement, computing the footer total.
    #[must_use]
    pub fn new(
        kind: StatementKind,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        rows: Vec<StatementRow>,
    ) -> Self {
        let total = rows.iter().map(|r| r.amount).sum();
        Self {
            kind,
            from,
            to,
            rows,
            total,
        }
    }

    /// Download filename: `<kind>-statement<from>-<to>.<ext>`, with empty
    /// strings substituted for missing bounds.
    #[must_use]
    pub fn filename(&self, format: StatementFormat) -> String {
        let from = self.from.map(|d| d.to_string()).unwrap_or_default();
        let to = self.to.map(|d| d.to_string()).unwrap_or_default();
        format!(
            "{}-statement{}-{}.{}",
            self.kind.as_str(),
            from,
            to,
            format.extension()
        )
    }
}
