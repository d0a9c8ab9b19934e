//! Aggregation input records and output payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A raw transactional record: when and how much.
#[derive(Debug, Clone, Copy)]
pub struct DatedAmount {
    /// When the transaction happened.
    pub date: DateTime<Utc>,
    /// Non-negative amount.
    pub amount: Decimal,
}

/// A raw transactional record with its category.
#[derive(Debug, Clone)]
pub struct CategorizedAmount {
    /// When the transaction happened.
    pub date: DateTime<Utc>,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Open-ended category label.
    pub category: String,
}

/// The marketing facts of a campaign used by aggregation.
#[derive(Debug, Clone)]
pub struct CampaignFacts {
    /// Advertising platform name.
    pub platform: String,
    /// Campaign start; campaigns without one are excluded from the
    /// monthly series.
    pub start: Option<DateTime<Utc>>,
    /// Allocated budget.
    pub budget: Decimal,
    /// Lead count.
    pub leads: i64,
    /// Conversion count.
    pub conversions: i64,
}

/// A category with its summed total, used for ranked breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category label.
    pub category: String,
    /// Summed amount.
    pub total: Decimal,
}

/// Yearly dashboard metrics.
#[derive(Debug, Clone, Serialize)]
pub struct YearlyMetrics {
    /// The year the metrics cover.
    pub year: i32,
    /// Income totals for months 1-12, zero-filled.
    pub incomes_by_month: Vec<Decimal>,
    /// Expense totals for months 1-12, zero-filled.
    pub expenses_by_month: Vec<Decimal>,
    /// Sum of all income for the year.
    pub total_revenue: Decimal,
    /// Sum of all expenses for the year.
    pub total_expense: Decimal,
    /// `total_revenue - total_expense`.
    pub profit: Decimal,
    /// Expense totals per category, sorted descending by total.
    pub expense_breakdown: Vec<CategoryTotal>,
}

/// Monthly dashboard metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyMetrics {
    /// The year the metrics cover.
    pub year: i32,
    /// The month (1-12) the metrics cover.
    pub month: u32,
    /// Sum of income for the month.
    pub total_revenue: Decimal,
    /// Sum of expenses for the month.
    pub total_expense: Decimal,
    /// `total_revenue - total_expense`.
    pub profit: Decimal,
    /// Number of income records in the month.
    pub income_count: u64,
    /// Number of expense records in the month.
    pub expense_count: u64,
    /// Expense totals per category, sorted descending by total.
    pub expense_breakdown: Vec<CategoryTotal>,
}

/// A `YYYY-MM` keyed time series of totals and counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    /// Bucket labels in ascending chronological order.
    pub labels: Vec<String>,
    /// Summed amount per bucket.
    pub totals: Vec<Decimal>,
    /// Record count per bucket.
    pub counts: Vec<u64>,
}

/// Leads summed by platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformLeads {
    /// Advertising platform name.
    pub platform: String,
    /// Summed lead count.
    pub leads: i64,
}

/// Monthly campaign series keyed by `YYYY-MM` of the campaign start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSeries {
    /// Bucket labels in ascending chronological order.
    pub labels: Vec<String>,
    /// Summed leads per bucket.
    pub leads: Vec<i64>,
    /// Summed conversions per bucket.
    pub conversions: Vec<i64>,
    /// Summed budgets per bucket.
    pub budgets: Vec<Decimal>,
}
