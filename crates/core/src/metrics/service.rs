//! Aggregation computations.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;

use super::types::{
    CampaignFacts, CampaignSeries, CategorizedAmount, CategoryTotal, DatedAmount, MonthlyMetrics,
    MonthlySummary, PlatformLeads, YearlyMetrics,
};

/// Pure aggregation over pre-fetched transactional records.
///
/// Callers fetch the records for the requested range; these functions only
/// partition, sum, and order. A range with no records always produces a
/// well-formed zero-filled structure.
pub struct MetricsService;

impl MetricsService {
    /// Computes the yearly dashboard metrics.
    ///
    /// Inputs must already be restricted to `year`; records outside it are
    /// ignored rather than corrupting a neighboring bucket.
    #[must_use]
    pub fn yearly_metrics(
        year: i32,
        incomes: &[DatedAmount],
        expenses: &[CategorizedAmount],
    ) -> YearlyMetrics {
        let mut incomes_by_month = vec![Decimal::ZERO; 12];
        for record in incomes.iter().filter(|r| r.date.year() == year) {
            incomes_by_month[record.date.month0() as usize] += record.amount;
        }

        let mut expenses_by_month = vec![Decimal::ZERO; 12];
        for record in expenses.iter().filter(|r| r.date.year() == year) {
            expenses_by_month[record.date.month0() as usize] += record.amount;
        }

        let total_revenue: Decimal = incomes_by_month.iter().copied().sum();
        let total_expense: Decimal = expenses_by_month.iter().copied().sum();

        YearlyMetrics {
            year,
            incomes_by_month,
            expenses_by_month,
            total_revenue,
            total_expense,
            profit: total_revenue - total_expense,
            expense_breakdown: Self::category_breakdown(
                expenses.iter().filter(|r| r.date.year() == year),
            ),
        }
    }

    /// Computes the monthly dashboard metrics for `year`/`month` (1-12).
    #[must_use]
    pub fn monthly_metrics(
        year: i32,
        month: u32,
        incomes: &[DatedAmount],
        expenses: &[CategorizedAmount],
    ) -> MonthlyMetrics {
        let in_month =
            |y: i32, m: u32| y == year && m == month;

        let mut total_revenue = Decimal::ZERO;
        let mut income_count = 0u64;
        for record in incomes {
            if in_month(record.date.year(), record.date.month()) {
                total_revenue += record.amount;
                income_count += 1;
            }
        }

        let matching_expenses: Vec<&CategorizedAmount> = expenses
            .iter()
            .filter(|r| in_month(r.date.year(), r.date.month()))
            .collect();
        let total_expense: Decimal = matching_expenses.iter().map(|r| r.amount).sum();

        MonthlyMetrics {
            year,
            month,
            total_revenue,
            total_expense,
            profit: total_revenue - total_expense,
            income_count,
            expense_count: matching_expenses.len() as u64,
            expense_breakdown: Self::category_breakdown(matching_expenses.into_iter()),
        }
    }

    /// Computes a `YYYY-MM` keyed summary of totals and counts, ascending.
    #[must_use]
    pub fn monthly_summary(records: &[DatedAmount]) -> MonthlySummary {
        // BTreeMap keeps YYYY-MM keys in chronological order for free.
        let mut buckets: BTreeMap<String, (Decimal, u64)> = BTreeMap::new();
        for record in records {
            let key = record.date.format("%Y-%m").to_string();
            let bucket = buckets.entry(key).or_insert((Decimal::ZERO, 0));
            bucket.0 += record.amount;
            bucket.1 += 1;
        }

        let mut labels = Vec::with_capacity(buckets.len());
        let mut totals = Vec::with_capacity(buckets.len());
        let mut counts = Vec::with_capacity(buckets.len());
        for (label, (total, count)) in buckets {
            labels.push(label);
            totals.push(total);
            counts.push(count);
        }

        MonthlySummary {
            labels,
            totals,
            counts,
        }
    }

    /// Sums campaign leads per platform.
    ///
    /// The platform set is open-ended, so the output is ordered by platform
    /// name rather than zero-filled.
    #[must_use]
    pub fn leads_by_platform(campaigns: &[CampaignFacts]) -> Vec<PlatformLeads> {
        let mut buckets: BTreeMap<&str, i64> = BTreeMap::new();
        for campaign in campaigns {
            *buckets.entry(campaign.platform.as_str()).or_insert(0) += campaign.leads;
        }

        buckets
            .into_iter()
            .map(|(platform, leads)| PlatformLeads {
                platform: platform.to_string(),
                leads,
            })
            .collect()
    }

    /// Builds a monthly campaign series keyed by `YYYY-MM` of the start
    /// date. Campaigns without a start date are excluded.
    #[must_use]
    pub fn monthly_campaigns(campaigns: &[CampaignFacts]) -> CampaignSeries {
        let mut buckets: BTreeMap<String, (i64, i64, Decimal)> = BTreeMap::new();
        for campaign in campaigns {
            let Some(start) = campaign.start else {
                continue;
            };
            let key = start.format("%Y-%m").to_string();
            let bucket = buckets.entry(key).or_insert((0, 0, Decimal::ZERO));
            bucket.0 += campaign.leads;
            bucket.1 += campaign.conversions;
            bucket.2 += campaign.budget;
        }

        let mut series = CampaignSeries {
            labels: Vec::with_capacity(buckets.len()),
            leads: Vec::with_capacity(buckets.len()),
            conversions: Vec::with_capacity(buckets.len()),
            budgets: Vec::with_capacity(buckets.len()),
        };
        for (label, (leads, conversions, budget)) in buckets {
            series.labels.push(label);
            series.leads.push(leads);
            series.conversions.push(conversions);
            series.budgets.push(budget);
        }
        series
    }

    /// Ranks categories descending by summed amount. Ties keep the
    /// alphabetical order of the underlying map, which makes the output
    /// deterministic.
    fn category_breakdown<'a, I>(records: I) -> Vec<CategoryTotal>
    where
        I: Iterator<Item = &'a CategorizedAmount>,
    {
        let mut buckets: BTreeMap<&str, Decimal> = BTreeMap::new();
        for record in records {
            *buckets.entry(record.category.as_str()).or_insert(Decimal::ZERO) += record.amount;
        }

        let mut breakdown: Vec<CategoryTotal> = buckets
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                category: category.to_string(),
                total,
            })
            .collect();
        breakdown.sort_by(|a, b| b.total.cmp(&a.total));
        breakdown
    }
}
