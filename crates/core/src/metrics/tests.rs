//! Aggregation engine tests.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::MetricsService;
use super::types::{CampaignFacts, CategorizedAmount, DatedAmount};

fn income(year: i32, month: u32, day: u32, amount: Decimal) -> DatedAmount {
    DatedAmount {
        date: Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
        amount,
    }
}

fn expense(year: i32, month: u32, day: u32, category: &str, amount: Decimal) -> CategorizedAmount {
    CategorizedAmount {
        date: Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap(),
        amount,
        category: category.to_string(),
    }
}

fn campaign(platform: &str, start: Option<(i32, u32)>, budget: Decimal, leads: i64, conversions: i64) -> CampaignFacts {
    CampaignFacts {
        platform: platform.to_string(),
        start: start.map(|(y, m)| Utc.with_ymd_and_hms(y, m, 1, 0, 0, 0).unwrap()),
        budget,
        leads,
        conversions,
    }
}

mod yearly {
    use super::*;

    #[test]
    fn test_empty_year_is_zero_filled() {
        let metrics = MetricsService::yearly_metrics(2025, &[], &[]);

        assert_eq!(metrics.incomes_by_month, vec![Decimal::ZERO; 12]);
        assert_eq!(metrics.expenses_by_month, vec![Decimal::ZERO; 12]);
        assert_eq!(metrics.total_revenue, Decimal::ZERO);
        assert_eq!(metrics.total_expense, Decimal::ZERO);
        assert_eq!(metrics.profit, Decimal::ZERO);
        assert!(metrics.expense_breakdown.is_empty());
    }

    #[test]
    fn test_months_without_records_stay_zero() {
        let incomes = vec![income(2025, 3, 10, dec!(100)), income(2025, 3, 20, dec!(50))];
        let expenses = vec![expense(2025, 7, 1, "Rent", dec!(40))];

        let metrics = MetricsService::yearly_metrics(2025, &incomes, &expenses);

        assert_eq!(metrics.incomes_by_month.len(), 12);
        assert_eq!(metrics.incomes_by_month[2], dec!(150)); // March
        assert_eq!(metrics.incomes_by_month[0], Decimal::ZERO);
        assert_eq!(metrics.expenses_by_month[6], dec!(40)); // July
        assert_eq!(metrics.total_revenue, dec!(150));
        assert_eq!(metrics.total_expense, dec!(40));
        assert_eq!(metrics.profit, dec!(110));
    }

    #[test]
    fn test_records_from_other_years_are_ignored() {
        let incomes = vec![income(2024, 12, 31, dec!(999)), income(2025, 1, 1, dec!(10))];
        let metrics = MetricsService::yearly_metrics(2025, &incomes, &[]);
        assert_eq!(metrics.total_revenue, dec!(10));
    }

    #[test]
    fn test_expense_breakdown_sorted_descending() {
        let expenses = vec![
            expense(2025, 1, 1, "Rent", dec!(100)),
            expense(2025, 2, 1, "Ads", dec!(300)),
            expense(2025, 3, 1, "Rent", dec!(50)),
        ];

        let metrics = MetricsService::yearly_metrics(2025, &[], &expenses);

        assert_eq!(metrics.expense_breakdown.len(), 2);
        assert_eq!(metrics.expense_breakdown[0].category, "Ads");
        assert_eq!(metrics.expense_breakdown[0].total, dec!(300));
        assert_eq!(metrics.expense_breakdown[1].category, "Rent");
        assert_eq!(metrics.expense_breakdown[1].total, dec!(150));
    }
}

mod monthly {
    use super::*;

    #[test]
    fn test_empty_month_is_well_formed() {
        let metrics = MetricsService::monthly_metrics(2025, 11, &[], &[]);
        assert_eq!(metrics.total_revenue, Decimal::ZERO);
        assert_eq!(metrics.total_expense, Decimal::ZERO);
        assert_eq!(metrics.profit, Decimal::ZERO);
        assert_eq!(metrics.income_count, 0);
        assert_eq!(metrics.expense_count, 0);
    }

    #[test]
    fn test_restricted_to_requested_month() {
        let incomes = vec![
            income(2025, 3, 1, dec!(100)),
            income(2025, 4, 1, dec!(777)),
        ];
        let expenses = vec![
            expense(2025, 3, 5, "Ads", dec!(30)),
            expense(2025, 3, 6, "Rent", dec!(10)),
            expense(2025, 5, 1, "Ads", dec!(999)),
        ];

        let metrics = MetricsService::monthly_metrics(2025, 3, &incomes, &expenses);

        assert_eq!(metrics.total_revenue, dec!(100));
        assert_eq!(metrics.total_expense, dec!(40));
        assert_eq!(metrics.profit, dec!(60));
        assert_eq!(metrics.income_count, 1);
        assert_eq!(metrics.expense_count, 2);
        assert_eq!(metrics.expense_breakdown[0].category, "Ads");
    }
}

mod summary {
    use super::*;

    #[test]
    fn test_two_buckets_scenario() {
        // Two expenses in 2025-03 (100 + 50), one in 2025-04 (20).
        let records = vec![
            income(2025, 3, 2, dec!(100)),
            income(2025, 3, 15, dec!(50)),
            income(2025, 4, 1, dec!(20)),
        ];

        let summary = MetricsService::monthly_summary(&records);

        assert_eq!(summary.labels, vec!["2025-03", "2025-04"]);
        assert_eq!(summary.totals, vec![dec!(150), dec!(20)]);
        assert_eq!(summary.counts, vec![2, 1]);
    }

    #[test]
    fn test_labels_ascend_across_years() {
        let records = vec![
            income(2025, 1, 1, dec!(1)),
            income(2024, 12, 1, dec!(2)),
            income(2024, 2, 1, dec!(3)),
        ];

        let summary = MetricsService::monthly_summary(&records);
        assert_eq!(summary.labels, vec!["2024-02", "2024-12", "2025-01"]);
    }

    #[test]
    fn test_no_records() {
        let summary = MetricsService::monthly_summary(&[]);
        assert!(summary.labels.is_empty());
        assert!(summary.totals.is_empty());
        assert!(summary.counts.is_empty());
    }
}

mod campaigns {
    use super::*;

    #[test]
    fn test_leads_by_platform_sums() {
        let campaigns = vec![
            campaign("google", Some((2025, 1)), dec!(100), 10, 2),
            campaign("facebook", Some((2025, 1)), dec!(200), 25, 5),
            campaign("google", Some((2025, 2)), dec!(50), 5, 1),
        ];

        let leads = MetricsService::leads_by_platform(&campaigns);

        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].platform, "facebook");
        assert_eq!(leads[0].leads, 25);
        assert_eq!(leads[1].platform, "google");
        assert_eq!(leads[1].leads, 15);
    }

    #[test]
    fn test_monthly_campaigns_skip_missing_start() {
        let campaigns = vec![
            campaign("google", Some((2025, 1)), dec!(100), 10, 2),
            campaign("facebook", None, dec!(999), 99, 9),
            campaign("tiktok", Some((2025, 1)), dec!(40), 4, 1),
            campaign("google", Some((2025, 3)), dec!(60), 6, 3),
        ];

        let series = MetricsService::monthly_campaigns(&campaigns);

        assert_eq!(series.labels, vec!["2025-01", "2025-03"]);
        assert_eq!(series.leads, vec![14, 6]);
        assert_eq!(series.conversions, vec![3, 3]);
        assert_eq!(series.budgets, vec![dec!(140), dec!(60)]);
    }
}
