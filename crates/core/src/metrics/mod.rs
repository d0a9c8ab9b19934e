//! Aggregation engine.
//!
//! Pure bucketing over raw transactional records fetched by the persistence
//! layer: monthly/yearly summaries, category breakdowns, and marketing
//! aggregations. Fixed-length time series are always zero-filled; dashboard
//! charts require a complete 12-element array.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::MetricsService;
pub use types::{
    CampaignFacts, CampaignSeries, CategorizedAmount, CategoryTotal, DatedAmount, MonthlyMetrics,
    MonthlySummary, PlatformLeads, YearlyMetrics,
};
