//! Invoice status lifecycle rules.
//!
//! Status only moves forward: Pending invoices become Overdue when their due
//! date passes, and any invoice becomes Paid on an explicit mark. The sweep
//! never reverts a Paid or Overdue invoice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InvoiceStatus {
    /// Initial state.
    #[default]
    Pending,
    /// Explicitly marked as paid; never auto-reverted.
    Paid,
    /// Due date passed without payment.
    Overdue,
}

impl InvoiceStatus {
    /// True when the overdue sweep may move this status to Overdue.
    ///
    /// Paid and Overdue invoices are never touched, which is what makes the
    /// sweep idempotent.
    #[must_use]
    pub const fn sweepable(self) -> bool {
        !matches!(self, Self::Paid | Self::Overdue)
    }

    /// Applies the overdue rule for a single invoice.
    ///
    /// Returns the status the sweep would leave the invoice in at `now`.
    #[must_use]
    pub fn after_sweep(self, due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match due_date {
            Some(due) if self.sweepable() && due < now => Self::Overdue,
            _ => self,
        }
    }

    /// String form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" | "pending" => Ok(Self::Pending),
            "Paid" | "paid" => Ok(Self::Paid),
            "Overdue" | "overdue" => Ok(Self::Overdue),
            _ => Err(format!("Unknown invoice status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_pending_past_due_becomes_overdue() {
        let now = Utc::now();
        let past = Some(now - Duration::days(3));
        assert_eq!(
            InvoiceStatus::Pending.after_sweep(past, now),
            InvoiceStatus::Overdue
        );
    }

    #[test]
    fn test_paid_is_never_swept() {
        let now = Utc::now();
        let past = Some(now - Duration::days(30));
        assert_eq!(
            InvoiceStatus::Paid.after_sweep(past, now),
            InvoiceStatus::Paid
        );
    }

    #[test]
    fn test_future_due_date_stays_pending() {
        let now = Utc::now();
        let future = Some(now + Duration::days(7));
        assert_eq!(
            InvoiceStatus::Pending.after_sweep(future, now),
            InvoiceStatus::Pending
        );
    }

    #[test]
    fn test_missing_due_date_stays_pending() {
        let now = Utc::now();
        assert_eq!(
            InvoiceStatus::Pending.after_sweep(None, now),
            InvoiceStatus::Pending
        );
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let now = Utc::now();
        let past = Some(now - Duration::days(1));
        let once = InvoiceStatus::Pending.after_sweep(past, now);
        let twice = once.after_sweep(past, now);
        assert_eq!(once, twice);
        assert_eq!(twice, InvoiceStatus::Overdue);
    }

    #[test]
    fn test_roundtrip_strings() {
        for status in [
            InvoiceStatus::Pending,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
        ] {
            assert_eq!(status.as_str().parse::<InvoiceStatus>().unwrap(), status);
        }
        assert!("Cancelled".parse::<InvoiceStatus>().is_err());
    }
}
