//! Billing value types: currencies, fee cycles, calendar periods, and the
//! two due-date policies.
//!
//! The period math here is the backbone of the recurring-generation
//! idempotency guard: a cycle kind maps any date to the calendar period
//! containing it, and an invoice is generated at most once per
//! (student, class, period).

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Billing currency. Resolved from the student's country at generation
/// time; there is no conversion between the two.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type, Default,
)]
#[sqlx(type_name = "currency", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Pkr,
}

impl Currency {
    /// Country → currency mapping used by the recurring scheduler.
    pub fn from_country(country: Option<&str>) -> Self {
        match country {
            Some(c) if c.eq_ignore_ascii_case("pakistan") => Self::Pkr,
            _ => Self::Usd,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Pkr => "PKR",
        }
    }
}

/// Cadence of a recurring fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeeCycleKind {
    Monthly,
    Quarterly,
    Yearly,
}

impl FeeCycleKind {
    /// The calendar period containing `date`: the calendar month, the
    /// quarter of three months, or the calendar year. Bounds are inclusive.
    pub fn period_containing(self, date: NaiveDate) -> BillingPeriod {
        let start = match self {
            Self::Monthly => first_of_month(date.year(), date.month()),
            Self::Quarterly => {
                let quarter_start_month = ((date.month() - 1) / 3) * 3 + 1;
                first_of_month(date.year(), quarter_start_month)
            }
            Self::Yearly => first_of_month(date.year(), 1),
        };

        let months = match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Yearly => 12,
        };

        let end = start
            .checked_add_months(Months::new(months))
            .and_then(|d| d.pred_opt())
            .unwrap_or(start);

        BillingPeriod { start, end }
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("day 1 exists in every month")
}

/// A fee cycle: cadence plus the day of the period on which generation
/// fires. Classes without an explicit cycle bill monthly on day 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FeeCycle {
    pub kind: FeeCycleKind,
    pub target_day: u32,
}

impl Default for FeeCycle {
    fn default() -> Self {
        Self {
            kind: FeeCycleKind::Monthly,
            target_day: 1,
        }
    }
}

impl FeeCycle {
    pub fn new(kind: FeeCycleKind) -> Self {
        Self {
            kind,
            target_day: 1,
        }
    }

    /// Whether `today` is exactly the generation day of its own period.
    /// This is an exact-day match, not on-or-after: a sweep that misses the
    /// day skips the period's automatic trigger entirely.
    pub fn is_generation_day(&self, today: NaiveDate) -> bool {
        self.kind
            .period_containing(today)
            .day(self.target_day)
            .is_some_and(|d| d == today)
    }
}

/// An inclusive calendar period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The `n`-th day of the period (1-indexed), if it falls inside.
    pub fn day(&self, n: u32) -> Option<NaiveDate> {
        if n == 0 {
            return None;
        }
        self.start
            .checked_add_days(Days::new(u64::from(n - 1)))
            .filter(|d| *d <= self.end)
    }
}

/// The two deliberately distinct due-date rules. Checkout invoices give the
/// payer 30 days from checkout; recurring invoices fall due 15 days into
/// the billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDatePolicy {
    Checkout,
    Recurring,
}

impl DueDatePolicy {
    pub fn days(&self) -> u64 {
        match self {
            Self::Checkout => 30,
            Self::Recurring => 15,
        }
    }

    pub fn due_date(&self, from: NaiveDate) -> NaiveDate {
        from.checked_add_days(Days::new(self.days())).unwrap_or(from)
    }
}
