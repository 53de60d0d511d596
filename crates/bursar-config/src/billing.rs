//! Background billing job configuration.
//!
//! The recurring-generation sweep and the fee-reminder sweep run on
//! independent wall-clock intervals. Both are sequential batch walks; the
//! intervals below only control how often they wake up.
//!
//! # Environment Variables
//!
//! - `BILLING_SCHEDULERS_ENABLED`: master switch for both jobs (default: true)
//! - `BILLING_GENERATION_INTERVAL_SECS`: generation sweep cadence (default: 86400, daily)
//! - `BILLING_REMINDER_INTERVAL_SECS`: reminder sweep cadence (default: 604800, weekly)
//! - `BILLING_REMINDER_UPCOMING_DAYS`: how far ahead of the due date reminders start (default: 3)
//! - `BILLING_REMINDER_REPEAT_DAYS`: minimum days between reminders for one invoice (default: 7)

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillingConfig {
    pub schedulers_enabled: bool,
    pub generation_interval_secs: u64,
    pub reminder_interval_secs: u64,
    pub reminder_upcoming_days: i64,
    pub reminder_repeat_days: i64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            schedulers_enabled: true,
            generation_interval_secs: 86_400,
            reminder_interval_secs: 604_800,
            reminder_upcoming_days: 3,
            reminder_repeat_days: 7,
        }
    }
}

impl BillingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            schedulers_enabled: env::var("BILLING_SCHEDULERS_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.schedulers_enabled),
            generation_interval_secs: env::var("BILLING_GENERATION_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.generation_interval_secs),
            reminder_interval_secs: env::var("BILLING_REMINDER_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.reminder_interval_secs),
            reminder_upcoming_days: env::var("BILLING_REMINDER_UPCOMING_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.reminder_upcoming_days),
            reminder_repeat_days: env::var("BILLING_REMINDER_REPEAT_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.reminder_repeat_days),
        }
    }
}
