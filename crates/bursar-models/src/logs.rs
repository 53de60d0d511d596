//! Append-only audit log models.
//!
//! Both tables are insert-only: `status`, `reason`, and `error_message` are
//! written exactly once, at insert time, and never updated. The generation
//! log doubles as the idempotency witness for recurring billing — its
//! period bounds survive even if the generated invoice is later deleted.

use bursar_core::pagination::PaginationMeta;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::billing::{Currency, FeeCycleKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "generation_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GenerationType {
    Monthly,
    Quarterly,
    Yearly,
    Manual,
}

impl From<FeeCycleKind> for GenerationType {
    fn from(kind: FeeCycleKind) -> Self {
        match kind {
            FeeCycleKind::Monthly => Self::Monthly,
            FeeCycleKind::Quarterly => Self::Quarterly,
            FeeCycleKind::Yearly => Self::Yearly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "generation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Success,
    Failed,
    Skipped,
}

/// One recurring-generation attempt.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct InvoiceGenerationLog {
    pub id: Uuid,
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub generation_type: GenerationType,
    pub status: GenerationStatus,
    pub reason: Option<String>,
    pub amount: Decimal,
    pub currency: Currency,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the generation log.
#[derive(Debug, Clone)]
pub struct NewGenerationLog {
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub generation_type: GenerationType,
    pub status: GenerationStatus,
    pub reason: Option<String>,
    pub amount: Decimal,
    pub currency: Currency,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "reminder_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    Email,
    Sms,
    Whatsapp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "reminder_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Failed,
}

/// One fee-reminder dispatch attempt.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct FeeReminderLog {
    pub id: Uuid,
    pub student_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,
    pub reminder_type: ReminderType,
    pub status: ReminderStatus,
    pub message: String,
    pub recipient: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the reminder log.
#[derive(Debug, Clone)]
pub struct NewFeeReminderLog {
    pub student_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub invoice_id: Option<Uuid>,
    pub reminder_type: ReminderType,
    pub status: ReminderStatus,
    pub message: String,
    pub recipient: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

/// Outcome counts of one background sweep, returned by the manual trigger
/// endpoints and logged at the end of scheduled runs.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
pub struct RunSummary {
    pub generated: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl RunSummary {
    pub fn record_generated(&mut self) {
        self.generated += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }
}

/// Outcome counts of one reminder sweep.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
pub struct ReminderRunSummary {
    pub sent: u32,
    pub skipped: u32,
    pub failed: u32,
}

/// Paginated response containing generation log entries.
#[derive(Serialize, ToSchema)]
pub struct PaginatedGenerationLogsResponse {
    pub data: Vec<InvoiceGenerationLog>,
    pub meta: PaginationMeta,
}

/// Paginated response containing reminder log entries.
#[derive(Serialize, ToSchema)]
pub struct PaginatedReminderLogsResponse {
    pub data: Vec<FeeReminderLog>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_type_from_cycle_kind() {
        assert_eq!(
            GenerationType::from(FeeCycleKind::Monthly),
            GenerationType::Monthly
        );
        assert_eq!(
            GenerationType::from(FeeCycleKind::Quarterly),
            GenerationType::Quarterly
        );
        assert_eq!(
            GenerationType::from(FeeCycleKind::Yearly),
            GenerationType::Yearly
        );
    }

    #[test]
    fn test_run_summary_counts() {
        let mut summary = RunSummary::default();
        summary.record_generated();
        summary.record_generated();
        summary.record_skipped();
        summary.record_failed();
        assert_eq!(summary.generated, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
    }
}
