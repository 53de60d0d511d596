//! The append-only fee-reminder log.
//!
//! Rows are written once per dispatch attempt; `status` and
//! `error_message` are set at insert time and never updated. The newest
//! row per invoice doubles as the repeat-window idempotency check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bursar_core::StoreError;
use bursar_models::logs::{FeeReminderLog, NewFeeReminderLog};

#[async_trait]
pub trait ReminderLogStore: Send + Sync {
    async fn append(&self, new: NewFeeReminderLog) -> Result<FeeReminderLog, StoreError>;

    /// When the invoice was last reminded about (any status), if ever.
    async fn last_attempt_at(
        &self,
        invoice_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, StoreError>;

    async fn list_for_student(&self, student_id: Uuid)
    -> Result<Vec<FeeReminderLog>, StoreError>;
}

const LOG_COLUMNS: &str = "id, student_id, parent_id, invoice_id, reminder_type, status, \
                           message, recipient, sent_at, error_message, created_at";

#[derive(Clone)]
pub struct PgReminderLogStore {
    db: PgPool,
}

impl PgReminderLogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReminderLogStore for PgReminderLogStore {
    async fn append(&self, new: NewFeeReminderLog) -> Result<FeeReminderLog, StoreError> {
        let log = sqlx::query_as::<_, FeeReminderLog>(&format!(
            r#"
            INSERT INTO fee_reminder_logs
                (student_id, parent_id, invoice_id, reminder_type, status, message,
                 recipient, sent_at, error_message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {LOG_COLUMNS}
            "#
        ))
        .bind(new.student_id)
        .bind(new.parent_id)
        .bind(new.invoice_id)
        .bind(new.reminder_type)
        .bind(new.status)
        .bind(new.message)
        .bind(new.recipient)
        .bind(new.sent_at)
        .bind(new.error_message)
        .fetch_one(&self.db)
        .await?;

        Ok(log)
    }

    async fn last_attempt_at(
        &self,
        invoice_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let row: Option<(DateTime<Utc>,)> = sqlx::query_as(
            r#"
            SELECT created_at
            FROM fee_reminder_logs
            WHERE invoice_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(at,)| at))
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<FeeReminderLog>, StoreError> {
        let logs = sqlx::query_as::<_, FeeReminderLog>(&format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM fee_reminder_logs
            WHERE student_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(student_id)
        .fetch_all(&self.db)
        .await?;

        Ok(logs)
    }
}
