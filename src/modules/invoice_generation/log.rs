//! The append-only invoice-generation log.
//!
//! Rows are written once per generation attempt and never updated. Besides
//! auditing, the log is the idempotency witness for recurring billing: a
//! `success` row covering a period blocks re-billing that period even when
//! the generated invoice has since been deleted.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use bursar_core::StoreError;
use bursar_models::billing::BillingPeriod;
use bursar_models::logs::{InvoiceGenerationLog, NewGenerationLog};

#[async_trait]
pub trait GenerationLogStore: Send + Sync {
    async fn append(&self, new: NewGenerationLog) -> Result<InvoiceGenerationLog, StoreError>;

    /// Whether a `success` row for (student, class) overlaps the period.
    async fn has_success_in_period(
        &self,
        student_id: Uuid,
        class_id: Uuid,
        period: &BillingPeriod,
    ) -> Result<bool, StoreError>;

    async fn list_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<InvoiceGenerationLog>, StoreError>;
}

const LOG_COLUMNS: &str = "id, student_id, class_id, invoice_id, generation_type, status, \
                           reason, amount, currency, period_start, period_end, created_at";

#[derive(Clone)]
pub struct PgGenerationLogStore {
    db: PgPool,
}

impl PgGenerationLogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GenerationLogStore for PgGenerationLogStore {
    async fn append(&self, new: NewGenerationLog) -> Result<InvoiceGenerationLog, StoreError> {
        let log = sqlx::query_as::<_, InvoiceGenerationLog>(&format!(
            r#"
            INSERT INTO invoice_generation_logs
                (student_id, class_id, invoice_id, generation_type, status, reason,
                 amount, currency, period_start, period_end)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {LOG_COLUMNS}
            "#
        ))
        .bind(new.student_id)
        .bind(new.class_id)
        .bind(new.invoice_id)
        .bind(new.generation_type)
        .bind(new.status)
        .bind(new.reason)
        .bind(new.amount)
        .bind(new.currency)
        .bind(new.period_start)
        .bind(new.period_end)
        .fetch_one(&self.db)
        .await?;

        Ok(log)
    }

    async fn has_success_in_period(
        &self,
        student_id: Uuid,
        class_id: Uuid,
        period: &BillingPeriod,
    ) -> Result<bool, StoreError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM invoice_generation_logs
                WHERE student_id = $1 AND class_id = $2 AND status = 'success'
                  AND period_start <= $4 AND period_end >= $3
            )
            "#,
        )
        .bind(student_id)
        .bind(class_id)
        .bind(period.start)
        .bind(period.end)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<InvoiceGenerationLog>, StoreError> {
        let logs = sqlx::query_as::<_, InvoiceGenerationLog>(&format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM invoice_generation_logs
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
