//! Invoice persistence.
//!
//! `create` is the one contention point of the whole core: when no number
//! is supplied it row-locks every number sharing the year prefix
//! (`SELECT … FOR UPDATE`, soft-deleted rows included), computes the next
//! sequence value, and inserts header then items inside the same
//! transaction. Concurrent allocators for the same prefix block on the
//! lock and wait; they do not fail.
//!
//! Every mutation is a single conditional UPDATE, never read-mutate-save,
//! so concurrent writers cannot lose each other's updates.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use bursar_core::StoreError;
use bursar_models::invoices::{Invoice, InvoiceItem, NewInvoice};

use super::sequence;

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert an invoice, allocating a number when none is supplied.
    /// A uniqueness conflict on the number column surfaces as
    /// [`StoreError::DuplicateInvoiceNumber`]; the lifecycle retry loop
    /// handles it.
    async fn create(&self, new: NewInvoice) -> Result<Invoice, StoreError>;

    /// Fetch the composed aggregate (header + items). Soft-deleted
    /// invoices are not returned.
    async fn get(&self, id: Uuid) -> Result<Option<Invoice>, StoreError>;

    /// A student's non-deleted invoices, most recently created first.
    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Invoice>, StoreError>;

    /// Stamp paid status, paid date, method and transaction id. No guard
    /// beyond existence: re-marking a paid invoice re-stamps the date.
    async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: &str,
        transaction_id: &str,
    ) -> Result<Invoice, StoreError>;

    /// Flip paid → refunded with a note. Conditional on `status = 'paid'`;
    /// `NotFound` means the invoice was not in a refundable state.
    async fn mark_refunded(&self, id: Uuid, note: &str) -> Result<Invoice, StoreError>;

    /// Flip a past-due draft/sent invoice to overdue. Returns `None` when
    /// the invoice was not in a flippable state.
    async fn mark_overdue(&self, id: Uuid) -> Result<Option<Invoice>, StoreError>;

    async fn attach_proof(&self, id: Uuid, proof_url: &str) -> Result<Invoice, StoreError>;

    /// Soft delete. The invoice number stays burned.
    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Non-deleted unpaid invoices due on or before the given date, for
    /// the reminder sweep.
    async fn list_unpaid_due_by(&self, due_by: NaiveDate) -> Result<Vec<Invoice>, StoreError>;
}

const INVOICE_COLUMNS: &str = "id, invoice_number, student_id, parent_id, class_id, amount, \
                               currency, status, due_date, generated_date, paid_date, \
                               payment_method, transaction_id, description, original_price, \
                               discount_amount, payment_proof_url, notes, deleted_at, created_at";

#[derive(Clone)]
pub struct PgInvoiceStore {
    db: PgPool,
}

impl PgInvoiceStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Allocate the next number for `year` inside `tx`. The `FOR UPDATE`
    /// scan blocks every other allocator for the same prefix until the
    /// surrounding transaction commits.
    async fn allocate_number(
        tx: &mut Transaction<'_, Postgres>,
        year: i32,
    ) -> Result<String, StoreError> {
        let existing: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT invoice_number
            FROM invoices
            WHERE invoice_number LIKE $1
            FOR UPDATE
            "#,
        )
        .bind(format!("{}%", sequence::year_prefix(year)))
        .fetch_all(&mut **tx)
        .await?;

        Ok(sequence::next_number(
            year,
            existing.iter().map(|(n,)| n.as_str()),
        ))
    }

    async fn fetch_items(&self, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, StoreError> {
        let items = sqlx::query_as::<_, InvoiceItem>(
            r#"
            SELECT id, invoice_id, description, quantity, unit_price, amount
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    async fn compose(&self, invoice: Option<Invoice>) -> Result<Option<Invoice>, StoreError> {
        match invoice {
            Some(mut invoice) => {
                invoice.items = self.fetch_items(invoice.id).await?;
                Ok(Some(invoice))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl InvoiceStore for PgInvoiceStore {
    async fn create(&self, new: NewInvoice) -> Result<Invoice, StoreError> {
        let mut tx = self.db.begin().await?;

        let invoice_number = match new.invoice_number {
            Some(number) => number,
            None => Self::allocate_number(&mut tx, Utc::now().year()).await?,
        };

        // Header first: items need a durable invoice id.
        let (invoice_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO invoices
                (invoice_number, student_id, parent_id, class_id, amount, currency, status,
                 due_date, description, original_price, discount_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&invoice_number)
        .bind(new.student_id)
        .bind(new.parent_id)
        .bind(new.class_id)
        .bind(new.amount)
        .bind(new.currency)
        .bind(new.status)
        .bind(new.due_date)
        .bind(&new.description)
        .bind(new.original_price)
        .bind(new.discount_amount)
        .fetch_one(&mut *tx)
        .await
        .map_err(StoreError::from_invoice_insert)?;

        for item in &new.items {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (invoice_id, description, quantity, unit_price, amount)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(invoice_id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.amount())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        // Re-read the composed aggregate.
        self.get(invoice_id).await?.ok_or(StoreError::NotFound)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Invoice>, StoreError> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE id = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        self.compose(invoice).await
    }

    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Invoice>, StoreError> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE student_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#
        ))
        .bind(student_id)
        .fetch_all(&self.db)
        .await?;

        Ok(invoices)
    }

    async fn mark_paid(
        &self,
        id: Uuid,
        payment_method: &str,
        transaction_id: &str,
    ) -> Result<Invoice, StoreError> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'paid', paid_date = now(), payment_method = $2, transaction_id = $3
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payment_method)
        .bind(transaction_id)
        .fetch_optional(&self.db)
        .await?;

        self.compose(invoice).await?.ok_or(StoreError::NotFound)
    }

    async fn mark_refunded(&self, id: Uuid, note: &str) -> Result<Invoice, StoreError> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'refunded', notes = $2
            WHERE id = $1 AND status = 'paid' AND deleted_at IS NULL
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(note)
        .fetch_optional(&self.db)
        .await?;

        self.compose(invoice).await?.ok_or(StoreError::NotFound)
    }

    async fn mark_overdue(&self, id: Uuid) -> Result<Option<Invoice>, StoreError> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'overdue'
            WHERE id = $1 AND status IN ('draft', 'sent')
              AND due_date < CURRENT_DATE AND deleted_at IS NULL
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        self.compose(invoice).await
    }

    async fn attach_proof(&self, id: Uuid, proof_url: &str) -> Result<Invoice, StoreError> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET payment_proof_url = $2
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(proof_url)
        .fetch_optional(&self.db)
        .await?;

        self.compose(invoice).await?.ok_or(StoreError::NotFound)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET deleted_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn list_unpaid_due_by(&self, due_by: NaiveDate) -> Result<Vec<Invoice>, StoreError> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE status IN ('draft', 'sent', 'overdue')
              AND due_date <= $1 AND deleted_at IS NULL
            ORDER BY due_date
            "#
        ))
        .bind(due_by)
        .fetch_all(&self.db)
        .await?;

        Ok(invoices)
    }
}
