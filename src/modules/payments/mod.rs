//! Payment-processor collaborator.
//!
//! The billing core only needs two calls: write a transaction (refunds
//! write a negative amount) and look one up by its gateway id. The
//! Postgres implementation records rows in `payment_transactions`; a real
//! gateway adapter would implement the same trait.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use bursar_core::StoreError;
use bursar_models::payments::{NewPaymentTransaction, PaymentTransaction};

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_transaction(
        &self,
        new: NewPaymentTransaction,
    ) -> Result<PaymentTransaction, StoreError>;

    async fn get_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<PaymentTransaction>, StoreError>;
}

#[derive(Clone)]
pub struct PgPaymentProcessor {
    db: PgPool,
}

impl PgPaymentProcessor {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentProcessor for PgPaymentProcessor {
    async fn create_transaction(
        &self,
        new: NewPaymentTransaction,
    ) -> Result<PaymentTransaction, StoreError> {
        let transaction_id = format!("txn_{}", Uuid::new_v4().simple());

        let transaction = sqlx::query_as::<_, PaymentTransaction>(
            r#"
            INSERT INTO payment_transactions
                (transaction_id, student_id, invoice_id, amount, currency, description,
                 reference_transaction_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, transaction_id, student_id, invoice_id, amount, currency,
                      description, reference_transaction_id, created_at
            "#,
        )
        .bind(transaction_id)
        .bind(new.student_id)
        .bind(new.invoice_id)
        .bind(new.amount)
        .bind(new.currency)
        .bind(new.description)
        .bind(new.reference_transaction_id)
        .fetch_one(&self.db)
        .await?;

        Ok(transaction)
    }

    async fn get_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<PaymentTransaction>, StoreError> {
        let transaction = sqlx::query_as::<_, PaymentTransaction>(
            r#"
            SELECT id, transaction_id, student_id, invoice_id, amount, currency,
                   description, reference_transaction_id, created_at
            FROM payment_transactions
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(transaction)
    }
}
