//! Payment-transaction call shapes for the external payment processor.
//!
//! Only the shape the billing core needs: refunds write a negative-amount
//! transaction referencing the original gateway transaction id.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::billing::Currency;

#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct PaymentTransaction {
    pub id: Uuid,
    pub transaction_id: String,
    pub student_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub amount: Decimal,
    pub currency: Currency,
    pub description: String,
    /// Gateway transaction this one reverses, for refunds.
    pub reference_transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentTransaction {
    pub student_id: Uuid,
    pub invoice_id: Option<Uuid>,
    pub amount: Decimal,
    pub currency: Currency,
    pub description: String,
    pub reference_transaction_id: Option<String>,
}
