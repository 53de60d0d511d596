//! Invoice domain models and DTOs.
//!
//! Invoices are the single money-bearing entity of the billing core. Every
//! invoice carries a year-scoped `INV-<year>-<seq>` number that is never
//! reused, including by soft-deleted rows. The optional `class_id` is the
//! primary linkage to the class being billed; the `description` containing
//! the class name is kept as a compatibility fallback for legacy rows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::billing::Currency;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type, Default,
)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
    Refunded,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Statuses still awaiting payment. Cancelled and refunded invoices are
    /// settled, not unpaid.
    pub fn is_unpaid(&self) -> bool {
        matches!(self, Self::Draft | Self::Sent | Self::Overdue)
    }
}

/// An invoice aggregate: the header row plus its line items.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub student_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub amount: Decimal,
    pub currency: Currency,
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    pub generated_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub description: String,
    pub original_price: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub payment_proof_url: Option<String>,
    pub notes: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether this invoice bills the given class: FK linkage first,
    /// description-contains-class-name as the legacy fallback.
    pub fn links_class(&self, class_id: Uuid, class_name: &str) -> bool {
        match self.class_id {
            Some(id) => id == class_id,
            None => !class_name.is_empty() && self.description.contains(class_name),
        }
    }
}

/// A line item belonging to an invoice.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

/// Input for the invoice store. `invoice_number` is `None` in the common
/// case; the store allocates one inside the insert transaction.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_number: Option<String>,
    pub student_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub amount: Decimal,
    pub currency: Currency,
    pub status: InvoiceStatus,
    pub due_date: NaiveDate,
    pub description: String,
    pub original_price: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub items: Vec<NewInvoiceItem>,
}

#[derive(Debug, Clone)]
pub struct NewInvoiceItem {
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl NewInvoiceItem {
    pub fn amount(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// DTO for creating an invoice directly (admin/manual path).
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateInvoiceDto {
    pub student_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    /// Explicit number override; normally absent so the allocator assigns one.
    #[validate(length(min = 1, max = 50))]
    pub invoice_number: Option<String>,
    pub amount: Decimal,
    pub currency: Option<Currency>,
    pub due_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    #[serde(default)]
    pub items: Vec<CreateInvoiceItemDto>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateInvoiceItemDto {
    #[validate(length(min = 1, max = 200))]
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// DTO for marking an invoice paid.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct MarkPaidDto {
    #[validate(length(min = 1, max = 50))]
    pub payment_method: String,
    #[validate(length(min = 1, max = 100))]
    pub transaction_id: String,
}

/// DTO for refunding a paid invoice. A missing amount refunds in full.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct RefundDto {
    pub amount: Option<Decimal>,
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// DTO for attaching a payment proof to a student's latest unpaid invoice.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct AttachProofDto {
    #[validate(url)]
    pub proof_url: String,
}

/// Compact reference surfaced by access checks and checkout summaries.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct InvoiceRef {
    pub id: Uuid,
    pub invoice_number: String,
    pub status: InvoiceStatus,
}

impl From<&Invoice> for InvoiceRef {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number.clone(),
            status: invoice.status,
        }
    }
}
