//! Outbound notification dispatch.
//!
//! Every notification in the billing core is fire-and-forget: callers
//! invoke the dispatcher, log a warning on failure, and move on. Billing
//! writes never depend on delivery succeeding. The SMTP-backed
//! implementation lives in [`email`]; tests substitute a recording fake.

pub mod email;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use bursar_models::billing::Currency;

/// Payload for enrollment-created notifications.
#[derive(Debug, Clone)]
pub struct EnrollmentNotice {
    pub student_name: String,
    pub recipient: String,
    pub class_name: String,
}

/// Payload for invoice-generated and payment-confirmation notifications.
#[derive(Debug, Clone)]
pub struct InvoiceNotice {
    pub student_name: String,
    pub recipient: String,
    pub invoice_number: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub due_date: NaiveDate,
    pub description: String,
}

/// Payload for guest-checkout confirmations.
#[derive(Debug, Clone)]
pub struct CheckoutNotice {
    pub student_name: String,
    pub recipient: String,
    pub invoice_numbers: Vec<String>,
    pub total: Decimal,
    pub currency: Currency,
}

/// Payload for fee reminders.
#[derive(Debug, Clone)]
pub struct ReminderNotice {
    pub student_name: String,
    pub recipient: String,
    pub invoice_number: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub due_date: NaiveDate,
    pub overdue: bool,
    pub message: String,
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn enrollment_created(&self, notice: &EnrollmentNotice) -> anyhow::Result<()>;

    async fn invoice_generated(&self, notice: &InvoiceNotice) -> anyhow::Result<()>;

    async fn payment_confirmed(&self, notice: &InvoiceNotice) -> anyhow::Result<()>;

    async fn guest_checkout(&self, notice: &CheckoutNotice) -> anyhow::Result<()>;

    async fn fee_reminder(&self, notice: &ReminderNotice) -> anyhow::Result<()>;
}
