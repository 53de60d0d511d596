use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{instrument, warn};
use uuid::Uuid;

use bursar_core::{AppError, StoreError};
use bursar_models::billing::DueDatePolicy;
use bursar_models::directory::StudentRecord;
use bursar_models::invoices::{
    CreateInvoiceDto, Invoice, InvoiceStatus, MarkPaidDto, NewInvoice, NewInvoiceItem, RefundDto,
};
use bursar_models::payments::NewPaymentTransaction;

use crate::modules::directory::{ParentDirectory, StudentDirectory};
use crate::modules::invoices::store::InvoiceStore;
use crate::modules::notifications::{InvoiceNotice, NotificationDispatcher};
use crate::modules::payments::PaymentProcessor;
use crate::state::AppState;

/// Attempts before an invoice-number conflict becomes a business-rule
/// failure.
pub const MAX_CREATE_ATTEMPTS: u32 = 5;

/// Linear backoff step between attempts: attempt `n` sleeps `n × 50ms`.
pub const CREATE_BACKOFF_STEP: Duration = Duration::from_millis(50);

/// The invoice lifecycle: creation (with number allocation and conflict
/// retry), payment, refund, and proof attachment.
pub struct InvoiceService {
    store: Arc<dyn InvoiceStore>,
    students: Arc<dyn StudentDirectory>,
    parents: Arc<dyn ParentDirectory>,
    notifier: Arc<dyn NotificationDispatcher>,
    payments: Arc<dyn PaymentProcessor>,
}

impl InvoiceService {
    pub fn new(
        store: Arc<dyn InvoiceStore>,
        students: Arc<dyn StudentDirectory>,
        parents: Arc<dyn ParentDirectory>,
        notifier: Arc<dyn NotificationDispatcher>,
        payments: Arc<dyn PaymentProcessor>,
    ) -> Self {
        Self {
            store,
            students,
            parents,
            notifier,
            payments,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.invoices.clone(),
            state.students.clone(),
            state.parents.clone(),
            state.notifier.clone(),
            state.payments.clone(),
        )
    }

    /// Create an invoice from the admin/manual DTO. Validates the
    /// referenced student (and parent, if given), allocates a number when
    /// none is supplied, and fires a best-effort issued notification.
    #[instrument(skip(self, dto))]
    pub async fn create(&self, dto: CreateInvoiceDto) -> Result<Invoice, AppError> {
        if dto.amount <= Decimal::ZERO {
            return Err(AppError::unprocessable_fields(
                anyhow::anyhow!("invoice amount must be positive"),
                [("amount", "amount_not_positive")],
            ));
        }

        let student = self
            .students
            .find_by_id(dto.student_id)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        if let Some(parent_id) = dto.parent_id {
            self.parents
                .find_by_student_id(dto.student_id)
                .await
                .map_err(StoreError::into_app_error)?
                .filter(|p| p.id == parent_id)
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Parent not found")))?;
        }

        let items = if dto.items.is_empty() {
            // A header-only request still gets one line item so the
            // aggregate always itemizes its amount.
            vec![NewInvoiceItem {
                description: dto.description.clone(),
                quantity: 1,
                unit_price: dto.amount,
            }]
        } else {
            dto.items
                .into_iter()
                .map(|item| NewInvoiceItem {
                    description: item.description,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect()
        };

        let new = NewInvoice {
            invoice_number: dto.invoice_number,
            student_id: dto.student_id,
            parent_id: dto.parent_id,
            class_id: dto.class_id,
            amount: dto.amount,
            currency: dto.currency.unwrap_or_default(),
            status: InvoiceStatus::Draft,
            due_date: dto
                .due_date
                .unwrap_or_else(|| DueDatePolicy::Checkout.due_date(Utc::now().date_naive())),
            description: dto.description,
            original_price: None,
            discount_amount: None,
            items,
        };

        let invoice = self.create_with_retry(new).await?;
        self.notify_issued(&invoice, &student).await;

        Ok(invoice)
    }

    /// Allocation + insert with bounded retry. Only the invoice-number
    /// uniqueness conflict is retried: the caller-supplied number (if any)
    /// is cleared so the next attempt allocates fresh, and the loop backs
    /// off linearly. Every other error surfaces immediately; exhaustion
    /// surfaces as a 422, never as a silently dropped or duplicated
    /// invoice.
    #[instrument(skip(self, new), fields(student_id = %new.student_id))]
    pub async fn create_with_retry(&self, mut new: NewInvoice) -> Result<Invoice, AppError> {
        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            match self.store.create(new.clone()).await {
                Ok(invoice) => return Ok(invoice),
                Err(StoreError::DuplicateInvoiceNumber) => {
                    warn!(attempt, "invoice number conflict, retrying with fresh allocation");
                    new.invoice_number = None;
                    if attempt < MAX_CREATE_ATTEMPTS {
                        tokio::time::sleep(CREATE_BACKOFF_STEP * attempt).await;
                    }
                }
                Err(err) => return Err(err.into_app_error()),
            }
        }

        Err(StoreError::DuplicateInvoiceNumber.into_app_error())
    }

    /// Best-effort issued notification; failures are logged and swallowed.
    pub async fn notify_issued(&self, invoice: &Invoice, student: &StudentRecord) {
        let notice = InvoiceNotice {
            student_name: student.name.clone(),
            recipient: student.email.clone(),
            invoice_number: invoice.invoice_number.clone(),
            amount: invoice.amount,
            currency: invoice.currency,
            due_date: invoice.due_date,
            description: invoice.description.clone(),
        };
        if let Err(err) = self.notifier.invoice_generated(&notice).await {
            warn!(?err, invoice = %invoice.invoice_number, "invoice notification failed");
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<Invoice, AppError> {
        self.store
            .get(id)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Invoice not found")))
    }

    #[instrument(skip(self))]
    pub async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Invoice>, AppError> {
        self.store
            .list_for_student(student_id)
            .await
            .map_err(StoreError::into_app_error)
    }

    /// Mark an invoice paid. The only guard is existence: re-marking a
    /// paid invoice succeeds and re-stamps the paid date.
    #[instrument(skip(self, dto))]
    pub async fn mark_as_paid(&self, id: Uuid, dto: MarkPaidDto) -> Result<Invoice, AppError> {
        let invoice = self
            .store
            .mark_paid(id, &dto.payment_method, &dto.transaction_id)
            .await
            .map_err(StoreError::into_app_error)?;

        if let Ok(Some(student)) = self.students.find_by_id(invoice.student_id).await {
            let notice = InvoiceNotice {
                student_name: student.name,
                recipient: student.email,
                invoice_number: invoice.invoice_number.clone(),
                amount: invoice.amount,
                currency: invoice.currency,
                due_date: invoice.due_date,
                description: invoice.description.clone(),
            };
            if let Err(err) = self.notifier.payment_confirmed(&notice).await {
                warn!(?err, invoice = %invoice.invoice_number, "payment confirmation failed");
            }
        }

        Ok(invoice)
    }

    /// Refund a paid invoice: requires paid status and a stored
    /// transaction id, writes a negative-amount transaction through the
    /// payment processor, then flips the invoice to `refunded` with a
    /// note. A non-refundable invoice fails before any transaction is
    /// written.
    #[instrument(skip(self, dto))]
    pub async fn refund(&self, id: Uuid, dto: RefundDto) -> Result<Invoice, AppError> {
        let invoice = self.get(id).await?;

        if invoice.status != InvoiceStatus::Paid {
            return Err(AppError::unprocessable_fields(
                anyhow::anyhow!("only paid invoices can be refunded"),
                [("invoice", "refund_requires_paid_invoice")],
            ));
        }

        let Some(original_txn) = invoice.transaction_id.clone() else {
            return Err(AppError::unprocessable_fields(
                anyhow::anyhow!("invoice has no transaction to refund"),
                [("invoice", "missing_transaction_id")],
            ));
        };

        let amount = dto.amount.unwrap_or(invoice.amount);
        if amount <= Decimal::ZERO || amount > invoice.amount {
            return Err(AppError::unprocessable_fields(
                anyhow::anyhow!("refund amount out of range"),
                [("amount", "refund_amount_invalid")],
            ));
        }

        self.payments
            .create_transaction(NewPaymentTransaction {
                student_id: invoice.student_id,
                invoice_id: Some(invoice.id),
                amount: -amount,
                currency: invoice.currency,
                description: format!(
                    "Refund for invoice {}: {}",
                    invoice.invoice_number, dto.reason
                ),
                reference_transaction_id: Some(original_txn),
            })
            .await
            .map_err(StoreError::into_app_error)?;

        let note = format!(
            "Refunded {} {}: {}",
            amount,
            invoice.currency.as_str(),
            dto.reason
        );

        // Conditional on still being paid; a concurrent second refund
        // loses the race here and reports the same 422 as an unpaid
        // invoice would.
        self.store.mark_refunded(id, &note).await.map_err(|err| match err {
            StoreError::NotFound => AppError::unprocessable_fields(
                anyhow::anyhow!("only paid invoices can be refunded"),
                [("invoice", "refund_requires_paid_invoice")],
            ),
            other => other.into_app_error(),
        })
    }

    /// Attach a payment proof to the student's most recently created
    /// unpaid invoice. No unpaid invoice is a no-op, not an error.
    #[instrument(skip(self))]
    pub async fn attach_proof_to_latest_unpaid(
        &self,
        student_id: Uuid,
        proof_url: &str,
    ) -> Result<Option<Invoice>, AppError> {
        let invoices = self
            .store
            .list_for_student(student_id)
            .await
            .map_err(StoreError::into_app_error)?;

        let latest_unpaid = invoices
            .iter()
            .filter(|i| i.status.is_unpaid())
            .max_by_key(|i| i.created_at);

        match latest_unpaid {
            Some(invoice) => {
                let updated = self
                    .store
                    .attach_proof(invoice.id, proof_url)
                    .await
                    .map_err(StoreError::into_app_error)?;
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    /// Soft delete; the invoice number stays burned for the allocator.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.store
            .soft_delete(id)
            .await
            .map_err(StoreError::into_app_error)
    }
}
