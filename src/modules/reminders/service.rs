use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use bursar_config::BillingConfig;
use bursar_core::{AppError, StoreError};
use bursar_models::invoices::{Invoice, InvoiceStatus};
use bursar_models::logs::{
    FeeReminderLog, NewFeeReminderLog, ReminderRunSummary, ReminderStatus, ReminderType,
};

use crate::modules::directory::{ParentDirectory, StudentDirectory};
use crate::modules::invoices::store::InvoiceStore;
use crate::modules::notifications::{NotificationDispatcher, ReminderNotice};
use crate::modules::reminders::log::ReminderLogStore;
use crate::state::AppState;

/// Outcome of one invoice's reminder attempt. Mirrors the generation
/// sweep: failures are logged, never thrown to the batch driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOutcome {
    Sent,
    Skipped,
    Failed,
}

/// Scans overdue and upcoming invoices, dispatches reminders through the
/// external notifier, and appends to the reminder log. Also flips
/// past-due draft/sent invoices to `overdue` on the way through.
pub struct ReminderService {
    invoices: Arc<dyn InvoiceStore>,
    students: Arc<dyn StudentDirectory>,
    parents: Arc<dyn ParentDirectory>,
    logs: Arc<dyn ReminderLogStore>,
    notifier: Arc<dyn NotificationDispatcher>,
    config: BillingConfig,
}

impl ReminderService {
    pub fn new(
        invoices: Arc<dyn InvoiceStore>,
        students: Arc<dyn StudentDirectory>,
        parents: Arc<dyn ParentDirectory>,
        logs: Arc<dyn ReminderLogStore>,
        notifier: Arc<dyn NotificationDispatcher>,
        config: BillingConfig,
    ) -> Self {
        Self {
            invoices,
            students,
            parents,
            logs,
            notifier,
            config,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.invoices.clone(),
            state.students.clone(),
            state.parents.clone(),
            state.reminder_logs.clone(),
            state.notifier.clone(),
            state.billing_config.clone(),
        )
    }

    /// Sequential sweep over unpaid invoices due within the upcoming
    /// window or already past due.
    #[instrument(skip(self))]
    pub async fn run_sweep(&self, today: NaiveDate) -> Result<ReminderRunSummary, AppError> {
        let due_by = today
            .checked_add_days(Days::new(self.config.reminder_upcoming_days.max(0) as u64))
            .unwrap_or(today);

        let invoices = self
            .invoices
            .list_unpaid_due_by(due_by)
            .await
            .map_err(StoreError::into_app_error)?;

        let mut summary = ReminderRunSummary::default();
        for invoice in &invoices {
            match self.remind(invoice, today).await {
                ReminderOutcome::Sent => summary.sent += 1,
                ReminderOutcome::Skipped => summary.skipped += 1,
                ReminderOutcome::Failed => summary.failed += 1,
            }
        }

        info!(
            sent = summary.sent,
            skipped = summary.skipped,
            failed = summary.failed,
            "reminder sweep finished"
        );

        Ok(summary)
    }

    /// One invoice's reminder, isolated from the rest of the sweep.
    pub async fn remind(&self, invoice: &Invoice, today: NaiveDate) -> ReminderOutcome {
        match self.attempt(invoice, today).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    ?err,
                    invoice = %invoice.invoice_number,
                    "fee reminder attempt failed"
                );
                ReminderOutcome::Failed
            }
        }
    }

    async fn attempt(
        &self,
        invoice: &Invoice,
        today: NaiveDate,
    ) -> Result<ReminderOutcome, anyhow::Error> {
        let overdue = invoice.due_date < today;

        // Past-due draft/sent invoices become overdue before anyone is
        // notified; the conditional update makes the transition safe under
        // concurrent payment.
        let invoice = if overdue
            && matches!(invoice.status, InvoiceStatus::Draft | InvoiceStatus::Sent)
        {
            self.invoices
                .mark_overdue(invoice.id)
                .await?
                .unwrap_or_else(|| invoice.clone())
        } else {
            invoice.clone()
        };

        // Repeat-window idempotency: one reminder per invoice per window,
        // no matter how often the sweep runs.
        if let Some(last) = self.logs.last_attempt_at(invoice.id).await? {
            let elapsed = today
                .signed_duration_since(last.date_naive())
                .num_days();
            if elapsed < self.config.reminder_repeat_days {
                return Ok(ReminderOutcome::Skipped);
            }
        }

        let student = self
            .students
            .find_by_id(invoice.student_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("student {} not found", invoice.student_id))?;

        let parent = self.parents.find_by_student_id(student.id).await?;
        let recipient = parent
            .as_ref()
            .map(|p| p.email.clone())
            .unwrap_or_else(|| student.email.clone());

        let message = if overdue {
            format!(
                "Invoice {} for {} {} was due on {}. Please settle it at your \
                 earliest convenience.",
                invoice.invoice_number,
                invoice.amount,
                invoice.currency.as_str(),
                invoice.due_date
            )
        } else {
            format!(
                "Invoice {} for {} {} is due on {}.",
                invoice.invoice_number,
                invoice.amount,
                invoice.currency.as_str(),
                invoice.due_date
            )
        };

        let notice = ReminderNotice {
            student_name: student.name.clone(),
            recipient: recipient.clone(),
            invoice_number: invoice.invoice_number.clone(),
            amount: invoice.amount,
            currency: invoice.currency,
            due_date: invoice.due_date,
            overdue,
            message: message.clone(),
        };

        let (status, sent_at, error_message, outcome) =
            match self.notifier.fee_reminder(&notice).await {
                Ok(()) => (
                    ReminderStatus::Sent,
                    Some(Utc::now()),
                    None,
                    ReminderOutcome::Sent,
                ),
                Err(err) => {
                    warn!(?err, invoice = %invoice.invoice_number, "reminder dispatch failed");
                    (
                        ReminderStatus::Failed,
                        None,
                        Some(err.to_string()),
                        ReminderOutcome::Failed,
                    )
                }
            };

        self.append_log(NewFeeReminderLog {
            student_id: invoice.student_id,
            parent_id: parent.map(|p| p.id),
            invoice_id: Some(invoice.id),
            reminder_type: ReminderType::Email,
            status,
            message,
            recipient,
            sent_at,
            error_message,
        })
        .await;

        Ok(outcome)
    }

    async fn append_log(&self, new: NewFeeReminderLog) {
        if let Err(err) = self.logs.append(new).await {
            warn!(?err, "failed to append fee reminder log");
        }
    }

    #[instrument(skip(self))]
    pub async fn logs_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<FeeReminderLog>, AppError> {
        self.logs
            .list_for_student(student_id)
            .await
            .map_err(StoreError::into_app_error)
    }
}
