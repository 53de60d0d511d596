use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use bursar_core::{AppError, StoreError};
use bursar_models::billing::{BillingPeriod, Currency, DueDatePolicy, FeeCycle, FeeCycleKind};
use bursar_models::enrollments::{Enrollment, EnrollmentStatus};
use bursar_models::invoices::{Invoice, InvoiceStatus, NewInvoice, NewInvoiceItem};
use bursar_models::logs::{
    GenerationStatus, GenerationType, InvoiceGenerationLog, NewGenerationLog, RunSummary,
};

use crate::modules::directory::{ClassCatalog, StudentDirectory};
use crate::modules::enrollments::store::EnrollmentStore;
use crate::modules::invoice_generation::log::GenerationLogStore;
use crate::modules::invoices::service::InvoiceService;
use crate::modules::invoices::store::InvoiceStore;
use crate::state::AppState;

/// Outcome of one enrollment's generation attempt. Failures never escape
/// to the batch driver; they are logged and folded into the run summary.
#[derive(Debug)]
pub enum GenerationOutcome {
    Generated(Box<Invoice>),
    Skipped(SkipReason),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The period is already covered by an invoice or a success log row.
    AlreadyBilled,
    /// Today is not the cycle's generation day. The automatic path only
    /// fires on the exact day; manual generation is the escape hatch.
    NotGenerationDay,
}

/// The recurring billing engine: walks active enrollments, applies the
/// period idempotency guard, and asks the invoice lifecycle to generate
/// fee-cycle invoices.
pub struct GenerationService {
    enrollments: Arc<dyn EnrollmentStore>,
    invoices: Arc<dyn InvoiceStore>,
    students: Arc<dyn StudentDirectory>,
    classes: Arc<dyn ClassCatalog>,
    logs: Arc<dyn GenerationLogStore>,
    lifecycle: InvoiceService,
}

impl GenerationService {
    pub fn new(
        enrollments: Arc<dyn EnrollmentStore>,
        invoices: Arc<dyn InvoiceStore>,
        students: Arc<dyn StudentDirectory>,
        classes: Arc<dyn ClassCatalog>,
        logs: Arc<dyn GenerationLogStore>,
        lifecycle: InvoiceService,
    ) -> Self {
        Self {
            enrollments,
            invoices,
            students,
            classes,
            logs,
            lifecycle,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.enrollments.clone(),
            state.invoices.clone(),
            state.students.clone(),
            state.classes.clone(),
            state.generation_logs.clone(),
            InvoiceService::from_state(state),
        )
    }

    /// Sequential sweep over every active enrollment. One enrollment's
    /// failure never aborts the walk.
    #[instrument(skip(self))]
    pub async fn run_sweep(
        &self,
        kind: FeeCycleKind,
        today: NaiveDate,
    ) -> Result<RunSummary, AppError> {
        let enrollments = self
            .enrollments
            .list_active()
            .await
            .map_err(StoreError::into_app_error)?;

        // Per-class cycles would be resolved here; every class currently
        // bills on the default day-1 cycle of the requested kind.
        let cycle = FeeCycle::new(kind);

        let mut summary = RunSummary::default();
        for enrollment in &enrollments {
            match self
                .generate_for_enrollment(enrollment, cycle, today, false)
                .await
            {
                GenerationOutcome::Generated(_) => summary.record_generated(),
                GenerationOutcome::Skipped(_) => summary.record_skipped(),
                GenerationOutcome::Failed => summary.record_failed(),
            }
        }

        info!(
            generated = summary.generated,
            skipped = summary.skipped,
            failed = summary.failed,
            "generation sweep finished"
        );

        Ok(summary)
    }

    /// Manual generation for one student: bypasses the generation-day
    /// check but keeps the period idempotency guard, and logs as `manual`.
    #[instrument(skip(self))]
    pub async fn generate_for_student(
        &self,
        student_id: Uuid,
        kind: FeeCycleKind,
        today: NaiveDate,
    ) -> Result<RunSummary, AppError> {
        self.students
            .find_by_id(student_id)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        let enrollments = self
            .enrollments
            .list_for_student(student_id)
            .await
            .map_err(StoreError::into_app_error)?;

        let cycle = FeeCycle::new(kind);

        let mut summary = RunSummary::default();
        for enrollment in enrollments
            .iter()
            .filter(|e| e.status == EnrollmentStatus::Active)
        {
            match self
                .generate_for_enrollment(enrollment, cycle, today, true)
                .await
            {
                GenerationOutcome::Generated(_) => summary.record_generated(),
                GenerationOutcome::Skipped(_) => summary.record_skipped(),
                GenerationOutcome::Failed => summary.record_failed(),
            }
        }

        Ok(summary)
    }

    /// One enrollment's attempt, isolated: any error is caught, written to
    /// the generation log as `failed` with the error as reason, and folded
    /// into the outcome.
    pub async fn generate_for_enrollment(
        &self,
        enrollment: &Enrollment,
        cycle: FeeCycle,
        today: NaiveDate,
        forced: bool,
    ) -> GenerationOutcome {
        let period = cycle.kind.period_containing(today);
        let generation_type = if forced {
            GenerationType::Manual
        } else {
            cycle.kind.into()
        };

        match self.attempt(enrollment, cycle, today, forced, &period, generation_type).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    ?err,
                    student_id = %enrollment.student_id,
                    class_id = %enrollment.class_id,
                    "invoice generation failed"
                );
                self.append_log(NewGenerationLog {
                    student_id: enrollment.student_id,
                    class_id: enrollment.class_id,
                    invoice_id: None,
                    generation_type,
                    status: GenerationStatus::Failed,
                    reason: Some(err.to_string()),
                    amount: Decimal::ZERO,
                    currency: Currency::default(),
                    period_start: period.start,
                    period_end: period.end,
                })
                .await;
                GenerationOutcome::Failed
            }
        }
    }

    async fn attempt(
        &self,
        enrollment: &Enrollment,
        cycle: FeeCycle,
        today: NaiveDate,
        forced: bool,
        period: &BillingPeriod,
        generation_type: GenerationType,
    ) -> Result<GenerationOutcome, anyhow::Error> {
        let student = self
            .students
            .find_by_id(enrollment.student_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("student {} not found", enrollment.student_id))?;

        let class = self
            .classes
            .find_by_id(enrollment.class_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("class {} not found", enrollment.class_id))?;

        let currency = Currency::from_country(student.country.as_deref());
        let fee = class.fee(currency);

        // Period idempotency: an invoice already linked to the class in
        // this period, or a success log row covering it (the log survives
        // invoice deletion), blocks generation.
        let invoices = self.invoices.list_for_student(enrollment.student_id).await?;
        let billed_in_period = invoices.iter().any(|i| {
            i.links_class(class.id, &class.name) && period.contains(i.generated_date.date_naive())
        });

        if billed_in_period
            || self
                .logs
                .has_success_in_period(enrollment.student_id, class.id, period)
                .await?
        {
            self.append_log(NewGenerationLog {
                student_id: enrollment.student_id,
                class_id: enrollment.class_id,
                invoice_id: None,
                generation_type,
                status: GenerationStatus::Skipped,
                reason: Some("already_billed_in_period".to_string()),
                amount: fee,
                currency,
                period_start: period.start,
                period_end: period.end,
            })
            .await;
            return Ok(GenerationOutcome::Skipped(SkipReason::AlreadyBilled));
        }

        if !forced && !cycle.is_generation_day(today) {
            // Off-day ticks are not generation attempts; logging them
            // would fill the audit table with a row per enrollment per
            // day.
            return Ok(GenerationOutcome::Skipped(SkipReason::NotGenerationDay));
        }

        let description = format!(
            "{} tuition fee for {} ({} - {})",
            cycle_label(cycle.kind),
            class.name,
            period.start,
            period.end
        );

        let new = NewInvoice {
            invoice_number: None,
            student_id: enrollment.student_id,
            parent_id: None,
            class_id: Some(class.id),
            amount: fee,
            currency,
            status: InvoiceStatus::Draft,
            due_date: DueDatePolicy::Recurring.due_date(period.start),
            description: description.clone(),
            original_price: None,
            discount_amount: None,
            items: vec![NewInvoiceItem {
                description,
                quantity: 1,
                unit_price: fee,
            }],
        };

        let invoice = self
            .lifecycle
            .create_with_retry(new)
            .await
            .map_err(|e| e.error)?;

        self.lifecycle.notify_issued(&invoice, &student).await;

        self.append_log(NewGenerationLog {
            student_id: enrollment.student_id,
            class_id: enrollment.class_id,
            invoice_id: Some(invoice.id),
            generation_type,
            status: GenerationStatus::Success,
            reason: None,
            amount: fee,
            currency,
            period_start: period.start,
            period_end: period.end,
        })
        .await;

        Ok(GenerationOutcome::Generated(Box::new(invoice)))
    }

    /// Append to the audit log; a log write failure is itself swallowed so
    /// it can never fail a billing write.
    async fn append_log(&self, new: NewGenerationLog) {
        if let Err(err) = self.logs.append(new).await {
            warn!(?err, "failed to append invoice generation log");
        }
    }

    #[instrument(skip(self))]
    pub async fn logs_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<InvoiceGenerationLog>, AppError> {
        self.logs
            .list_for_student(student_id)
            .await
            .map_err(StoreError::into_app_error)
    }
}

fn cycle_label(kind: FeeCycleKind) -> &'static str {
    match kind {
        FeeCycleKind::Monthly => "Monthly",
        FeeCycleKind::Quarterly => "Quarterly",
        FeeCycleKind::Yearly => "Yearly",
    }
}
