use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use bursar_core::{AppError, StoreError};
use bursar_models::access::AccessDecision;
use bursar_models::enrollments::Enrollment;

use crate::modules::access_control::decision;
use crate::modules::directory::ClassCatalog;
use crate::modules::enrollments::store::EnrollmentStore;
use crate::modules::invoices::store::InvoiceStore;
use crate::state::AppState;

/// The payment gate: a read-only consumer of the enrollment ledger and
/// invoice state, invoked synchronously on access checks.
pub struct AccessService {
    enrollments: Arc<dyn EnrollmentStore>,
    invoices: Arc<dyn InvoiceStore>,
    classes: Arc<dyn ClassCatalog>,
}

impl AccessService {
    pub fn new(
        enrollments: Arc<dyn EnrollmentStore>,
        invoices: Arc<dyn InvoiceStore>,
        classes: Arc<dyn ClassCatalog>,
    ) -> Self {
        Self {
            enrollments,
            invoices,
            classes,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.enrollments.clone(),
            state.invoices.clone(),
            state.classes.clone(),
        )
    }

    /// Evaluate the decision table for (student, class).
    #[instrument(skip(self))]
    pub async fn check_access(
        &self,
        student_id: Uuid,
        class_id: Uuid,
    ) -> Result<AccessDecision, AppError> {
        let class = self
            .classes
            .find_by_id(class_id)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

        let enrollment = self
            .enrollments
            .find_open(student_id, class_id)
            .await
            .map_err(StoreError::into_app_error)?;

        let invoices = self
            .invoices
            .list_for_student(student_id)
            .await
            .map_err(StoreError::into_app_error)?;

        let snapshot = decision::payment_snapshot(&invoices, class_id, &class.name);

        Ok(decision::evaluate(enrollment.as_ref(), &snapshot))
    }

    /// Flip the admin bypass flag on the enrollment; invoices are
    /// untouched.
    #[instrument(skip(self))]
    pub async fn toggle_admin_access(
        &self,
        student_id: Uuid,
        class_id: Uuid,
        enabled: bool,
    ) -> Result<Enrollment, AppError> {
        self.enrollments
            .set_admin_access(student_id, class_id, enabled)
            .await
            .map_err(StoreError::into_app_error)
    }
}
