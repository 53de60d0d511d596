use std::sync::Arc;

use tracing::{instrument, warn};
use uuid::Uuid;

use bursar_core::{AppError, StoreError};
use bursar_models::enrollments::{CreateEnrollmentDto, Enrollment, EnrollmentStatus};

use crate::modules::directory::{ClassCatalog, StudentDirectory};
use crate::modules::enrollments::store::EnrollmentStore;
use crate::modules::notifications::{EnrollmentNotice, NotificationDispatcher};
use crate::state::AppState;

/// The enrollment ledger: owns enrollment records and their status
/// transitions. No billing policy lives here.
pub struct EnrollmentService {
    store: Arc<dyn EnrollmentStore>,
    students: Arc<dyn StudentDirectory>,
    classes: Arc<dyn ClassCatalog>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl EnrollmentService {
    pub fn new(
        store: Arc<dyn EnrollmentStore>,
        students: Arc<dyn StudentDirectory>,
        classes: Arc<dyn ClassCatalog>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            store,
            students,
            classes,
            notifier,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.enrollments.clone(),
            state.students.clone(),
            state.classes.clone(),
            state.notifier.clone(),
        )
    }

    /// Direct enroll call (outside checkout). The enrollment starts in
    /// `pending_payment`; the payment gate keeps the course closed until an
    /// invoice is paid or an admin grants access.
    #[instrument(skip(self))]
    pub async fn enroll(&self, dto: CreateEnrollmentDto) -> Result<Enrollment, AppError> {
        let student = self
            .students
            .find_by_id(dto.student_id)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        let class = self
            .classes
            .find_by_id(dto.class_id)
            .await
            .map_err(StoreError::into_app_error)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

        let enrollment = self
            .store
            .insert(dto.student_id, dto.class_id, EnrollmentStatus::PendingPayment)
            .await
            .map_err(StoreError::into_app_error)?;

        let notice = EnrollmentNotice {
            student_name: student.name,
            recipient: student.email,
            class_name: class.name,
        };
        if let Err(err) = self.notifier.enrollment_created(&notice).await {
            warn!(?err, enrollment_id = %enrollment.id, "enrollment notification failed");
        }

        Ok(enrollment)
    }

    #[instrument(skip(self))]
    pub async fn activate(&self, id: Uuid) -> Result<Enrollment, AppError> {
        self.store
            .set_status(id, EnrollmentStatus::Active)
            .await
            .map_err(StoreError::into_app_error)
    }

    /// Removal is a soft transition to `dropped`; the row (and its history)
    /// stays behind.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<Enrollment, AppError> {
        self.store
            .set_status(id, EnrollmentStatus::Dropped)
            .await
            .map_err(StoreError::into_app_error)
    }

    #[instrument(skip(self))]
    pub async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Enrollment>, AppError> {
        self.store
            .list_for_student(student_id)
            .await
            .map_err(StoreError::into_app_error)
    }
}
