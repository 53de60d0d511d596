use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{instrument, warn};
use uuid::Uuid;

use bursar_core::{AppError, StoreError};
use bursar_models::billing::{Currency, DueDatePolicy};
use bursar_models::checkout::{CheckoutDto, CheckoutSummary};
use bursar_models::directory::{NewParentRecord, NewStudentRecord, ParentRecord, StudentRecord};
use bursar_models::enrollments::EnrollmentStatus;
use bursar_models::invoices::{InvoiceRef, InvoiceStatus, NewInvoice, NewInvoiceItem};

use crate::modules::directory::{ClassCatalog, ParentDirectory, StudentDirectory};
use crate::modules::enrollments::store::EnrollmentStore;
use crate::modules::invoices::service::InvoiceService;
use crate::modules::notifications::{CheckoutNotice, NotificationDispatcher};
use crate::state::AppState;

/// Turns a cart of course selections into enrollments plus draft invoices
/// in one pass. Checkout is idempotent with respect to already-owned
/// courses: those cart items are skipped silently while the rest proceed.
pub struct CheckoutService {
    students: Arc<dyn StudentDirectory>,
    parents: Arc<dyn ParentDirectory>,
    classes: Arc<dyn ClassCatalog>,
    enrollments: Arc<dyn EnrollmentStore>,
    notifier: Arc<dyn NotificationDispatcher>,
    lifecycle: InvoiceService,
}

impl CheckoutService {
    pub fn new(
        students: Arc<dyn StudentDirectory>,
        parents: Arc<dyn ParentDirectory>,
        classes: Arc<dyn ClassCatalog>,
        enrollments: Arc<dyn EnrollmentStore>,
        notifier: Arc<dyn NotificationDispatcher>,
        lifecycle: InvoiceService,
    ) -> Self {
        Self {
            students,
            parents,
            classes,
            enrollments,
            notifier,
            lifecycle,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.students.clone(),
            state.parents.clone(),
            state.classes.clone(),
            state.enrollments.clone(),
            state.notifier.clone(),
            InvoiceService::from_state(state),
        )
    }

    #[instrument(skip(self, dto))]
    pub async fn create_checkout(
        &self,
        dto: CheckoutDto,
        user_id: Option<Uuid>,
    ) -> Result<CheckoutSummary, AppError> {
        if dto.items.is_empty() {
            return Err(AppError::unprocessable_fields(
                anyhow::anyhow!("cart is empty"),
                [("cart", "cart_empty")],
            ));
        }

        let student = self.resolve_student(&dto, user_id).await?;
        let parent = self.resolve_parent(&dto, &student).await?;
        let parent_id = parent.as_ref().map(|p| p.id);

        let currency = dto
            .currency
            .unwrap_or_else(|| Currency::from_country(student.country.as_deref()));
        let due_date = DueDatePolicy::Checkout.due_date(Utc::now().date_naive());

        let mut enrollment_ids = Vec::new();
        let mut invoices: Vec<InvoiceRef> = Vec::new();
        let mut skipped_class_ids = Vec::new();
        let mut total = Decimal::ZERO;

        for item in &dto.items {
            let class = self
                .classes
                .find_by_id(item.class_id)
                .await
                .map_err(StoreError::into_app_error)?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

            // Already-owned courses are skipped, not failed; the rest of
            // the cart still processes.
            if self
                .enrollments
                .find_open(student.id, class.id)
                .await
                .map_err(StoreError::into_app_error)?
                .is_some()
            {
                skipped_class_ids.push(class.id);
                continue;
            }

            let enrollment = match self
                .enrollments
                .insert(student.id, class.id, EnrollmentStatus::PendingPayment)
                .await
            {
                Ok(enrollment) => enrollment,
                // A concurrent checkout won the race for this class; same
                // skip as the pre-check.
                Err(StoreError::AlreadyEnrolled) => {
                    skipped_class_ids.push(class.id);
                    continue;
                }
                Err(err) => return Err(err.into_app_error()),
            };

            let list_price = class.fee(currency);
            let price = item.price.unwrap_or(list_price);
            if price < Decimal::ZERO {
                return Err(AppError::unprocessable_fields(
                    anyhow::anyhow!("cart price may not be negative"),
                    [("price", "price_negative")],
                ));
            }

            let (original_price, discount_amount) = if price < list_price {
                (Some(list_price), Some(list_price - price))
            } else {
                (None, None)
            };

            let description = format!("Enrollment fee for {}", class.name);
            let new = NewInvoice {
                invoice_number: None,
                student_id: student.id,
                parent_id,
                class_id: Some(class.id),
                amount: price,
                currency,
                status: InvoiceStatus::Draft,
                due_date,
                description: description.clone(),
                original_price,
                discount_amount,
                items: vec![NewInvoiceItem {
                    description,
                    quantity: 1,
                    unit_price: price,
                }],
            };

            let invoice = self.lifecycle.create_with_retry(new).await?;
            self.lifecycle.notify_issued(&invoice, &student).await;

            total += price;
            enrollment_ids.push(enrollment.id);
            invoices.push(InvoiceRef::from(&invoice));
        }

        // Guest checkout gets a best-effort confirmation; its failure
        // never rolls anything back.
        if user_id.is_none() {
            let notice = CheckoutNotice {
                student_name: student.name.clone(),
                recipient: student.email.clone(),
                invoice_numbers: invoices.iter().map(|i| i.invoice_number.clone()).collect(),
                total,
                currency,
            };
            if let Err(err) = self.notifier.guest_checkout(&notice).await {
                warn!(?err, student_id = %student.id, "guest checkout notification failed");
            }
        }

        Ok(CheckoutSummary {
            student_id: student.id,
            parent_id,
            currency,
            enrollment_ids,
            invoices,
            skipped_class_ids,
            total,
        })
    }

    /// Resolution order: explicit id, authenticated user, email lookup,
    /// then creation from the supplied profile.
    async fn resolve_student(
        &self,
        dto: &CheckoutDto,
        user_id: Option<Uuid>,
    ) -> Result<StudentRecord, AppError> {
        if let Some(id) = dto.student_id {
            return self
                .students
                .find_by_id(id)
                .await
                .map_err(StoreError::into_app_error)?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        if let Some(user_id) = user_id {
            if let Some(student) = self
                .students
                .find_by_user_id(user_id)
                .await
                .map_err(StoreError::into_app_error)?
            {
                return Ok(student);
            }
        }

        let Some(email) = dto.email.as_deref() else {
            return Err(AppError::unprocessable_fields(
                anyhow::anyhow!("checkout needs a student id, a signed-in user, or an email"),
                [("student", "student_unresolvable")],
            ));
        };

        if let Some(student) = self
            .students
            .find_by_email(email)
            .await
            .map_err(StoreError::into_app_error)?
        {
            return Ok(student);
        }

        let Some(name) = dto.name.clone() else {
            return Err(AppError::unprocessable_fields(
                anyhow::anyhow!("creating a student requires a name"),
                [("name", "name_required")],
            ));
        };

        self.students
            .create(NewStudentRecord {
                name,
                email: email.to_string(),
                country: dto.country.clone(),
                user_id,
                phone: dto.phone.clone(),
            })
            .await
            .map_err(StoreError::into_app_error)
    }

    /// Resolve or create the parent named in the checkout and link it to
    /// the student. No parent email means no parent involvement.
    async fn resolve_parent(
        &self,
        dto: &CheckoutDto,
        student: &StudentRecord,
    ) -> Result<Option<ParentRecord>, AppError> {
        let Some(parent_email) = dto.parent_email.as_deref() else {
            return Ok(None);
        };

        let parent = match self
            .parents
            .find_by_email(parent_email)
            .await
            .map_err(StoreError::into_app_error)?
        {
            Some(parent) => parent,
            None => {
                let Some(name) = dto.parent_name.clone() else {
                    return Err(AppError::unprocessable_fields(
                        anyhow::anyhow!("creating a parent requires a name"),
                        [("parent_name", "parent_name_required")],
                    ));
                };
                self.parents
                    .create(NewParentRecord {
                        name,
                        email: parent_email.to_string(),
                        phone: None,
                    })
                    .await
                    .map_err(StoreError::into_app_error)?
            }
        };

        self.parents
            .link_student(parent.id, student.id)
            .await
            .map_err(StoreError::into_app_error)?;

        Ok(Some(parent))
    }
}
