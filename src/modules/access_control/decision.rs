//! The payment-gate decision table.
//!
//! Access is a pure function of (enrollment?, payment snapshot); nothing
//! here touches storage, so the table is exhaustively testable. The
//! enrollment's `active` transition and a fee invoice's generation happen
//! in no fixed order relative to each other — every combination of the two
//! has a defined row below.

use uuid::Uuid;

use bursar_models::access::{AccessDecision, PaymentSnapshot};
use bursar_models::enrollments::{Enrollment, EnrollmentStatus};
use bursar_models::invoices::{Invoice, InvoiceRef, InvoiceStatus};

/// Status string reported when no enrollment record exists.
pub const NOT_ENROLLED: &str = "not_enrolled";

/// What the gate knows about a student's invoices for one class: the
/// first paid match and the first open (draft/sent) match. Linkage is the
/// `class_id` foreign key, falling back to description-contains-class-name
/// for legacy rows.
pub fn payment_snapshot(
    invoices: &[Invoice],
    class_id: Uuid,
    class_name: &str,
) -> PaymentSnapshot {
    let paid = invoices
        .iter()
        .find(|i| i.status == InvoiceStatus::Paid && i.links_class(class_id, class_name))
        .map(InvoiceRef::from);

    let unpaid = invoices
        .iter()
        .find(|i| {
            matches!(i.status, InvoiceStatus::Draft | InvoiceStatus::Sent)
                && i.links_class(class_id, class_name)
        })
        .map(InvoiceRef::from);

    PaymentSnapshot { paid, unpaid }
}

/// Evaluate the decision table, in strict order:
///
/// 1. no enrollment → denied, payment required, status `not_enrolled`;
/// 2. admin override → allowed unconditionally (`is_paid` still reports
///    the real lookup);
/// 3. active + paid → allowed;
/// 4. pending payment → denied, payment required, surfacing the
///    paid-or-else-unpaid invoice;
/// 5. everything else → denied; payment is required only while the
///    enrollment could still become payable (active-unpaid, inactive).
pub fn evaluate(enrollment: Option<&Enrollment>, payment: &PaymentSnapshot) -> AccessDecision {
    let Some(enrollment) = enrollment else {
        return AccessDecision {
            has_access: false,
            is_paid: false,
            requires_payment: true,
            enrollment_status: NOT_ENROLLED.to_string(),
            invoice: None,
        };
    };

    let is_paid = payment.is_paid();
    let enrollment_status = enrollment.status.as_str().to_string();

    if enrollment.admin_granted_access {
        return AccessDecision {
            has_access: true,
            is_paid,
            requires_payment: false,
            enrollment_status,
            invoice: payment.most_relevant(),
        };
    }

    match enrollment.status {
        EnrollmentStatus::Active if is_paid => AccessDecision {
            has_access: true,
            is_paid: true,
            requires_payment: false,
            enrollment_status,
            invoice: payment.paid.clone(),
        },
        EnrollmentStatus::Active | EnrollmentStatus::PendingPayment => AccessDecision {
            has_access: false,
            is_paid,
            requires_payment: true,
            enrollment_status,
            invoice: payment.most_relevant(),
        },
        EnrollmentStatus::Inactive => AccessDecision {
            has_access: false,
            is_paid,
            requires_payment: true,
            enrollment_status,
            invoice: payment.most_relevant(),
        },
        EnrollmentStatus::Completed | EnrollmentStatus::Dropped => AccessDecision {
            has_access: false,
            is_paid,
            requires_payment: false,
            enrollment_status,
            invoice: None,
        },
    }
}
