//! Access-decision models for the payment gate.

use serde::Serialize;
use utoipa::ToSchema;

use crate::invoices::InvoiceRef;

/// What the payment gate knows about a student's invoices for one class:
/// the first paid match and the first open (draft/sent) match, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentSnapshot {
    pub paid: Option<InvoiceRef>,
    pub unpaid: Option<InvoiceRef>,
}

impl PaymentSnapshot {
    pub fn is_paid(&self) -> bool {
        self.paid.is_some()
    }

    /// The invoice reference worth surfacing to the caller: the paid one if
    /// it exists, otherwise the open one.
    pub fn most_relevant(&self) -> Option<InvoiceRef> {
        self.paid.clone().or_else(|| self.unpaid.clone())
    }
}

/// The verdict returned by `GET /access-control/check`.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct AccessDecision {
    pub has_access: bool,
    pub is_paid: bool,
    pub requires_payment: bool,
    /// An enrollment status, or `"not_enrolled"` when no record exists.
    pub enrollment_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<InvoiceRef>,
}
