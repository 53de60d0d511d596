//! Checkout request and response models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::billing::Currency;
use crate::invoices::InvoiceRef;

/// One cart entry. `price` overrides the class list fee, which is how
/// discounts enter the system; a missing price bills the list fee.
#[derive(Deserialize, Debug, Clone, ToSchema, Validate)]
pub struct CartItemDto {
    pub class_id: Uuid,
    pub price: Option<Decimal>,
}

/// The checkout request. The student is resolved in order: explicit
/// `student_id`, the authenticated user, then `email`; an unknown email
/// with enough profile data creates the student.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CheckoutDto {
    #[serde(default, deserialize_with = "bursar_core::serde::deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email)]
    pub parent_email: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub parent_name: Option<String>,
    pub currency: Option<Currency>,
    #[serde(default)]
    pub items: Vec<CartItemDto>,
}

/// What a checkout produced. `skipped_class_ids` lists cart entries the
/// student already owned; they are not an error.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct CheckoutSummary {
    pub student_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub currency: Currency,
    pub enrollment_ids: Vec<Uuid>,
    pub invoices: Vec<InvoiceRef>,
    pub skipped_class_ids: Vec<Uuid>,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_dto_rejects_bad_email() {
        let dto = CheckoutDto {
            student_id: None,
            email: Some("not-an-email".to_string()),
            name: None,
            country: None,
            phone: None,
            parent_email: None,
            parent_name: None,
            currency: None,
            items: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_checkout_dto_accepts_minimal_guest() {
        let dto = CheckoutDto {
            student_id: None,
            email: Some("guest@example.com".to_string()),
            name: Some("Guest Student".to_string()),
            country: Some("Pakistan".to_string()),
            phone: None,
            parent_email: None,
            parent_name: None,
            currency: None,
            items: vec![CartItemDto {
                class_id: Uuid::new_v4(),
                price: None,
            }],
        };
        assert!(dto.validate().is_ok());
    }
}
