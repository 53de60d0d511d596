//! Records exposed by the directory collaborators (students, classes,
//! parents). The billing core reads these; it only writes students and
//! parent links during checkout resolution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::billing::Currency;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct StudentRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub country: Option<String>,
    pub user_id: Option<Uuid>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewStudentRecord {
    pub name: String,
    pub email: String,
    pub country: Option<String>,
    pub user_id: Option<Uuid>,
    pub phone: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct ClassRecord {
    pub id: Uuid,
    pub name: String,
    pub fee_usd: Decimal,
    pub fee_pkr: Decimal,
}

impl ClassRecord {
    /// The list fee in the given billing currency.
    pub fn fee(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Usd => self.fee_usd,
            Currency::Pkr => self.fee_pkr,
        }
    }
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct ParentRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewParentRecord {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}
