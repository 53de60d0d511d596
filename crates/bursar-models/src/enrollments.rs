//! Enrollment domain models and DTOs.
//!
//! An enrollment links a student to a class and carries the status driving
//! the payment gate plus the admin override flag. Removal is a soft
//! transition to `dropped`; rows are never deleted, and at most one
//! non-dropped enrollment exists per (student, class) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type, Default,
)]
#[sqlx(type_name = "enrollment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    #[default]
    PendingPayment,
    Active,
    Inactive,
    Completed,
    Dropped,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
        }
    }
}

/// An enrollment row.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub enrollment_date: DateTime<Utc>,
    pub deenrollment_date: Option<DateTime<Utc>>,
    pub status: EnrollmentStatus,
    pub admin_granted_access: bool,
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// DTO for a direct enroll call (outside checkout).
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateEnrollmentDto {
    pub student_id: Uuid,
    pub class_id: Uuid,
}

/// DTO for the admin access toggle.
#[derive(Deserialize, Debug, ToSchema)]
pub struct ToggleAdminAccessDto {
    pub enabled: bool,
}
