//! Enrollment persistence.
//!
//! The partial unique index on (student_id, class_id) where status is not
//! `dropped` enforces the one-open-enrollment invariant at the database
//! level; concurrent inserts surface as [`StoreError::AlreadyEnrolled`].

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use bursar_core::StoreError;
use bursar_models::enrollments::{Enrollment, EnrollmentStatus};

#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Insert a new enrollment. Fails with `AlreadyEnrolled` when a
    /// non-dropped enrollment already exists for the pair.
    async fn insert(
        &self,
        student_id: Uuid,
        class_id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<Enrollment, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Enrollment>, StoreError>;

    /// The non-dropped enrollment for (student, class), if any.
    async fn find_open(
        &self,
        student_id: Uuid,
        class_id: Uuid,
    ) -> Result<Option<Enrollment>, StoreError>;

    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Enrollment>, StoreError>;

    /// All `active` enrollments, in stable order, for the generation sweep.
    async fn list_active(&self) -> Result<Vec<Enrollment>, StoreError>;

    /// Single conditional update of the status. Transitioning to `dropped`
    /// also stamps the deenrollment date.
    async fn set_status(
        &self,
        id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<Enrollment, StoreError>;

    async fn set_admin_access(
        &self,
        student_id: Uuid,
        class_id: Uuid,
        enabled: bool,
    ) -> Result<Enrollment, StoreError>;
}

const ENROLLMENT_COLUMNS: &str = "id, student_id, class_id, enrollment_date, deenrollment_date, \
                                  status, admin_granted_access, created_at, updated_at";

#[derive(Clone)]
pub struct PgEnrollmentStore {
    db: PgPool,
}

impl PgEnrollmentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EnrollmentStore for PgEnrollmentStore {
    async fn insert(
        &self,
        student_id: Uuid,
        class_id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<Enrollment, StoreError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            INSERT INTO enrollments (student_id, class_id, status)
            VALUES ($1, $2, $3)
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(student_id)
        .bind(class_id)
        .bind(status)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::from_enrollment_insert)?;

        Ok(enrollment)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Enrollment>, StoreError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            SELECT {ENROLLMENT_COLUMNS}
            FROM enrollments
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(enrollment)
    }

    async fn find_open(
        &self,
        student_id: Uuid,
        class_id: Uuid,
    ) -> Result<Option<Enrollment>, StoreError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            SELECT {ENROLLMENT_COLUMNS}
            FROM enrollments
            WHERE student_id = $1 AND class_id = $2 AND status <> 'dropped'
            "#
        ))
        .bind(student_id)
        .bind(class_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(enrollment)
    }

    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Enrollment>, StoreError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            SELECT {ENROLLMENT_COLUMNS}
            FROM enrollments
            WHERE student_id = $1
            ORDER BY enrollment_date DESC
            "#
        ))
        .bind(student_id)
        .fetch_all(&self.db)
        .await?;

        Ok(enrollments)
    }

    async fn list_active(&self) -> Result<Vec<Enrollment>, StoreError> {
        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            SELECT {ENROLLMENT_COLUMNS}
            FROM enrollments
            WHERE status = 'active'
            ORDER BY enrollment_date
            "#
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(enrollments)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: EnrollmentStatus,
    ) -> Result<Enrollment, StoreError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            UPDATE enrollments
            SET status = $2,
                deenrollment_date = CASE WHEN $2 = 'dropped'::enrollment_status
                                         THEN now() ELSE deenrollment_date END,
                updated_at = now()
            WHERE id = $1
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(enrollment)
    }

    async fn set_admin_access(
        &self,
        student_id: Uuid,
        class_id: Uuid,
        enabled: bool,
    ) -> Result<Enrollment, StoreError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            r#"
            UPDATE enrollments
            SET admin_granted_access = $3, updated_at = now()
            WHERE student_id = $1 AND class_id = $2 AND status <> 'dropped'
            RETURNING {ENROLLMENT_COLUMNS}
            "#
        ))
        .bind(student_id)
        .bind(class_id)
        .bind(enabled)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(enrollment)
    }
}
