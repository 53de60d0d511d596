//! Directory collaborators: students, classes, parents.
//!
//! The billing core consumes these through traits; the Postgres
//! implementations in [`pg`] read the directory tables owned by the rest of
//! the school-management system.

pub mod pg;

use async_trait::async_trait;
use uuid::Uuid;

use bursar_core::StoreError;
use bursar_models::directory::{
    ClassRecord, NewParentRecord, NewStudentRecord, ParentRecord, StudentRecord,
};

#[async_trait]
pub trait StudentDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StudentRecord>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, StoreError>;

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<StudentRecord>, StoreError>;

    /// Create a student record during checkout resolution.
    async fn create(&self, new: NewStudentRecord) -> Result<StudentRecord, StoreError>;
}

#[async_trait]
pub trait ClassCatalog: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ClassRecord>, StoreError>;
}

#[async_trait]
pub trait ParentDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<ParentRecord>, StoreError>;

    async fn find_by_student_id(
        &self,
        student_id: Uuid,
    ) -> Result<Option<ParentRecord>, StoreError>;

    async fn create(&self, new: NewParentRecord) -> Result<ParentRecord, StoreError>;

    async fn link_student(&self, parent_id: Uuid, student_id: Uuid) -> Result<(), StoreError>;
}
