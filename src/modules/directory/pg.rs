use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use bursar_core::StoreError;
use bursar_models::directory::{
    ClassRecord, NewParentRecord, NewStudentRecord, ParentRecord, StudentRecord,
};

use super::{ClassCatalog, ParentDirectory, StudentDirectory};

#[derive(Clone)]
pub struct PgStudentDirectory {
    db: PgPool,
}

impl PgStudentDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentDirectory for PgStudentDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StudentRecord>, StoreError> {
        let student = sqlx::query_as::<_, StudentRecord>(
            r#"
            SELECT id, name, email, country, user_id, phone
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(student)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, StoreError> {
        let student = sqlx::query_as::<_, StudentRecord>(
            r#"
            SELECT id, name, email, country, user_id, phone
            FROM students
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(student)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<StudentRecord>, StoreError> {
        let student = sqlx::query_as::<_, StudentRecord>(
            r#"
            SELECT id, name, email, country, user_id, phone
            FROM students
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(student)
    }

    async fn create(&self, new: NewStudentRecord) -> Result<StudentRecord, StoreError> {
        let student = sqlx::query_as::<_, StudentRecord>(
            r#"
            INSERT INTO students (name, email, country, user_id, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, country, user_id, phone
            "#,
        )
        .bind(new.name)
        .bind(new.email)
        .bind(new.country)
        .bind(new.user_id)
        .bind(new.phone)
        .fetch_one(&self.db)
        .await?;

        Ok(student)
    }
}

#[derive(Clone)]
pub struct PgClassCatalog {
    db: PgPool,
}

impl PgClassCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClassCatalog for PgClassCatalog {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ClassRecord>, StoreError> {
        let class = sqlx::query_as::<_, ClassRecord>(
            r#"
            SELECT id, name, fee_usd, fee_pkr
            FROM classes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(class)
    }
}

#[derive(Clone)]
pub struct PgParentDirectory {
    db: PgPool,
}

impl PgParentDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ParentDirectory for PgParentDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<ParentRecord>, StoreError> {
        let parent = sqlx::query_as::<_, ParentRecord>(
            r#"
            SELECT id, name, email, phone
            FROM parents
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(parent)
    }

    async fn find_by_student_id(
        &self,
        student_id: Uuid,
    ) -> Result<Option<ParentRecord>, StoreError> {
        let parent = sqlx::query_as::<_, ParentRecord>(
            r#"
            SELECT p.id, p.name, p.email, p.phone
            FROM parents p
            JOIN parent_students ps ON ps.parent_id = p.id
            WHERE ps.student_id = $1
            ORDER BY ps.created_at
            LIMIT 1
            "#,
        )
        .bind(student_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(parent)
    }

    async fn create(&self, new: NewParentRecord) -> Result<ParentRecord, StoreError> {
        let parent = sqlx::query_as::<_, ParentRecord>(
            r#"
            INSERT INTO parents (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, phone
            "#,
        )
        .bind(new.name)
        .bind(new.email)
        .bind(new.phone)
        .fetch_one(&self.db)
        .await?;

        Ok(parent)
    }

    async fn link_student(&self, parent_id: Uuid, student_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO parent_students (parent_id, student_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(parent_id)
        .bind(student_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }
}
