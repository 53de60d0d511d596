use axum::http::StatusCode;
use thiserror::Error;

use crate::errors::AppError;

/// Typed error shared by every store implementation.
///
/// The invoice-number conflict gets its own variant so the lifecycle retry
/// loop can discriminate it from every other database failure; only that
/// variant is ever retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate invoice number")]
    DuplicateInvoiceNumber,

    #[error("an enrollment already exists for this student and class")]
    AlreadyEnrolled,

    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classify a sqlx error raised while inserting an invoice. Unique
    /// violations on the invoice-number column map to
    /// [`StoreError::DuplicateInvoiceNumber`]; everything else passes
    /// through as a database error.
    pub fn from_invoice_insert(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::DuplicateInvoiceNumber;
            }
        }
        Self::Database(err)
    }

    /// Classify a sqlx error raised while inserting an enrollment.
    pub fn from_enrollment_insert(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::AlreadyEnrolled;
            }
        }
        Self::Database(err)
    }

    /// Map to the HTTP-facing error. Services call this explicitly so the
    /// blanket `From<E> for AppError` (which maps everything to 500) never
    /// swallows a 404 or 422.
    pub fn into_app_error(self) -> AppError {
        match self {
            Self::NotFound => AppError::not_found(anyhow::anyhow!("record not found")),
            Self::AlreadyEnrolled => AppError::unprocessable_fields(
                anyhow::anyhow!("an enrollment already exists for this student and class"),
                [("enrollment", "already_enrolled")],
            ),
            Self::DuplicateInvoiceNumber => AppError::unprocessable_fields(
                anyhow::anyhow!("duplicate invoice number"),
                [("invoice_number", "duplicate_invoice_number")],
            ),
            Self::Database(err) => AppError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                anyhow::Error::from(err).context("database error"),
            ),
        }
    }
}
