use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::invoices::model::{
    AttachProofDto, CreateInvoiceDto, Invoice, MarkPaidDto, RefundDto,
};
use crate::modules::invoices::service::InvoiceService;
use crate::state::AppState;
use bursar_core::AppError;

#[utoipa::path(
    post,
    path = "/api/invoices",
    request_body = CreateInvoiceDto,
    responses(
        (status = 200, description = "Invoice created", body = Invoice),
        (status = 404, description = "Student or parent not found"),
        (status = 422, description = "Business-rule violation")
    ),
    tag = "Invoices"
)]
#[instrument(skip(state, dto))]
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(dto): Json<CreateInvoiceDto>,
) -> Result<Json<Invoice>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let invoice = InvoiceService::from_state(&state).create(dto).await?;
    Ok(Json(invoice))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice details", body = Invoice),
        (status = 404, description = "Invoice not found")
    ),
    tag = "Invoices"
)]
#[instrument(skip(state))]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, AppError> {
    let invoice = InvoiceService::from_state(&state).get(id).await?;
    Ok(Json(invoice))
}

#[utoipa::path(
    get,
    path = "/api/invoices/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Invoices for the student", body = [Invoice])
    ),
    tag = "Invoices"
)]
#[instrument(skip(state))]
pub async fn get_student_invoices(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<Invoice>>, AppError> {
    let invoices = InvoiceService::from_state(&state)
        .list_for_student(student_id)
        .await?;
    Ok(Json(invoices))
}

#[utoipa::path(
    patch,
    path = "/api/invoices/{id}/mark-paid",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    request_body = MarkPaidDto,
    responses(
        (status = 200, description = "Invoice marked paid", body = Invoice),
        (status = 404, description = "Invoice not found")
    ),
    tag = "Invoices"
)]
#[instrument(skip(state, dto))]
pub async fn mark_invoice_paid(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<MarkPaidDto>,
) -> Result<Json<Invoice>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let invoice = InvoiceService::from_state(&state).mark_as_paid(id, dto).await?;
    Ok(Json(invoice))
}

#[utoipa::path(
    post,
    path = "/api/invoices/{id}/refund",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    request_body = RefundDto,
    responses(
        (status = 200, description = "Invoice refunded", body = Invoice),
        (status = 404, description = "Invoice not found"),
        (status = 422, description = "Invoice not refundable")
    ),
    tag = "Invoices"
)]
#[instrument(skip(state, dto))]
pub async fn refund_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(dto): Json<RefundDto>,
) -> Result<Json<Invoice>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let invoice = InvoiceService::from_state(&state).refund(id, dto).await?;
    Ok(Json(invoice))
}

#[utoipa::path(
    post,
    path = "/api/invoices/payment-proof/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    request_body = AttachProofDto,
    responses(
        (status = 200, description = "Proof attached to the latest unpaid invoice, or null when none exists")
    ),
    tag = "Invoices"
)]
#[instrument(skip(state, dto))]
pub async fn attach_payment_proof(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Json(dto): Json<AttachProofDto>,
) -> Result<Json<Option<Invoice>>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let invoice = InvoiceService::from_state(&state)
        .attach_proof_to_latest_unpaid(student_id, &dto.proof_url)
        .await?;
    Ok(Json(invoice))
}

#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice deleted"),
        (status = 404, description = "Invoice not found")
    ),
    tag = "Invoices"
)]
#[instrument(skip(state))]
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    InvoiceService::from_state(&state).delete(id).await?;
    Ok(Json(json!({"message": "Invoice deleted"})))
}
