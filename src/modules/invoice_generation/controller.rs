use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::invoice_generation::service::GenerationService;
use crate::state::AppState;
use bursar_core::pagination::{PaginationMeta, PaginationParams};
use bursar_core::AppError;
use bursar_models::billing::FeeCycleKind;
use bursar_models::logs::{PaginatedGenerationLogsResponse, RunSummary};

#[utoipa::path(
    post,
    path = "/api/invoice-generation/generate-monthly",
    responses(
        (status = 200, description = "Sweep finished", body = RunSummary)
    ),
    tag = "Invoice Generation"
)]
#[instrument(skip(state))]
pub async fn generate_monthly(
    State(state): State<AppState>,
) -> Result<Json<RunSummary>, AppError> {
    let summary = GenerationService::from_state(&state)
        .run_sweep(FeeCycleKind::Monthly, Utc::now().date_naive())
        .await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/invoice-generation/generate-quarterly",
    responses(
        (status = 200, description = "Sweep finished", body = RunSummary)
    ),
    tag = "Invoice Generation"
)]
#[instrument(skip(state))]
pub async fn generate_quarterly(
    State(state): State<AppState>,
) -> Result<Json<RunSummary>, AppError> {
    let summary = GenerationService::from_state(&state)
        .run_sweep(FeeCycleKind::Quarterly, Utc::now().date_naive())
        .await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/invoice-generation/generate-yearly",
    responses(
        (status = 200, description = "Sweep finished", body = RunSummary)
    ),
    tag = "Invoice Generation"
)]
#[instrument(skip(state))]
pub async fn generate_yearly(
    State(state): State<AppState>,
) -> Result<Json<RunSummary>, AppError> {
    let summary = GenerationService::from_state(&state)
        .run_sweep(FeeCycleKind::Yearly, Utc::now().date_naive())
        .await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/invoice-generation/generate-for-student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Generation finished", body = RunSummary),
        (status = 404, description = "Student not found")
    ),
    tag = "Invoice Generation"
)]
#[instrument(skip(state))]
pub async fn generate_for_student(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<RunSummary>, AppError> {
    let summary = GenerationService::from_state(&state)
        .generate_for_student(student_id, FeeCycleKind::Monthly, Utc::now().date_naive())
        .await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/invoice-generation/logs/{student_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Generation log entries", body = PaginatedGenerationLogsResponse)
    ),
    tag = "Invoice Generation"
)]
#[instrument(skip(state))]
pub async fn get_generation_logs(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedGenerationLogsResponse>, AppError> {
    let logs = GenerationService::from_state(&state)
        .logs_for_student(student_id)
        .await?;

    let total = logs.len() as i64;
    let limit = params.limit();
    let offset = params.offset();
    let data = logs
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    Ok(Json(PaginatedGenerationLogsResponse {
        data,
        meta: PaginationMeta {
            total,
            limit,
            offset: Some(offset),
            page: params.page(),
            has_more: offset + limit < total,
        },
    }))
}
