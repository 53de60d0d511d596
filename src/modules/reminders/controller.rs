use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::reminders::service::ReminderService;
use crate::state::AppState;
use bursar_core::pagination::{PaginationMeta, PaginationParams};
use bursar_core::AppError;
use bursar_models::logs::{PaginatedReminderLogsResponse, ReminderRunSummary};

#[utoipa::path(
    post,
    path = "/api/fee-reminders/run",
    responses(
        (status = 200, description = "Reminder sweep finished", body = ReminderRunSummary)
    ),
    tag = "Fee Reminders"
)]
#[instrument(skip(state))]
pub async fn run_reminders(
    State(state): State<AppState>,
) -> Result<Json<ReminderRunSummary>, AppError> {
    let summary = ReminderService::from_state(&state)
        .run_sweep(Utc::now().date_naive())
        .await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/fee-reminders/logs/{student_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Reminder log entries", body = PaginatedReminderLogsResponse)
    ),
    tag = "Fee Reminders"
)]
#[instrument(skip(state))]
pub async fn get_reminder_logs(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedReminderLogsResponse>, AppError> {
    let logs = ReminderService::from_state(&state)
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

    Ok(Json(PaginatedReminderLogsResponse {
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
