use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::access_control::service::AccessService;
use crate::state::AppState;
use bursar_core::AppError;
use bursar_models::access::AccessDecision;
use bursar_models::enrollments::{Enrollment, ToggleAdminAccessDto};

#[utoipa::path(
    get,
    path = "/api/access-control/check/{student_id}/{class_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        ("class_id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Access decision", body = AccessDecision),
        (status = 404, description = "Class not found")
    ),
    tag = "Access Control"
)]
#[instrument(skip(state))]
pub async fn check_access(
    State(state): State<AppState>,
    Path((student_id, class_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AccessDecision>, AppError> {
    let decision = AccessService::from_state(&state)
        .check_access(student_id, class_id)
        .await?;
    Ok(Json(decision))
}

#[utoipa::path(
    patch,
    path = "/api/access-control/toggle-admin-access/{student_id}/{class_id}",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        ("class_id" = Uuid, Path, description = "Class ID")
    ),
    request_body = ToggleAdminAccessDto,
    responses(
        (status = 200, description = "Admin access flag updated", body = Enrollment),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Access Control"
)]
#[instrument(skip(state))]
pub async fn toggle_admin_access(
    State(state): State<AppState>,
    Path((student_id, class_id)): Path<(Uuid, Uuid)>,
    Json(dto): Json<ToggleAdminAccessDto>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = AccessService::from_state(&state)
        .toggle_admin_access(student_id, class_id, dto.enabled)
        .await?;
    Ok(Json(enrollment))
}
