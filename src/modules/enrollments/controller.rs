use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::enrollments::model::{CreateEnrollmentDto, Enrollment};
use crate::modules::enrollments::service::EnrollmentService;
use crate::state::AppState;
use bursar_core::AppError;

#[utoipa::path(
    post,
    path = "/api/enrollments",
    request_body = CreateEnrollmentDto,
    responses(
        (status = 201, description = "Enrollment created", body = Enrollment),
        (status = 404, description = "Student or class not found"),
        (status = 422, description = "Already enrolled")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn create_enrollment(
    State(state): State<AppState>,
    Json(dto): Json<CreateEnrollmentDto>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let enrollment = EnrollmentService::from_state(&state).enroll(dto).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

#[utoipa::path(
    patch,
    path = "/api/enrollments/{id}/activate",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment activated", body = Enrollment),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn activate_enrollment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Enrollment>, AppError> {
    let enrollment = EnrollmentService::from_state(&state).activate(id).await?;
    Ok(Json(enrollment))
}

#[utoipa::path(
    delete,
    path = "/api/enrollments/{id}",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment dropped"),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn drop_enrollment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    EnrollmentService::from_state(&state).remove(id).await?;
    Ok(Json(json!({"message": "Enrollment dropped"})))
}

#[utoipa::path(
    get,
    path = "/api/enrollments/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Enrollments for the student", body = [Enrollment])
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_student_enrollments(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    let enrollments = EnrollmentService::from_state(&state)
        .list_for_student(student_id)
        .await?;
    Ok(Json(enrollments))
}
