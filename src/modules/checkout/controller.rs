use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::modules::checkout::model::{CheckoutDto, CheckoutSummary};
use crate::modules::checkout::service::CheckoutService;
use crate::state::AppState;
use bursar_core::AppError;

/// The authenticated user id is supplied by the upstream auth layer as a
/// header; its absence marks a guest checkout.
fn user_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutDto,
    responses(
        (status = 201, description = "Checkout complete", body = CheckoutSummary),
        (status = 404, description = "Referenced student or class not found"),
        (status = 422, description = "Business-rule violation")
    ),
    tag = "Checkout"
)]
#[instrument(skip(state, headers, dto))]
pub async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(dto): Json<CheckoutDto>,
) -> Result<(StatusCode, Json<CheckoutSummary>), AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("Validation failed: {}", e)))?;

    let user_id = user_id_from_headers(&headers);
    let summary = CheckoutService::from_state(&state)
        .create_checkout(dto, user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(summary)))
}
