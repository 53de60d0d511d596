use crate::modules::enrollments::controller::{
    activate_enrollment, create_enrollment, drop_enrollment, get_student_enrollments,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_enrollment))
        .route("/{id}/activate", patch(activate_enrollment))
        .route("/{id}", axum::routing::delete(drop_enrollment))
        .route("/student/{student_id}", get(get_student_enrollments))
}
