use crate::modules::access_control::controller::{check_access, toggle_admin_access};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch},
};

pub fn init_access_control_router() -> Router<AppState> {
    Router::new()
        .route("/check/{student_id}/{class_id}", get(check_access))
        .route(
            "/toggle-admin-access/{student_id}/{class_id}",
            patch(toggle_admin_access),
        )
}
