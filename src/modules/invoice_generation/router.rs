use crate::modules::invoice_generation::controller::{
    generate_for_student, generate_monthly, generate_quarterly, generate_yearly,
    get_generation_logs,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_invoice_generation_router() -> Router<AppState> {
    Router::new()
        .route("/generate-monthly", post(generate_monthly))
        .route("/generate-quarterly", post(generate_quarterly))
        .route("/generate-yearly", post(generate_yearly))
        .route("/generate-for-student/{student_id}", post(generate_for_student))
        .route("/logs/{student_id}", get(get_generation_logs))
}
