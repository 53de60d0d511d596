use crate::modules::reminders::controller::{get_reminder_logs, run_reminders};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_reminders_router() -> Router<AppState> {
    Router::new()
        .route("/run", post(run_reminders))
        .route("/logs/{student_id}", get(get_reminder_logs))
}
