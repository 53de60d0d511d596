use crate::modules::checkout::controller::create_checkout;
use crate::state::AppState;
use axum::{Router, routing::post};

pub fn init_checkout_router() -> Router<AppState> {
    Router::new().route("/", post(create_checkout))
}
