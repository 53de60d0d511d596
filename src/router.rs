use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::access_control::router::init_access_control_router;
use crate::modules::checkout::router::init_checkout_router;
use crate::modules::enrollments::router::init_enrollments_router;
use crate::modules::invoice_generation::router::init_invoice_generation_router;
use crate::modules::invoices::router::init_invoices_router;
use crate::modules::reminders::router::init_reminders_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/checkout", init_checkout_router())
                .nest("/enrollments", init_enrollments_router())
                .nest("/invoices", init_invoices_router())
                .nest("/access-control", init_access_control_router())
                .nest("/invoice-generation", init_invoice_generation_router())
                .nest("/fee-reminders", init_reminders_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
