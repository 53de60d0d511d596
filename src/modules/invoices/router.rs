use crate::modules::invoices::controller::{
    attach_payment_proof, create_invoice, delete_invoice, get_invoice, get_student_invoices,
    mark_invoice_paid, refund_invoice,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

pub fn init_invoices_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_invoice))
        .route("/{id}", get(get_invoice).delete(delete_invoice))
        .route("/student/{student_id}", get(get_student_invoices))
        .route("/{id}/mark-paid", patch(mark_invoice_paid))
        .route("/{id}/refund", post(refund_invoice))
        .route("/payment-proof/{student_id}", post(attach_payment_proof))
}
