use std::collections::BTreeMap;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application error carried through every handler and service.
///
/// Business-rule violations (422) carry structured per-field reason codes
/// rendered as `{"errors": {"field": "reason_code"}}`; every other status
/// renders `{"error": "<message>"}`.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub fields: Option<BTreeMap<&'static str, &'static str>>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            fields: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    /// A 422 with structured reason codes, e.g.
    /// `AppError::unprocessable_fields("cart is empty", [("cart", "cart_empty")])`.
    pub fn unprocessable_fields<E, I>(err: E, fields: I) -> Self
    where
        E: Into<Error>,
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: err.into(),
            fields: Some(fields.into_iter().collect()),
        }
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self.fields {
            Some(fields) => Json(json!({ "errors": fields })),
            None => Json(json!({ "error": self.error.to_string() })),
        };

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
