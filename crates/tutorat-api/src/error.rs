//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tutorat_core::ValidationError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Validation(ValidationError::MissingFields { missing }) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": "Tous les champs sont requis", "champs_manquants": missing }),
      ),
      ApiError::Validation(ValidationError::FieldTooLong { field, max }) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": format!("Le champ {field} dépasse {max} caractères") }),
      ),
      ApiError::Validation(ValidationError::NotAnObject) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": "Le corps de la requête doit être un objet JSON" }),
      ),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Erreur serveur" }))
      }
    };
    (status, Json(body)).into_response()
  }
}
