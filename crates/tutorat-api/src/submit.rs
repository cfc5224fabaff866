//! Handler for `POST /submit`.
//!
//! The body must carry every field of the current schema. Validation runs
//! before the store is touched, so a rejected body never produces a row.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use serde::Serialize;
use serde_json::Value;
use tutorat_core::{store::ResponseStore, submission::Submission};

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct Acknowledgement {
  pub success: bool,
  pub message: String,
}

/// `POST /submit` — body: every field listed in the schema.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Acknowledgement>, ApiError>
where
  S: ResponseStore,
{
  let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let submission = Submission::from_json(&body)?;

  let response = store.insert(submission).await.map_err(ApiError::store)?;

  tracing::info!(
    id = response.id,
    modalite = response.submission.modality(),
    ville = response.submission.city(),
    "response recorded"
  );

  Ok(Json(Acknowledgement {
    success: true,
    message: "Réponse enregistrée avec succès".to_owned(),
  }))
}
