//! Handler for `POST /marquer-publie/:modalite`.
//!
//! Publication is per cohort: every unpublished response of the modality is
//! flagged at once. Repeating the call is harmless and reports zero.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use tutorat_core::{store::ResponseStore, submission::require_modality};

use crate::{error::ApiError, submit::Acknowledgement};

/// `POST /marquer-publie/:modalite`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Path(modalite): Path<String>,
) -> Result<Json<Acknowledgement>, ApiError>
where
  S: ResponseStore,
{
  require_modality(&modalite)?;

  let count = store
    .mark_published(modalite.clone())
    .await
    .map_err(ApiError::store)?;

  tracing::info!(modalite = %modalite, count, "responses marked as published");

  Ok(Json(Acknowledgement {
    success: true,
    message: format!("{count} réponses marquées comme publiées"),
  }))
}
