//! Handler for `GET /synthese/:modalite`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Serialize;
use tutorat_core::{
  response::ResponseView, store::ResponseStore, submission::require_modality,
};

use crate::error::ApiError;

/// The unpublished responses of one modality, most recent first.
#[derive(Debug, Serialize)]
pub struct Synthesis {
  #[serde(rename = "modalite")]
  pub modality:        String,
  #[serde(rename = "total_reponses")]
  pub total_responses: usize,
  #[serde(rename = "reponses")]
  pub responses:       Vec<ResponseView>,
}

/// `GET /synthese/:modalite`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Path(modalite): Path<String>,
) -> Result<Json<Synthesis>, ApiError>
where
  S: ResponseStore,
{
  require_modality(&modalite)?;

  let responses = store
    .get_unpublished(modalite.clone())
    .await
    .map_err(ApiError::store)?;

  Ok(Json(Synthesis {
    modality: modalite,
    total_responses: responses.len(),
    responses,
  }))
}
