//! Handler for `GET /stats`.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;
use tutorat_core::{response::ModalityStats, store::ResponseStore};

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct Stats {
  #[serde(rename = "modalites")]
  pub modalities: Vec<ModalityStats>,
}

/// `GET /stats`
pub async fn handler<S>(State(store): State<Arc<S>>) -> Result<Json<Stats>, ApiError>
where
  S: ResponseStore,
{
  let modalities = store.get_stats().await.map_err(ApiError::store)?;
  Ok(Json(Stats { modalities }))
}
