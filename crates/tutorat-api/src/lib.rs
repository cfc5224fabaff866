//! JSON API for the tutoring questionnaire.
//!
//! Exposes an axum [`Router`] backed by any
//! [`tutorat_core::store::ResponseStore`]. Static files, CORS and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tutorat_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod publication;
pub mod stats;
pub mod submit;
pub mod synthesis;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tutorat_core::store::ResponseStore;

pub use error::ApiError;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ResponseStore + 'static,
{
  Router::new()
    .route("/submit", post(submit::handler::<S>))
    .route("/synthese/{modalite}", get(synthesis::handler::<S>))
    .route("/stats", get(stats::handler::<S>))
    .route("/marquer-publie/{modalite}", post(publication::handler::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
