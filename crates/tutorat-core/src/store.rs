//! The `ResponseStore` trait.
//!
//! Implemented by storage backends (e.g. `tutorat-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  response::{ModalityStats, Response, ResponseView},
  submission::Submission,
};

/// Abstraction over the durable response table.
///
/// Responses are never deleted. The only mutation after insert is the bulk
/// publication flip in [`ResponseStore::mark_published`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ResponseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a validated submission. The store assigns the identifier and
  /// the submission timestamp; the response starts unpublished.
  fn insert(
    &self,
    submission: Submission,
  ) -> impl Future<Output = Result<Response, Self::Error>> + Send + '_;

  /// All unpublished responses for `modality` (exact match), most recent
  /// first.
  fn get_unpublished(
    &self,
    modality: String,
  ) -> impl Future<Output = Result<Vec<ResponseView>, Self::Error>> + Send + '_;

  /// Total and unpublished counts for every modality present, ordered by
  /// total descending then modality ascending.
  fn get_stats(
    &self,
  ) -> impl Future<Output = Result<Vec<ModalityStats>, Self::Error>> + Send + '_;

  /// Flag every unpublished response of `modality` as published in a single
  /// statement and return how many rows changed. Zero is not an error.
  fn mark_published(
    &self,
    modality: String,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
